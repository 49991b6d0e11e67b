//! OAuth access tokens for the Firestore REST API.
//!
//! Tokens are obtained either from the GCE/Cloud Run metadata server
//! (application default credentials) or by exchanging a JWT signed with a
//! service account key. Both are cached until shortly before they expire.

use crate::connectors::errors::ConnectorError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const METADATA_TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Refresh this long before the reported expiry.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Where Firestore access tokens come from.
#[derive(Clone, Default)]
pub enum Credentials {
    /// No `Authorization` header (Firestore emulator)
    #[default]
    None,
    /// Fixed bearer token, never refreshed
    AccessToken(String),
    /// Service account key exchanged for short-lived tokens
    ServiceAccount(ServiceAccountKey),
    /// Application default credentials from the metadata server
    MetadataServer,
}

impl Credentials {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::AccessToken(_) => f.write_str("AccessToken([redacted])"),
            Self::ServiceAccount(key) => f.debug_tuple("ServiceAccount").field(key).finish(),
            Self::MetadataServer => f.write_str("MetadataServer"),
        }
    }
}

/// The fields of a Google service account JSON key this service needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

impl ServiceAccountKey {
    /// Load a key from `base64:<encoded json>` or from a path to the JSON file.
    pub fn load(setting: &str) -> Result<Self, ConnectorError> {
        let raw = match setting.strip_prefix("base64:") {
            Some(encoded) => STANDARD.decode(encoded.trim()).map_err(|err| {
                ConnectorError::Internal(format!("failed to decode base64 service account: {}", err))
            })?,
            None => std::fs::read(setting).map_err(|err| {
                ConnectorError::Internal(format!(
                    "failed to read service account file {}: {}",
                    setting, err
                ))
            })?,
        };

        let key: Self = serde_json::from_slice(&raw).map_err(|err| {
            ConnectorError::Internal(format!("failed to parse service account JSON: {}", err))
        })?;
        key.encoding_key()?;

        Ok(key)
    }

    fn encoding_key(&self) -> Result<EncodingKey, ConnectorError> {
        EncodingKey::from_rsa_pem(self.private_key.as_bytes()).map_err(|err| {
            ConnectorError::Internal(format!("invalid service account private key: {}", err))
        })
    }

    /// RS256 assertion for the OAuth JWT bearer grant, valid for one hour from `now`.
    fn assertion(&self, now: i64) -> Result<String, ConnectorError> {
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: DATASTORE_SCOPE,
            aud: &self.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.private_key_id.clone();

        encode(&header, &claims, &self.encoding_key()?)
            .map_err(|err| ConnectorError::Internal(format!("failed to sign assertion: {}", err)))
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

struct CachedToken {
    header: String,
    refresh_at: Instant,
}

/// Hands out `Authorization` header values, refreshing them as they age.
pub struct TokenSource {
    credentials: Credentials,
    metadata_url: String,
    http_client: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    pub fn new(credentials: Credentials, metadata_url: &str, http_client: reqwest::Client) -> Self {
        Self {
            credentials,
            metadata_url: metadata_url.trim_end_matches('/').to_string(),
            http_client,
            cached: Mutex::new(None),
        }
    }

    /// Header value for the next request; `None` when no credentials are configured.
    pub async fn authorization(&self) -> Result<Option<String>, ConnectorError> {
        match &self.credentials {
            Credentials::None => return Ok(None),
            Credentials::AccessToken(token) => return Ok(Some(format!("Bearer {}", token))),
            Credentials::ServiceAccount(_) | Credentials::MetadataServer => {}
        }

        // held across the fetch so concurrent requests share one refresh
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(Some(token.header.clone()));
            }
        }

        let fresh = self.fetch().await?;
        let header = format!("Bearer {}", fresh.access_token);
        let lifetime = Duration::from_secs(fresh.expires_in).saturating_sub(REFRESH_MARGIN);
        tracing::debug!(expires_in = fresh.expires_in, "fetched Firestore access token");

        *cached = Some(CachedToken {
            header: header.clone(),
            refresh_at: Instant::now() + lifetime,
        });
        Ok(Some(header))
    }

    /// Drop the cached token, e.g. after the store rejected it.
    pub async fn invalidate(&self) {
        self.cached.lock().await.take();
    }

    async fn fetch(&self) -> Result<TokenResponse, ConnectorError> {
        let request = match &self.credentials {
            Credentials::MetadataServer => self
                .http_client
                .get(format!("{}{}", self.metadata_url, METADATA_TOKEN_PATH))
                .header("Metadata-Flavor", "Google"),
            Credentials::ServiceAccount(key) => {
                let assertion = key.assertion(Utc::now().timestamp())?;
                self.http_client.post(&key.token_uri).form(&[
                    ("grant_type", JWT_BEARER_GRANT),
                    ("assertion", assertion.as_str()),
                ])
            }
            Credentials::None | Credentials::AccessToken(_) => {
                return Err(ConnectorError::Internal(
                    "credentials do not issue tokens".to_string(),
                ))
            }
        };

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = format!("token endpoint returned {}: {}", status, text);
            return Err(if status.is_server_error() {
                ConnectorError::ServiceUnavailable(message)
            } else {
                ConnectorError::Unauthorized(message)
            });
        }

        resp.json::<TokenResponse>()
            .await
            .map_err(|err| ConnectorError::InvalidResponse(format!("token response: {}", err)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PRIVATE_KEY: &str = include_str!("../../../tests/fixtures/service_account_key.pem");
    const PUBLIC_KEY: &str = include_str!("../../../tests/fixtures/service_account_key.pub.pem");

    fn service_account(token_uri: &str) -> ServiceAccountKey {
        ServiceAccountKey {
            client_email: "backend@demo.iam.gserviceaccount.com".to_string(),
            private_key: PRIVATE_KEY.to_string(),
            private_key_id: Some("key-1".to_string()),
            token_uri: token_uri.to_string(),
            project_id: Some("demo".to_string()),
        }
    }

    fn key_json() -> String {
        json!({
            "type": "service_account",
            "project_id": "demo",
            "private_key_id": "key-1",
            "private_key": PRIVATE_KEY,
            "client_email": "backend@demo.iam.gserviceaccount.com",
        })
        .to_string()
    }

    #[test]
    fn loads_base64_and_file_keys() {
        let key = ServiceAccountKey::load(&format!("base64:{}", STANDARD.encode(key_json()))).unwrap();
        assert_eq!(key.client_email, "backend@demo.iam.gserviceaccount.com");
        assert_eq!(key.project_id.as_deref(), Some("demo"));
        assert_eq!(key.token_uri, "https://oauth2.googleapis.com/token");

        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), key_json()).unwrap();
        let key = ServiceAccountKey::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(key.private_key_id.as_deref(), Some("key-1"));
    }

    #[test]
    fn rejects_unusable_keys() {
        assert!(ServiceAccountKey::load("base64:not base64!").is_err());
        assert!(ServiceAccountKey::load("/does/not/exist.json").is_err());

        let bad_pem = json!({ "client_email": "a@b", "private_key": "nope" }).to_string();
        let err = ServiceAccountKey::load(&format!("base64:{}", STANDARD.encode(bad_pem))).unwrap_err();
        assert!(err.to_string().contains("private key"));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let credentials = Credentials::ServiceAccount(service_account("https://token.example"));
        assert!(!format!("{:?}", credentials).contains("PRIVATE KEY"));
        assert!(!format!("{:?}", Credentials::AccessToken("ya29.secret".to_string())).contains("ya29"));
    }

    #[test]
    fn assertion_is_signed_for_the_token_endpoint() {
        #[derive(Deserialize)]
        struct Claims {
            iss: String,
            scope: String,
            aud: String,
            iat: i64,
            exp: i64,
        }

        let now = Utc::now().timestamp();
        let assertion = service_account("https://token.example/token").assertion(now).unwrap();

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&["https://token.example/token"]);
        let decoded = decode::<Claims>(
            &assertion,
            &DecodingKey::from_rsa_pem(PUBLIC_KEY.as_bytes()).unwrap(),
            &validation,
        )
        .unwrap();

        assert_eq!(decoded.header.kid.as_deref(), Some("key-1"));
        assert_eq!(decoded.claims.iss, "backend@demo.iam.gserviceaccount.com");
        assert_eq!(decoded.claims.scope, DATASTORE_SCOPE);
        assert_eq!(decoded.claims.aud, "https://token.example/token");
        assert_eq!(decoded.claims.exp - decoded.claims.iat, 3600);
        assert_eq!(decoded.claims.iat, now);
    }

    #[tokio::test]
    async fn fixed_token_and_no_credentials_need_no_requests() {
        let client = reqwest::Client::new();
        let none = TokenSource::new(Credentials::None, "http://unused", client.clone());
        assert_eq!(none.authorization().await.unwrap(), None);

        let fixed = TokenSource::new(
            Credentials::AccessToken("ya29.fixed".to_string()),
            "http://unused",
            client,
        );
        assert_eq!(
            fixed.authorization().await.unwrap().as_deref(),
            Some("Bearer ya29.fixed")
        );
    }

    #[tokio::test]
    async fn metadata_token_is_cached_until_near_expiry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(METADATA_TOKEN_PATH))
            .and(header("Metadata-Flavor", "Google"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "ya29.metadata",
                "expires_in": 3599,
                "token_type": "Bearer",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = TokenSource::new(Credentials::MetadataServer, &server.uri(), reqwest::Client::new());
        for _ in 0..3 {
            assert_eq!(
                tokens.authorization().await.unwrap().as_deref(),
                Some("Bearer ya29.metadata")
            );
        }
    }

    #[tokio::test]
    async fn short_lived_and_invalidated_tokens_are_fetched_again() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(METADATA_TOKEN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "ya29.short",
                "expires_in": 30,
            })))
            .expect(3)
            .mount(&server)
            .await;

        let tokens = TokenSource::new(Credentials::MetadataServer, &server.uri(), reqwest::Client::new());
        // inside the refresh margin: every call refreshes
        tokens.authorization().await.unwrap();
        tokens.authorization().await.unwrap();
        tokens.invalidate().await;
        tokens.authorization().await.unwrap();
    }

    #[tokio::test]
    async fn service_account_exchanges_a_signed_assertion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains(
                "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer",
            ))
            .and(body_string_contains("assertion=ey"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "ya29.exchanged",
                "expires_in": 3600,
                "token_type": "Bearer",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let credentials = Credentials::ServiceAccount(service_account(&format!("{}/token", server.uri())));
        let tokens = TokenSource::new(credentials, "http://unused", reqwest::Client::new());

        assert_eq!(
            tokens.authorization().await.unwrap().as_deref(),
            Some("Bearer ya29.exchanged")
        );
    }

    #[tokio::test]
    async fn rejected_exchange_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "invalid_grant" })))
            .mount(&server)
            .await;

        let credentials = Credentials::ServiceAccount(service_account(&format!("{}/token", server.uri())));
        let tokens = TokenSource::new(credentials, "http://unused", reqwest::Client::new());

        assert!(matches!(
            tokens.authorization().await,
            Err(ConnectorError::Unauthorized(_))
        ));
    }
}
