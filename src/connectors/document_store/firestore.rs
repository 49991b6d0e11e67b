use super::credentials::TokenSource;
use super::value::{decode_fields, encode_fields};
use super::{ensure_object, Document, DocumentStore};
use crate::connectors::config::DocumentStoreConfig;
use crate::connectors::errors::ConnectorError;
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::Instrument;

/// Upper bound for `retry_attempts`; the backoff stops growing after the 7th attempt.
const MAX_RETRY_ATTEMPTS: usize = 10;

/// Firestore REST (v1) client. Collections live under `workshops/{workshop_id}`.
pub struct FirestoreClient {
    base_url: String,
    documents_path: String,
    http_client: reqwest::Client,
    tokens: TokenSource,
    retry_attempts: usize,
    page_size: u32,
}

impl FirestoreClient {
    pub fn new(config: DocumentStoreConfig) -> Result<Self, ConnectorError> {
        if config.project_id.trim().is_empty() {
            return Err(ConnectorError::Internal(
                "Firestore project id is not configured".to_string(),
            ));
        }
        if config.workshop_id.trim().is_empty() {
            return Err(ConnectorError::Internal(
                "Firestore workshop id is not configured".to_string(),
            ));
        }

        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ConnectorError::Internal(format!("HTTP client error: {}", err)))?;

        let documents_path = format!(
            "projects/{}/databases/{}/documents/workshops/{}",
            Self::encode_segment(&config.project_id),
            config.database_id,
            Self::encode_segment(&config.workshop_id),
        );

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            documents_path,
            tokens: TokenSource::new(config.credentials, &config.metadata_url, http_client.clone()),
            http_client,
            retry_attempts: config.retry_attempts.clamp(1, MAX_RETRY_ATTEMPTS),
            page_size: config.page_size.clamp(1, 300),
        })
    }

    fn encode_segment(segment: &str) -> String {
        urlencoding::encode(segment).into_owned()
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/v1/{}/{}",
            self.base_url,
            self.documents_path,
            Self::encode_segment(collection)
        )
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!(
            "{}/{}",
            self.collection_url(collection),
            Self::encode_segment(id)
        )
    }

    fn body(data: &Value) -> Value {
        match data.as_object() {
            Some(map) => json!({ "fields": encode_fields(map) }),
            None => json!({ "fields": {} }),
        }
    }

    fn parse_document(item: &Value) -> Option<Document> {
        let name = item.get("name")?.as_str()?;
        let id = name.rsplit('/').next()?.to_string();
        Some(Document {
            id,
            data: decode_fields(item.get("fields")),
        })
    }

    fn backoff(attempt: usize) -> Duration {
        let exponent = attempt.saturating_sub(1).min(6) as u32;
        Duration::from_millis(100 * 2_u64.pow(exponent))
    }

    /// Status a retried request gets when an earlier attempt already took effect:
    /// a create with a client-chosen id conflicts, a guarded delete finds nothing.
    fn already_applied(method: &Method, status: StatusCode) -> bool {
        (*method == Method::POST && status == StatusCode::CONFLICT)
            || (*method == Method::DELETE && status == StatusCode::NOT_FOUND)
    }

    /// Every request sent here is safe to repeat: reads, PATCH of a whole document,
    /// DELETE, and POST with a client-generated `documentId`.
    async fn send_request(
        &self,
        method: Method,
        url: &str,
        query: Vec<(String, String)>,
        body: Option<&Value>,
    ) -> Result<Value, ConnectorError> {
        let mut attempt = 0usize;
        let mut last_error: Option<ConnectorError> = None;

        while attempt < self.retry_attempts {
            attempt += 1;
            let mut builder = self.http_client.request(method.clone(), url);

            if let Some(auth) = self.tokens.authorization().await? {
                builder = builder.header("Authorization", auth);
            }

            if !query.is_empty() {
                builder = builder.query(&query);
            }

            if let Some(body) = body {
                builder = builder.json(body);
            }

            let span = tracing::info_span!("firestore_http_request", url, attempt, method = %method);

            match builder.send().instrument(span).await {
                Ok(resp) => {
                    let status = resp.status();
                    let text = resp
                        .text()
                        .await
                        .map_err(|err| ConnectorError::HttpError(err.to_string()))?;

                    if attempt > 1 && Self::already_applied(&method, status) {
                        tracing::info!(attempt, %status, "earlier attempt already applied");
                        return Ok(Value::Null);
                    }

                    if status.is_success() {
                        if text.trim().is_empty() {
                            return Ok(Value::Null);
                        }
                        return serde_json::from_str::<Value>(&text)
                            .map_err(|_| ConnectorError::InvalidResponse(text));
                    }

                    let error = match status {
                        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                            self.tokens.invalidate().await;
                            ConnectorError::Unauthorized(text)
                        }
                        StatusCode::NOT_FOUND => ConnectorError::NotFound(text),
                        StatusCode::TOO_MANY_REQUESTS => ConnectorError::RateLimited(text),
                        status if status.is_server_error() => ConnectorError::ServiceUnavailable(
                            format!("Firestore error {}: {}", status, text),
                        ),
                        status => {
                            ConnectorError::HttpError(format!("Firestore error {}: {}", status, text))
                        }
                    };

                    if !status.is_server_error() {
                        return Err(error);
                    }
                    last_error = Some(error);
                }
                Err(err) => {
                    last_error = Some(ConnectorError::from(err));
                }
            }

            if attempt < self.retry_attempts {
                tokio::time::sleep(Self::backoff(attempt)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ConnectorError::ServiceUnavailable("Firestore request failed".to_string())
        }))
    }

    fn must_exist() -> Vec<(String, String)> {
        vec![("currentDocument.exists".to_string(), "true".to_string())]
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    #[tracing::instrument(name = "firestore_list", skip(self))]
    async fn list(&self, collection: &str) -> Result<Vec<Document>, ConnectorError> {
        let url = self.collection_url(collection);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("pageSize".to_string(), self.page_size.to_string())];
            if let Some(token) = &page_token {
                query.push(("pageToken".to_string(), token.clone()));
            }

            let payload = self.send_request(Method::GET, &url, query, None).await?;

            if let Some(items) = payload.get("documents").and_then(Value::as_array) {
                for item in items {
                    match Self::parse_document(item) {
                        Some(document) => documents.push(document),
                        None => tracing::warn!("skipping Firestore document without a name"),
                    }
                }
            }

            match payload.get("nextPageToken").and_then(Value::as_str) {
                Some(token) if !token.is_empty() => page_token = Some(token.to_string()),
                _ => break,
            }
        }

        Ok(documents)
    }

    #[tracing::instrument(name = "firestore_get", skip(self))]
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, ConnectorError> {
        match self
            .send_request(Method::GET, &self.document_url(collection, id), vec![], None)
            .await
        {
            Ok(payload) => Self::parse_document(&payload).map(Some).ok_or_else(|| {
                ConnectorError::InvalidResponse("document without a name".to_string())
            }),
            Err(ConnectorError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    #[tracing::instrument(name = "firestore_add", skip(self, data))]
    async fn add(&self, collection: &str, data: Value) -> Result<String, ConnectorError> {
        ensure_object(&data)?;
        // chosen here so a retried create cannot produce a second document
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.send_request(
            Method::POST,
            &self.collection_url(collection),
            vec![("documentId".to_string(), id.clone())],
            Some(&Self::body(&data)),
        )
        .await?;

        Ok(id)
    }

    #[tracing::instrument(name = "firestore_replace", skip(self, data))]
    async fn replace(&self, collection: &str, id: &str, data: Value) -> Result<(), ConnectorError> {
        ensure_object(&data)?;
        self.send_request(
            Method::PATCH,
            &self.document_url(collection, id),
            Self::must_exist(),
            Some(&Self::body(&data)),
        )
        .await
        .map(|_| ())
    }

    #[tracing::instrument(name = "firestore_delete", skip(self))]
    async fn delete(&self, collection: &str, id: &str) -> Result<(), ConnectorError> {
        self.send_request(
            Method::DELETE,
            &self.document_url(collection, id),
            Self::must_exist(),
            None,
        )
        .await
        .map(|_| ())
    }
}
