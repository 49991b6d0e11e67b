use crate::connectors::{Credentials, DocumentStoreConfig, ServiceAccountKey, StoreBackend};
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};

#[derive(serde::Deserialize)]
pub struct Settings {
    pub app_host: String,
    pub app_port: u16,
    /// Shared admin secret: checked at login and used to sign tokens
    pub admin_password: String,
    pub cors_origin: String,
    pub static_dir: String,
    #[serde(default)]
    pub document_store: DocumentStoreConfig,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("app_host", &self.app_host)
            .field("app_port", &self.app_port)
            .field("admin_password", &"[redacted]")
            .field("cors_origin", &self.cors_origin)
            .field("static_dir", &self.static_dir)
            .field("document_store", &self.document_store)
            .finish()
    }
}

impl Settings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.app_host, self.app_port)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.admin_password.is_empty() {
            return Err(ConfigError::Message(
                "ADMIN_PASSWORD must be set to a non-empty value".to_string(),
            ));
        }
        let store = &self.document_store;
        match store.backend {
            None => Err(ConfigError::Message(
                "no document store configured: set FIREBASE_SERVICE_ACCOUNT (or run on Cloud Run) \
                 for Firestore, or DOCUMENT_STORE=memory for a non-persistent local store"
                    .to_string(),
            )),
            Some(StoreBackend::Memory) => Ok(()),
            Some(StoreBackend::Firestore) => {
                if store.project_id.trim().is_empty() {
                    return Err(ConfigError::Message(
                        "FIRESTORE_PROJECT_ID is required: the service account and environment \
                         do not name a project"
                            .to_string(),
                    ));
                }
                if store.workshop_id.trim().is_empty() {
                    return Err(ConfigError::Message(
                        "SUBSCOLLECTION_ID is required when the Firestore store is enabled"
                            .to_string(),
                    ));
                }
                if store.credentials.is_none() && store.targets_production() {
                    return Err(ConfigError::Message(
                        "Firestore credentials missing: set FIREBASE_SERVICE_ACCOUNT, \
                         FIRESTORE_ACCESS_TOKEN or run on Cloud Run"
                            .to_string(),
                    ));
                }
                Ok(())
            }
        }
    }
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Optional `configuration.{yaml,json,toml}` next to the binary
    let builder = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false));

    load(builder, |key| std::env::var(key).ok())
}

/// Apply defaults and environment overrides on top of `builder`, then validate.
fn load<F>(builder: ConfigBuilder<DefaultState>, lookup: F) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let env = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    let service_account = env("FIREBASE_SERVICE_ACCOUNT")
        .map(|setting| ServiceAccountKey::load(&setting))
        .transpose()
        .map_err(|err| ConfigError::Message(format!("FIREBASE_SERVICE_ACCOUNT: {}", err)))?;
    // Cloud Run and GCE expose application default credentials via the metadata server
    let on_google_cloud = env("K_SERVICE").is_some() || env("GOOGLE_CLOUD_PROJECT").is_some();
    let access_token = env("FIRESTORE_ACCESS_TOKEN");

    let project_id = env("FIRESTORE_PROJECT_ID")
        .or_else(|| env("GOOGLE_CLOUD_PROJECT"))
        .or_else(|| service_account.as_ref().and_then(|key| key.project_id.clone()));
    let firestore_configured = project_id.is_some()
        || service_account.is_some()
        || access_token.is_some()
        || on_google_cloud;
    let backend = env("DOCUMENT_STORE")
        .map(|value| value.trim().to_lowercase())
        .or_else(|| firestore_configured.then(|| "firestore".to_string()));

    let settings = builder
        .set_default("app_host", "0.0.0.0")?
        .set_default("app_port", 8080)?
        .set_default("admin_password", "")?
        .set_default("cors_origin", "http://localhost:5173")?
        .set_default("static_dir", "./static")?
        .set_override_option("app_host", env("APP_HOST"))?
        .set_override_option("app_port", env("PORT"))?
        .set_override_option("admin_password", env("ADMIN_PASSWORD"))?
        .set_override_option("cors_origin", env("CORS_ORIGIN"))?
        .set_override_option("static_dir", env("STATIC_DIR"))?
        .set_override_option("document_store.workshop_id", env("SUBSCOLLECTION_ID"))?
        .set_override_option("document_store.project_id", project_id)?
        .set_override_option("document_store.backend", backend)?
        .set_override_option("document_store.base_url", env("FIRESTORE_BASE_URL"))?
        .build()?;

    let mut settings: Settings = settings.try_deserialize()?;
    settings.document_store.credentials = match (access_token, service_account) {
        (Some(token), _) => Credentials::AccessToken(token),
        (None, _) if on_google_cloud => Credentials::MetadataServer,
        (None, Some(key)) => Credentials::ServiceAccount(key),
        (None, None) => Credentials::None,
    };
    settings.validate()?;

    Ok(settings)
}
