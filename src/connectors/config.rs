use super::document_store::credentials::Credentials;
use serde::{Deserialize, Serialize};

/// Which document store backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Firestore,
    /// Non-persistent, for local runs only
    Memory,
}

/// Document store connector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentStoreConfig {
    /// Unset means nothing was configured; startup refuses to guess
    pub backend: Option<StoreBackend>,
    /// Base URL of the Firestore REST API (or the emulator, e.g. http://localhost:8081)
    pub base_url: String,
    /// Metadata server used for application default credentials
    pub metadata_url: String,
    pub project_id: String,
    pub database_id: String,
    /// Workshop document every collection is nested under (`workshops/{workshop_id}/...`)
    pub workshop_id: String,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    /// Number of attempts for requests failing with a server error
    pub retry_attempts: usize,
    pub page_size: u32,
    /// Resolved from the environment at load time; `None` is only valid against an emulator
    #[serde(skip)]
    pub credentials: Credentials,
}

impl DocumentStoreConfig {
    pub const PRODUCTION_BASE_URL: &'static str = "https://firestore.googleapis.com";

    pub fn targets_production(&self) -> bool {
        self.base_url.trim_end_matches('/') == Self::PRODUCTION_BASE_URL
    }
}

impl Default for DocumentStoreConfig {
    fn default() -> Self {
        Self {
            backend: None,
            base_url: Self::PRODUCTION_BASE_URL.to_string(),
            metadata_url: "http://metadata.google.internal".to_string(),
            project_id: String::new(),
            database_id: "(default)".to_string(),
            workshop_id: String::new(),
            timeout_secs: 10,
            retry_attempts: 3,
            page_size: 300,
            credentials: Credentials::None,
        }
    }
}
