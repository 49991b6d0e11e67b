use std::net::TcpListener;
use std::sync::Arc;
use workshop::configuration::Settings;
use workshop::connectors::{DocumentStore, DocumentStoreConfig, MemoryDocumentStore, StoreBackend};

pub const ADMIN_PASSWORD: &str = "test-password";

pub struct TestApp {
    pub address: String,
    pub store: Arc<dyn DocumentStore>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn login(&self) -> String {
        let body: serde_json::Value = reqwest::Client::new()
            .post(self.url("/api/admin/login"))
            .json(&serde_json::json!({ "password": ADMIN_PASSWORD }))
            .send()
            .await
            .expect("Failed to execute request.")
            .json()
            .await
            .expect("Login response should be JSON");

        body["token"]
            .as_str()
            .expect("Login response should carry a token")
            .to_string()
    }
}

pub fn test_settings() -> Settings {
    Settings {
        app_host: "127.0.0.1".to_string(),
        app_port: 0,
        admin_password: ADMIN_PASSWORD.to_string(),
        cors_origin: "http://localhost:5173/".to_string(),
        static_dir: "./does-not-exist".to_string(),
        document_store: DocumentStoreConfig {
            backend: Some(StoreBackend::Memory),
            ..DocumentStoreConfig::default()
        },
    }
}

pub async fn spawn_app_with_configuration(configuration: Settings) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
    let server = workshop::startup::run(listener, configuration, store.clone())
        .await
        .expect("Failed to bind address.");

    let _ = tokio::spawn(server);

    TestApp { address, store }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_configuration(test_settings()).await
}
