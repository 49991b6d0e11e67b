use anyhow::Context;
use std::net::TcpListener;
use workshop::configuration::get_configuration;
use workshop::connectors;
use workshop::startup::run;
use workshop::telemetry::{get_subscriber, init_subscriber};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("workshop".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let settings = get_configuration().context("Failed to read configuration.")?;
    let store = connectors::init_document_store(&settings.document_store)
        .context("Failed to initialize the document store.")?;

    let address = settings.address();
    tracing::info!("Start server at {:?}", &address);
    let listener = TcpListener::bind(&address)
        .with_context(|| format!("failed to bind to {}", address))?;

    run(listener, settings, store).await?.await?;
    Ok(())
}
