//! Helpdesk entry-point: loads settings, wires the document store and serves
//! the REST API with its OpenAPI document.

use std::sync::Arc;

use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use helpdesk::outbound::document::InMemoryDocumentStore;
use helpdesk::server::{HelpdeskSettings, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = HelpdeskSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let config = ServerConfig::from_settings(&settings)?;

    // The in-memory store stands in for an external document database.
    let store = Arc::new(InMemoryDocumentStore::new());
    create_server(config, store)?.await
}
