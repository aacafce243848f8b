//! Gateway entry-point: wires adapters, schema, and the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, web};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::config::GatewayConfig;
use backend::domain::GatewayState;
use backend::domain::ports::{DocumentStore, IdentityProvider};
use backend::inbound::graphql::{ShapeGuard, build_schema};
use backend::inbound::http::{AppState, graphql, graphql_ws, welcome};
use backend::notify::NotificationBus;
use backend::outbound::github::GithubIdentityProvider;
use backend::outbound::persistence::MemoryDocumentStore;

/// Idle connections are released after this long at the transport boundary.
const IDLE_TIMEOUT: Duration = Duration::from_secs(5);

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %error, "tracing init failed");
    }

    let config = GatewayConfig::parse();
    let (client_id, client_secret) = config.github_credentials();

    let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::default());
    let identity: Arc<dyn IdentityProvider> =
        Arc::new(GithubIdentityProvider::new(client_id, client_secret));
    let gateway = GatewayState::new(store, NotificationBus::new(), identity);
    let schema = build_schema(ShapeGuard::default());

    let state = web::Data::new(AppState { schema, gateway });

    info!(bind = %config.bind, "PhotoShare gateway listening");
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(welcome)
            .service(graphql)
            .service(graphql_ws)
    })
    .keep_alive(IDLE_TIMEOUT)
    .bind(config.bind.as_str())?
    .run()
    .await
}
