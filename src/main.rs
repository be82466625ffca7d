use pokedex_api::cli::Cli;
use pokedex_api::config::Config;
use pokedex_api::server::{self, AppState};
use pokedex_api::storage::StorageProvider;
use pokedex_api::telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> pokedex_api::error::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .init();

    let config = Config::from_sources(&cli)?;
    telemetry::init_telemetry()?;

    // Resolve storage eagerly: a bad backend selector or missing table name
    // must abort startup, not surface on the first request.
    let provider = StorageProvider::new(config.storage.clone());
    let store = match provider.get_storage().await {
        Ok(store) => store,
        Err(e) => {
            error!("failed to initialize storage: {e}");
            return Err(e);
        }
    };

    let state = Arc::new(AppState::new(store));
    let app = server::router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("pokedex api listening on {addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
