use std::net::SocketAddr;
use tokio_rusqlite::Connection;
use tracing::info;
use tracing_subscriber::EnvFilter;

use folio_analytics::{build_app, migrations, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting folio-analytics server...");

    let config = Config::from_env()?;

    let db = Connection::open(&config.database_path).await?;
    migrations::initialize_database(&db).await?;
    info!("Using database at {}", config.database_path);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = build_app(AppState::new(db, config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
