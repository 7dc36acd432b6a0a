use std::net::SocketAddr;

use sea_orm::{ConnectOptions, Database};
use tracing::info;
use tracing_subscriber::EnvFilter;

use catering_site::config::Config;
use catering_site::entities::{seed_demo, setup_schema};
use catering_site::{create_app, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let mut options = ConnectOptions::new(config.database_url.clone());
    options.sqlx_logging(false);
    if config.database_url.starts_with("sqlite:") {
        // One writer at a time; visit inserts queue behind admin transactions.
        options.max_connections(1);
    }
    let db = Database::connect(options).await?;
    setup_schema(&db).await?;

    if config.seed_demo {
        seed_demo(&db).await?;
    }

    let bind_address = config.bind_address;
    let app = create_app(AppState::new(db, config));

    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    info!(address = %listener.local_addr()?, "Listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
