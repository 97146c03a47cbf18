use hole_scores::{router, AppConfig, AppState, PostgresStore, Repositories};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hole_scores=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting hole scoring server");

    let config = AppConfig::from_env();

    // Storage backend is chosen by configuration and injected into the state
    let repositories = match &config.database_url {
        Some(database_url) => {
            let store = PostgresStore::connect(database_url).await?;
            store.migrate().await?;
            info!("Using PostgreSQL storage");
            Repositories::postgres(store)
        }
        None => {
            info!("DATABASE_URL not set, using in-memory storage");
            Repositories::in_memory()
        }
    };

    let app_state = AppState::new(repositories, &config);
    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(bind_addr = %config.bind_addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
