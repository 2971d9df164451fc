use datalens::{config::Settings, db, routes, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "datalens=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;
    settings.validate_production()?;
    tracing::info!(
        environment = %settings.environment,
        algorithm = ?settings.jwt.algorithm,
        "Configuration loaded"
    );

    // Database connection
    let pool = db::create_pool(&settings.database_url).await?;

    // Run migrations
    db::run_migrations(&pool).await?;

    let app_state = AppState::new(pool, &settings.jwt);
    let app = routes::app(app_state, &settings);

    // Start server
    let addr = settings.bind_addr();
    tracing::info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
