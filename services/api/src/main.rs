use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use api::{
    jwt::{TokenConfig, TokenService},
    repositories::{ContentRepository, ProgressRepository, UserRepository},
    routes,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting Inkbound API service");

    // Initialize database connection pool
    let db_config = common::database::DatabaseConfig::from_env()?;
    let pool = common::database::init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Apply pending migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|e| common::error::DatabaseError::Migration(e.to_string()))?;

    // Initialize token service
    let token_config = TokenConfig::from_env()?;
    let token_service = TokenService::new(token_config);

    let app_state = AppState {
        db_pool: pool.clone(),
        token_service,
        user_repository: UserRepository::new(pool.clone()),
        progress_repository: ProgressRepository::new(pool.clone()),
        content_repository: ContentRepository::new(pool),
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Inkbound API service listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
