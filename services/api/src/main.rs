use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use api::{
    AppState, bootstrap_admin, create_router,
    jwt::TokenService,
    repositories::{Repositories, schema},
    settings::{Settings, Storage},
};
use common::database::{DatabaseConfig, health_check, init_pool};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting menu planner");

    let settings = Settings::from_env()?;

    let repos = match settings.storage {
        Storage::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = init_pool(&db_config).await?;

            if health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            schema::migrate(&pool).await?;
            Repositories::postgres(pool)
        }
        Storage::Memory => {
            warn!("Using in-memory storage, data will not survive a restart");
            Repositories::in_memory()
        }
    };

    match settings.admin_bootstrap() {
        Some(admin) => {
            bootstrap_admin(&repos, &admin).await?;
        }
        None => info!("No administrator configured"),
    }

    let tokens = TokenService::new(&settings.jwt_secret, settings.token_expiry_seconds);
    let app = create_router(AppState::new(repos, tokens, settings.rate_limiter()));

    let address = settings.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Menu planner listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
