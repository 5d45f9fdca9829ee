use std::sync::Arc;

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod error;
mod hashing;
mod jwt;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod validation;

use crate::hashing::ArgonPinHasher;
use crate::jwt::{JwtConfig, JwtService, TokenIssuer};
use crate::repositories::{PgTransactionRepository, PgUserRepository};
use crate::services::{AuthService, TransactionService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub transaction_service: TransactionService,
    pub tokens: Arc<dyn TokenIssuer>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting banking service");

    // Initialize database connection pool
    let db_config = common::database::DatabaseConfig::from_env()?;
    let pool = common::database::init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Initialize the token service
    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(jwt_config);

    // Wire the collaborators into the domain services
    let user_repository = Arc::new(PgUserRepository::new(pool.clone()));
    let transaction_repository = Arc::new(PgTransactionRepository::new(pool));
    let pin_hasher = Arc::new(ArgonPinHasher);
    let tokens: Arc<dyn TokenIssuer> = Arc::new(jwt_service);

    let auth_service = AuthService::new(user_repository, pin_hasher, tokens.clone());
    let transaction_service = TransactionService::new(transaction_repository);

    let app_state = AppState {
        auth_service,
        transaction_service,
        tokens,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Banking service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
