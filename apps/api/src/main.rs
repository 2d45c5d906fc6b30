//! ARTCC roster API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod bootstrap;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use artcc_core::AppError;
use tracing::info;

use crate::api_config::{ApiConfig, StorageBackend};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    api_config::init_tracing();

    let config = ApiConfig::load()?;

    let storage = match &config.storage_backend {
        StorageBackend::Postgres {
            database_url,
            max_connections,
        } => {
            let pool =
                api_services::connect_and_migrate(database_url.as_str(), *max_connections).await?;
            if config.migrate_only {
                info!("database migrations applied successfully");
                return Ok(());
            }
            api_services::build_postgres_storage(&pool)
        }
        StorageBackend::Memory => api_services::build_memory_storage()?,
    };

    let app_state =
        api_services::build_app_state(storage, config.roster_decider_groups.as_deref())?;

    if let Some(director) = &config.bootstrap_director {
        bootstrap::seed_division_director(&app_state, director).await?;
    }

    let app = api_router::build_router(app_state, config.frontend_url.as_str())?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind API listener: {error}")))?;

    info!(%address, "artcc api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))?;

    Ok(())
}
