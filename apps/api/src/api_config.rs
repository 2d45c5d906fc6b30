use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use artcc_core::AppError;
use artcc_domain::{Cid, GroupId};
use tracing_subscriber::EnvFilter;

/// Storage backend selected at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    Memory,
}

/// Controller seeded as division director on startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapDirector {
    pub cid: Cid,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub storage_backend: StorageBackend,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub roster_decider_groups: Option<Vec<GroupId>>,
    pub bootstrap_director: Option<BootstrapDirector>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let storage_backend = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_owned())
            .as_str()
        {
            "postgres" => {
                let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .map(|value| {
                        value.parse::<u32>().map_err(|error| {
                            AppError::Validation(format!(
                                "invalid DATABASE_MAX_CONNECTIONS: {error}"
                            ))
                        })
                    })
                    .transpose()?
                    .unwrap_or(10);
                StorageBackend::Postgres {
                    database_url: required_non_empty_env("DATABASE_URL")?,
                    max_connections,
                }
            }
            "memory" => StorageBackend::Memory,
            other => {
                return Err(AppError::Validation(format!(
                    "STORAGE_BACKEND must be either 'postgres' or 'memory', got '{other}'"
                )));
            }
        };

        ensure_migrate_target(migrate_only, &storage_backend)?;

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let roster_decider_groups = env::var("ROSTER_DECIDER_GROUPS")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(|value| parse_group_list(value.as_str()))
            .transpose()?;

        let bootstrap_director = env::var("BOOTSTRAP_DIRECTOR_CID")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(|value| -> Result<BootstrapDirector, AppError> {
                Ok(BootstrapDirector {
                    cid: Cid::from_str(value.as_str())?,
                    first_name: required_non_empty_env("BOOTSTRAP_DIRECTOR_FIRST_NAME")?,
                    last_name: required_non_empty_env("BOOTSTRAP_DIRECTOR_LAST_NAME")?,
                })
            })
            .transpose()?;

        Ok(Self {
            migrate_only,
            storage_backend,
            frontend_url,
            api_host,
            api_port,
            roster_decider_groups,
            bootstrap_director,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_group_list(value: &str) -> Result<Vec<GroupId>, AppError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(GroupId::from_str)
        .collect()
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn ensure_migrate_target(migrate_only: bool, storage_backend: &StorageBackend) -> Result<(), AppError> {
    if migrate_only && storage_backend == &StorageBackend::Memory {
        return Err(AppError::Validation(
            "the migrate command requires STORAGE_BACKEND=postgres".to_owned(),
        ));
    }

    Ok(())
}
