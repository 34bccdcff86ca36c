use serde::{Deserialize, Serialize};

use crate::errors::GenError;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConnectionConfig {
    pub database_url: String,
    pub max_connections: u32,
}

impl ConnectionConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Builds the config from an explicit URL, falling back to `DATABASE_URL`.
    pub fn resolve(database_url: Option<String>) -> Result<Self, GenError> {
        let url = database_url
            .or_else(|| std::env::var("DATABASE_URL").ok())
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                GenError::Config("DATABASE_URL must be set or --database-url given".to_string())
            })?;

        if !url.starts_with("mysql://") && !url.starts_with("mariadb://") {
            return Err(GenError::Config(format!(
                "unsupported database url `{}`, expected mysql://",
                url
            )));
        }

        Ok(Self::new(url))
    }
}
