use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let database_path = std::env::var("DATABASE_PATH")
            .unwrap_or_else(|_| "calorie_tracker.redb".into())
            .into();
        Ok(Self { database_path })
    }
}
