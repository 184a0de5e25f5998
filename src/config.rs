use std::env;

use crate::aggregators::DEFAULT_WINDOW_DAYS;
use crate::error::AppError;

pub const MAX_WINDOW_DAYS: u32 = 365;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub port: u16,
    pub dashboard_username: String,
    pub dashboard_password: String,
    pub window_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "analytics.db".to_string(),
            port: 3000,
            dashboard_username: "admin".to_string(),
            dashboard_password: "admin".to_string(),
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let port = match env::var("FOLIO_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|e| AppError::Config(format!("invalid FOLIO_PORT {raw:?}: {e}")))?,
            Err(_) => defaults.port,
        };

        let window_days = match env::var("FOLIO_WINDOW_DAYS") {
            Ok(raw) => parse_window_days(&raw)?,
            Err(_) => defaults.window_days,
        };

        Ok(Self {
            database_path: env::var("FOLIO_DATABASE_PATH").unwrap_or(defaults.database_path),
            port,
            dashboard_username: env::var("DASHBOARD_USERNAME")
                .unwrap_or(defaults.dashboard_username),
            dashboard_password: env::var("DASHBOARD_PASSWORD")
                .unwrap_or(defaults.dashboard_password),
            window_days,
        })
    }
}

fn parse_window_days(raw: &str) -> Result<u32, AppError> {
    match raw.parse::<u32>() {
        Ok(days) if (1..=MAX_WINDOW_DAYS).contains(&days) => Ok(days),
        _ => Err(AppError::Config(format!(
            "FOLIO_WINDOW_DAYS must be between 1 and {MAX_WINDOW_DAYS}, got {raw:?}"
        ))),
    }
}
