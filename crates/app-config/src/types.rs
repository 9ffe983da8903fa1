// In crates/app-config/src/types.rs

use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Settings for the database connection.
    pub database: DatabaseSettings,
    #[serde(default)]
    pub screener: ScreenerSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
    /// How many instruments the batch runner works on at once.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// How many trailing daily bars feed one indicator calculation.
    #[serde(default = "default_history_bars")]
    pub history_bars: usize,
}

#[derive(Deserialize, Debug, Clone)]
pub struct DatabaseSettings {
    /// The connection URL for the PostgreSQL database.
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ScreenerSettings {
    /// Index tickers that the counter-trend screen leaves out. The first one
    /// present on a given day also serves as the market reference.
    #[serde(default = "default_index_codes")]
    pub index_codes: Vec<String>,
}

impl Default for ScreenerSettings {
    fn default() -> Self {
        Self {
            index_codes: default_index_codes(),
        }
    }
}

/// Helper functions for serde defaults
fn default_workers() -> usize { 8 }
fn default_history_bars() -> usize { 250 }
fn default_max_connections() -> u32 { 5 }

fn default_index_codes() -> Vec<String> {
    [
        "000001.SH", "399001.SZ", "399006.SZ", "000300.SH", "000016.SH", "000905.SH", "000688.SH",
    ]
    .iter()
    .map(|code| code.to_string())
    .collect()
}
