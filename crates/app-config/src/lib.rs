// In crates/app-config/src/lib.rs

use config::{Config, Environment, File, FileFormat};
use core_types::MIN_HISTORY_BARS;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{AppSettings, DatabaseSettings, ScreenerSettings, Settings};

/// Loads the application settings from various sources.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `base.toml` file.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables.
pub fn load_settings() -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

    let settings = Config::builder()
        .add_source(File::with_name("config/base"))
        .add_source(File::with_name(&format!("config/{}", environment)).required(false))
        // e.g. `APP_DATABASE__URL=...`; the prefix is `APP`, the separator `__`.
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    validate(settings.try_deserialize()?)
}

/// Parses settings from a TOML document, without files or environment.
pub fn settings_from_toml(content: &str) -> Result<Settings> {
    let settings = Config::builder()
        .add_source(File::from_str(content, FileFormat::Toml))
        .build()?;

    validate(settings.try_deserialize()?)
}

fn validate(settings: Settings) -> Result<Settings> {
    if settings.app.history_bars < MIN_HISTORY_BARS {
        return Err(Error::Invalid(format!(
            "app.history_bars must be at least {MIN_HISTORY_BARS}, got {}",
            settings.app.history_bars
        )));
    }
    if settings.app.workers == 0 {
        return Err(Error::Invalid("app.workers must be at least 1".into()));
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [app]
        environment = "test"
        log_level = "debug"

        [database]
        url = "postgres://localhost/screener"
    "#;

    #[test]
    fn fills_defaults() {
        let settings = settings_from_toml(MINIMAL).unwrap();
        assert_eq!(settings.app.workers, 8);
        assert_eq!(settings.app.history_bars, 250);
        assert_eq!(settings.database.max_connections, 5);
        assert!(settings.screener.index_codes.contains(&"000300.SH".to_string()));
    }

    #[test]
    fn rejects_short_history_window() {
        let content = MINIMAL.replace("log_level = \"debug\"", "log_level = \"debug\"\nhistory_bars = 20");
        assert!(matches!(settings_from_toml(&content), Err(Error::Invalid(_))));
    }

    #[test]
    fn index_codes_can_be_overridden() {
        let content = format!("{MINIMAL}\n[screener]\nindex_codes = [\"000001.SH\"]\n");
        let settings = settings_from_toml(&content).unwrap();
        assert_eq!(settings.screener.index_codes, vec!["000001.SH".to_string()]);
    }
}
