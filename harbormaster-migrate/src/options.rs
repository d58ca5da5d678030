//! Resolving connection settings from flags, environment and config files

use harbormaster::config::ConfigError;
use harbormaster::Settings;
use std::path::Path;

/// Environment variables consulted for the database URL, in order
pub const DATABASE_URL_VARS: [&str; 2] = ["HARBORMASTER_DATABASE_URL", "DATABASE_URL"];

/// Pick the database URL
///
/// Precedence: `--database-url`, then [`DATABASE_URL_VARS`] via `env`, then the
/// `[database] url` setting. Empty values are skipped.
pub fn resolve_database_url<F>(flag: Option<&str>, env: F, settings: &Settings) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    flag.map(str::to_string)
        .into_iter()
        .chain(DATABASE_URL_VARS.iter().filter_map(|var| env(var)))
        .chain(settings.database.url.clone())
        .map(|url| url.trim().to_string())
        .find(|url| !url.is_empty())
}

/// Load settings from `path` when given, else from the default locations
///
/// Without an explicit path, a failure to load falls back to defaults so that
/// `--database-url` alone is enough to run.
///
/// # Errors
///
/// Returns the loader error only when an explicit `path` cannot be loaded.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    match path {
        Some(path) => Settings::load_from(path),
        None => Ok(Settings::load().unwrap_or_else(|e| {
            log::warn!("Using default settings: {e}");
            Settings::default()
        })),
    }
}
