use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::FptError;

const APP_NAME: &str = "fpt";
const DB_FILE: &str = "freelance_tracker.db";
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_TRUNCATE_WIDTH: usize = 60;
pub const DEFAULT_EXPORT_PATH: &str = "freelance_data.csv";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    /// Character budget for descriptions and notes in table output.
    pub truncate_width: usize,
    pub export_path: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    database_path: Option<PathBuf>,
    truncate_width: Option<usize>,
    export_path: Option<PathBuf>,
}

/// Directory holding the database and `config.json`.
///
/// `FPT_HOME` wins over the platform data directory.
pub fn data_dir() -> Result<PathBuf, FptError> {
    if let Some(home) = env::var_os("FPT_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_NAME))
        .ok_or_else(|| {
            FptError::config(
                "OS data directory could not be determined. Set FPT_HOME or pass --db <path>.",
            )
        })
}

/// Resolve configuration: explicit `--db`/`FPT_DB` > `config.json` > defaults.
pub fn load_config(db_override: Option<PathBuf>) -> Result<Config, FptError> {
    let dir = data_dir()?;
    let partial = read_partial(&dir.join(CONFIG_FILE));

    let database_path = db_override
        .or(partial.database_path)
        .unwrap_or_else(|| dir.join(DB_FILE));
    log::trace!("Config: database_path is {:?}", &database_path);

    let truncate_width = match partial.truncate_width {
        Some(0) => {
            log::warn!("Ignoring truncate_width of 0, using {DEFAULT_TRUNCATE_WIDTH}");
            DEFAULT_TRUNCATE_WIDTH
        }
        Some(width) => width,
        None => DEFAULT_TRUNCATE_WIDTH,
    };

    Ok(Config {
        database_path,
        truncate_width,
        export_path: partial
            .export_path
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_PATH)),
    })
}

fn read_partial(path: &Path) -> PartialConfig {
    log::debug!("Reading configuration at path {:?}", path);
    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Could not parse config at path {:?}: {err}", path);
                PartialConfig::default()
            }
        },
        Err(err) => {
            log::trace!("Could not read {path:?} (assuming no config file): {err}");
            PartialConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_parses_subset() {
        let partial: PartialConfig =
            serde_json::from_str(r#"{"truncate_width": 30}"#).unwrap();
        assert_eq!(partial.truncate_width, Some(30));
        assert!(partial.database_path.is_none());
        assert!(partial.export_path.is_none());
    }

    #[test]
    fn test_read_partial_tolerates_missing_and_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = read_partial(&dir.path().join("nope.json"));
        assert!(missing.truncate_width.is_none());

        let broken = dir.path().join("config.json");
        fs::write(&broken, "{ not json").unwrap();
        let parsed = read_partial(&broken);
        assert!(parsed.database_path.is_none());
    }
}
