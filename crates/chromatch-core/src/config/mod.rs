//! Configuration management.
//!
//! Loads `chromatch.yml` from the usual locations, keeps the result in a
//! process-wide handle and reports where it came from.

mod defaults;

pub use defaults::{CorrectionDefaults, DEFAULT_MATRIX_PRECISION};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Once, OnceLock};

use serde::Deserialize;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "CHROMATCH_CONFIG";

/// Canonical list of candidate config file names we search for on disk.
const CONFIG_FILENAMES: &[&str] = &["chromatch.yml", "chromatch.yaml"];

/// The loaded configuration, its source path, and any warnings.
#[derive(Debug)]
pub struct ConfigHandle {
    pub config: Config,
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

impl ConfigHandle {
    fn with_config(config: Config, source: Option<PathBuf>, warnings: Vec<String>) -> Self {
        Self {
            config,
            source,
            warnings,
        }
    }
}

/// Complete configuration file structure.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub defaults: CorrectionDefaults,
}

impl Config {
    fn sanitize(mut self) -> Self {
        self.defaults.sanitize();
        self
    }
}

/// Load configuration from disk, optionally forcing a specific path first.
///
/// The first candidate that parses wins. Unreadable or malformed candidates
/// are skipped with a warning.
pub fn load_config(custom_path: Option<&Path>) -> ConfigHandle {
    let mut warnings = Vec::new();

    for candidate in config_candidates(custom_path) {
        if !candidate.is_file() {
            if custom_path == Some(candidate.as_path()) {
                warnings.push(format!("Config file {} not found", candidate.display()));
            }
            continue;
        }

        match fs::read_to_string(&candidate) {
            Ok(contents) => match serde_yaml::from_str::<Config>(&contents) {
                Ok(config) => {
                    let source = fs::canonicalize(&candidate).unwrap_or(candidate);
                    return ConfigHandle::with_config(config.sanitize(), Some(source), warnings);
                }
                Err(err) => warnings.push(format!(
                    "Failed to parse config {}: {}",
                    candidate.display(),
                    err
                )),
            },
            Err(err) => warnings.push(format!(
                "Failed to read config {}: {}",
                candidate.display(),
                err
            )),
        }
    }

    ConfigHandle::with_config(Config::default(), None, warnings)
}

/// Get list of config file candidates to try, most specific first
fn config_candidates(custom_path: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = custom_path {
        candidates.push(path.to_path_buf());
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        candidates.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(cwd.join("config").join(name));
            candidates.push(cwd.join(name));
        }
    }

    if let Some(home_dir) = dirs::home_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(home_dir.join("chromatch").join(name));
        }
    }

    candidates
}

static CONFIG_HANDLE: OnceLock<ConfigHandle> = OnceLock::new();
static LOG_CONFIG_ONCE: Once = Once::new();

/// Load the process-wide configuration, honouring `custom_path` on first use.
///
/// Later calls return the handle from the first call.
pub fn init_config(custom_path: Option<&Path>) -> &'static ConfigHandle {
    CONFIG_HANDLE.get_or_init(|| load_config(custom_path))
}

/// Access the process-wide configuration (loaded once per process).
pub fn config_handle() -> &'static ConfigHandle {
    init_config(None)
}

/// Log the config source and warnings the first time it is requested.
pub fn log_config_usage() {
    LOG_CONFIG_ONCE.call_once(|| {
        let handle = config_handle();
        match &handle.source {
            Some(source) => log::info!("Loaded config from {}", source.display()),
            None => log::info!("Using built-in defaults"),
        }

        for warning in &handle.warnings {
            log::warn!("Config warning: {}", warning);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_explicit_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.yml");
        fs::write(
            &path,
            "defaults:\n  parallel: true\n  max_condition_number: 1.0e6\n",
        )
        .unwrap();

        let handle = load_config(Some(&path));
        assert!(handle.source.is_some());
        assert!(handle.config.defaults.parallel);
        assert_eq!(handle.config.defaults.max_condition_number, 1.0e6);
        // Unspecified fields fall back to defaults
        assert_eq!(
            handle.config.defaults.matrix_precision,
            DEFAULT_MATRIX_PRECISION
        );
    }

    #[test]
    fn test_loaded_config_is_sanitized() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chromatch.yml");
        fs::write(&path, "defaults:\n  parallel_threshold: 0\n").unwrap();

        let handle = load_config(Some(&path));
        assert_eq!(handle.config.defaults.parallel_threshold, 1);
    }

    #[test]
    fn test_malformed_config_produces_warning() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.yml");
        fs::write(&path, "defaults: [not, a, mapping\n").unwrap();

        let handle = load_config(Some(&path));
        assert!(handle
            .warnings
            .iter()
            .any(|w| w.contains("Failed to parse config") && w.contains("broken.yml")));
    }

    #[test]
    fn test_missing_explicit_config_produces_warning() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.yml");

        let handle = load_config(Some(&path));
        assert!(handle.warnings.iter().any(|w| w.contains("absent.yml")));
    }

    #[test]
    fn test_explicit_path_is_first_candidate() {
        let custom = Path::new("/tmp/somewhere/chromatch.yml");
        let candidates = config_candidates(Some(custom));
        assert_eq!(candidates[0], custom);
        assert!(candidates.len() > 1);
    }
}
