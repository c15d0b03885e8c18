//! Configuration and path resolution for the CLI.
//!
//! Handles finding the corpus data directory, the model directory and the
//! optional engine configuration file:
//! - Custom: command-line flags and environment variables (resolved by clap)
//! - Default: the platform data directory

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use polysearch_core::config::SearchConfig;
use std::path::{Path, PathBuf};

/// Subdirectory of the data directory holding model files
const MODEL_SUBDIR: &str = "model";

/// Returns the corpus data directory.
///
/// Without an explicit directory this is the platform data location:
/// - macOS: `~/Library/Application Support/dev.polysearch.Polysearch/`
/// - Linux: `~/.local/share/polysearch/`
/// - Windows: `%APPDATA%\polysearch\Polysearch\data\`
pub fn get_data_dir(custom_dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = custom_dir {
        return Ok(dir.clone());
    }

    ProjectDirs::from("dev", "polysearch", "Polysearch")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| anyhow!("Could not determine data directory"))
}

/// Returns the directory holding `model.safetensors`, `config.json` and
/// `tokenizer.json`. Defaults to `<data dir>/model`.
#[cfg_attr(not(feature = "model"), allow(dead_code))]
pub fn get_model_dir(custom_dir: Option<&PathBuf>, data_dir: &Path) -> PathBuf {
    custom_dir
        .cloned()
        .unwrap_or_else(|| data_dir.join(MODEL_SUBDIR))
}

/// Loads a JSON engine configuration, or the defaults when no file is given.
///
/// Missing fields take their defaults; the result is validated.
pub fn load_search_config(path: Option<&Path>) -> Result<SearchConfig> {
    let config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str::<SearchConfig>(&raw)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        }
        None => SearchConfig::default(),
    };

    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polysearch_core::language::Language;
    use tempfile::TempDir;

    #[test]
    fn test_get_data_dir() {
        let dir = get_data_dir(None).unwrap();
        let dir_str = dir.to_string_lossy().to_lowercase();
        assert!(
            dir_str.contains("polysearch"),
            "Data dir should use project identifier: {}",
            dir_str
        );
    }

    #[test]
    fn test_custom_data_dir() {
        let custom = PathBuf::from("/tmp/custom-data");
        let dir = get_data_dir(Some(&custom)).unwrap();
        assert_eq!(dir, custom);
    }

    #[test]
    fn test_model_dir_defaults_under_data_dir() {
        let data = PathBuf::from("/srv/polysearch");
        assert_eq!(get_model_dir(None, &data), data.join("model"));

        let custom = PathBuf::from("/opt/models/minilm");
        assert_eq!(get_model_dir(Some(&custom), &data), custom);
    }

    #[test]
    fn test_default_config_without_file() {
        let config = load_search_config(None).unwrap();
        assert_eq!(config, SearchConfig::default());
    }

    #[test]
    fn test_partial_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"languages": ["es", "en"], "max_results": 5}"#).unwrap();

        let config = load_search_config(Some(&path)).unwrap();
        assert_eq!(config.languages, vec![Language::Spanish, Language::English]);
        assert_eq!(config.max_results, 5);
        assert_eq!(
            config.relevance_threshold,
            SearchConfig::default().relevance_threshold
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"relevance_threshold": 1.5}"#).unwrap();

        let err = load_search_config(Some(&path)).unwrap_err().to_string();
        assert!(err.contains("Invalid configuration"));
    }

    #[test]
    fn test_missing_config_file() {
        let err = load_search_config(Some(Path::new("/nonexistent/config.json")))
            .unwrap_err()
            .to_string();
        assert!(err.contains("Failed to read config file"));
    }
}
