use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::query::QueryBuilderConfig;
use crate::search::{SearchOptions, DEFAULT_BASE_URL, DEFAULT_SITE};

pub const API_KEY_ENV: &str = "STACKSCRAP_API_KEY";

const MAX_RESULTS_LIMIT: u32 = 50;
const MIN_TIMEOUT_MS: u64 = 5_000;
const MAX_TIMEOUT_MS: u64 = 60_000;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Validate)]
#[serde(default)]
pub struct Config {
    #[validate]
    pub query: QueryBuilderConfig,
    pub search: SearchConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub base_url: String,
    pub site: String,
    pub max_results: u32,
    pub search_timeout_ms: u64,
    pub api_key: Option<String>,
    pub filter_by_accepted: bool,
    pub min_score: i64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            site: DEFAULT_SITE.to_string(),
            max_results: 10,
            search_timeout_ms: 15_000,
            api_key: None,
            filter_by_accepted: true,
            min_score: 1,
        }
    }
}

impl SearchConfig {
    /// Request options with out-of-range values clamped to what the API
    /// tolerates.
    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            page_size: self.max_results.clamp(1, MAX_RESULTS_LIMIT),
            timeout_ms: self.search_timeout_ms.clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS),
            api_key: self.api_key.clone().filter(|key| !key.trim().is_empty()),
            accepted_only: self.filter_by_accepted,
        }
    }

    pub fn min_score(&self) -> i64 {
        self.min_score.max(0)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub color_output: bool,
    pub max_answers_shown: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color_output: true,
            max_answers_shown: 1,
        }
    }
}

impl Config {
    pub fn create_default(path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(&Config::default())?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {:?}", path))?;
        config
            .validate()
            .with_context(|| format!("Invalid settings in {:?}", path))?;
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise falls back to the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// An API key in the environment wins over the one in the file.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.search.api_key = Some(key);
            }
        }
        self
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "stackscrap", "stackscrap")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    Ok(proj_dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_round_trips_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        Config::create_default(&path).unwrap();
        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[query]\nmax_keywords = 3\n\n[search]\nmax_results = 25\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.query.max_keywords, 3);
        assert_eq!(config.query.max_query_length, 200);
        assert!(config.query.preserve_code_structure);
        assert_eq!(config.search.max_results, 25);
        assert_eq!(config.search.site, "stackoverflow");
        assert_eq!(config.display, DisplayConfig::default());
    }

    #[test]
    fn test_invalid_query_settings_fail_fast() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        fs::write(&path, "[query]\nmax_query_length = 0\n").unwrap();
        assert!(Config::load(&path).is_err());

        fs::write(&path, "[query]\nmax_keywords = -1\n").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_default_search_prefers_accepted_scored_questions() {
        let search = SearchConfig::default();
        assert!(search.filter_by_accepted);
        assert_eq!(search.min_score(), 1);
        assert!(search.options().accepted_only);
    }

    #[test]
    fn test_search_options_are_clamped() {
        let search = SearchConfig {
            max_results: 500,
            search_timeout_ms: 10,
            api_key: Some("  ".to_string()),
            min_score: -4,
            ..Default::default()
        };
        let options = search.options();
        assert_eq!(options.page_size, 50);
        assert_eq!(options.timeout_ms, 5_000);
        assert_eq!(options.api_key, None);
        assert_eq!(search.min_score(), 0);

        let search = SearchConfig {
            max_results: 0,
            search_timeout_ms: 600_000,
            ..Default::default()
        };
        assert_eq!(search.options().page_size, 1);
        assert_eq!(search.options().timeout_ms, 60_000);
    }
}
