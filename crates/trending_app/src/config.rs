//! RON configuration for the trending binary.
//!
//! Every field has a default, so an empty file (or none at all) gives the
//! production setup.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use engine_logging::LogDestination;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use trending_engine::{FetchSettings, HarvestSettings, ASPECT_BASE_URL, DEFAULT_OUTPUT_FILENAME};

/// Looked up in the data directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILENAME: &str = "trending.ron";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendingConfig {
    pub base_url: String,
    /// Defaults to `~/.netrc`.
    pub netrc_path: Option<PathBuf>,
    /// Defaults to the compiled-in template.
    pub template_path: Option<PathBuf>,
    pub output_filename: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub concurrency: usize,
    pub log_level: String,
    pub log_target: LogTarget,
    pub log_file: PathBuf,
}

impl Default for TrendingConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            base_url: ASPECT_BASE_URL.to_string(),
            netrc_path: None,
            template_path: None,
            output_filename: DEFAULT_OUTPUT_FILENAME.to_string(),
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            request_timeout_secs: fetch.request_timeout.as_secs(),
            redirect_limit: fetch.redirect_limit,
            max_bytes: fetch.max_bytes,
            concurrency: HarvestSettings::default().concurrency,
            log_level: "info".to_string(),
            log_target: LogTarget::Terminal,
            log_file: PathBuf::from("trending.log"),
        }
    }
}

impl TrendingConfig {
    /// Reads `explicit` if given (it must exist), otherwise
    /// `{data_dir}/trending.ron` if present, otherwise the defaults.
    /// Reads the configuration and reports which file it came from, `None`
    /// meaning built-in defaults. Runs before logging is set up, so it logs
    /// nothing itself.
    pub fn load(explicit: Option<&Path>, data_dir: &Path) -> Result<(Self, Option<PathBuf>)> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = data_dir.join(DEFAULT_CONFIG_FILENAME);
                if !candidate.exists() {
                    return Ok((Self::default(), None));
                }
                candidate
            }
        };
        let text = fs::read_to_string(&path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        let config = Self::from_ron(&text).with_context(|| format!("invalid config {}", path.display()))?;
        Ok((config, Some(path)))
    }

    pub fn from_ron(text: &str) -> Result<Self> {
        let config: Self = ron::from_str(text)?;
        config.log_level_filter()?;
        Ok(config)
    }

    pub fn log_level_filter(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| anyhow!("unknown log level {:?}", self.log_level))
    }

    pub fn log_destination(&self) -> LogDestination {
        match self.log_target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File(self.log_file.clone()),
            LogTarget::Both => LogDestination::Both(self.log_file.clone()),
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            redirect_limit: self.redirect_limit,
            max_bytes: self.max_bytes,
            ..FetchSettings::default()
        }
    }

    pub fn harvest_settings(&self) -> HarvestSettings {
        HarvestSettings {
            concurrency: self.concurrency.max(1),
        }
    }

    pub fn netrc_path(&self) -> Option<PathBuf> {
        self.netrc_path
            .clone()
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".netrc")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(TrendingConfig::from_ron("()").unwrap(), TrendingConfig::default());
    }

    #[test]
    fn partial_config_overrides_only_named_fields() {
        let config = TrendingConfig::from_ron(
            r#"(base_url: "https://mirror.test/ASPECT", concurrency: 4, log_target: Both)"#,
        )
        .unwrap();

        assert_eq!(config.base_url, "https://mirror.test/ASPECT");
        assert_eq!(config.harvest_settings().concurrency, 4);
        assert_eq!(config.output_filename, "ssawg_trending.html");
        assert_eq!(
            config.log_destination(),
            LogDestination::Both(PathBuf::from("trending.log"))
        );
    }

    #[test]
    fn timeouts_flow_into_fetch_settings() {
        let config =
            TrendingConfig::from_ron("(request_timeout_secs: 5, max_bytes: 1024)").unwrap();
        let fetch = config.fetch_settings();

        assert_eq!(fetch.request_timeout, Duration::from_secs(5));
        assert_eq!(fetch.max_bytes, 1024);
        assert_eq!(fetch.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn bad_log_level_is_rejected() {
        assert!(TrendingConfig::from_ron(r#"(log_level: "chatty")"#).is_err());
    }

    #[test]
    fn missing_default_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let (config, source) = TrendingConfig::load(None, temp.path()).unwrap();
        assert_eq!(config, TrendingConfig::default());
        assert_eq!(source, None);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(TrendingConfig::load(Some(&temp.path().join("nope.ron")), temp.path()).is_err());
    }

    #[test]
    fn explicit_file_wins_over_the_data_dir() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(DEFAULT_CONFIG_FILENAME), "(concurrency: 2)").unwrap();
        let explicit = temp.path().join("night.ron");
        fs::write(&explicit, "(concurrency: 4)").unwrap();

        let (config, source) = TrendingConfig::load(Some(&explicit), temp.path()).unwrap();
        assert_eq!(config.concurrency, 4);
        assert_eq!(source, Some(explicit));
    }

    #[test]
    fn config_in_data_dir_is_picked_up() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(DEFAULT_CONFIG_FILENAME), "(concurrency: 2)").unwrap();

        let (config, source) = TrendingConfig::load(None, temp.path()).unwrap();
        assert_eq!(config.concurrency, 2);
        assert_eq!(source, Some(temp.path().join(DEFAULT_CONFIG_FILENAME)));
    }
}
