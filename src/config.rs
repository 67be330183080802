use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IndexConfig {
    #[serde(default = "default_index_path")]
    pub path: PathBuf,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: default_index_path(),
        }
    }
}

fn default_index_path() -> PathBuf {
    PathBuf::from("xkcd_index.json")
}

/// Connection settings for the remote comic API.
#[derive(Debug, Deserialize, Clone)]
pub struct RemoteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Sent on every request; some servers reject empty or library-default agents.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    "https://xkcd.com".to_string()
}
fn default_user_agent() -> String {
    format!("xkcd-index/{}", env!("CARGO_PKG_VERSION"))
}
fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct SyncConfig {
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    #[serde(default = "default_checkpoint_every")]
    pub checkpoint_every: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: default_request_delay_ms(),
            checkpoint_every: default_checkpoint_every(),
        }
    }
}

fn default_request_delay_ms() -> u64 {
    100
}
fn default_checkpoint_every() -> usize {
    50
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
        }
    }
}

fn default_max_results() -> usize {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    #[serde(default = "default_wrap_width")]
    pub wrap_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            wrap_width: default_wrap_width(),
        }
    }
}

fn default_wrap_width() -> usize {
    60
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    let base = &config.remote.base_url;
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        anyhow::bail!("remote.base_url must start with http:// or https://, got '{}'", base);
    }

    if config.remote.timeout_secs == 0 {
        anyhow::bail!("remote.timeout_secs must be > 0");
    }

    if config.sync.checkpoint_every == 0 {
        anyhow::bail!("sync.checkpoint_every must be > 0");
    }

    if config.search.max_results == 0 {
        anyhow::bail!("search.max_results must be >= 1");
    }

    if config.display.wrap_width == 0 {
        anyhow::bail!("display.wrap_width must be > 0");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(content: &str) -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("xkcd.toml");
        std::fs::write(&path, content).unwrap();
        (tmp, path)
    }

    #[test]
    fn empty_file_uses_defaults() {
        let (_tmp, path) = write_config("");
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.index.path, PathBuf::from("xkcd_index.json"));
        assert_eq!(cfg.remote.base_url, "https://xkcd.com");
        assert_eq!(cfg.remote.timeout(), Duration::from_secs(10));
        assert_eq!(cfg.sync.request_delay_ms, 100);
        assert_eq!(cfg.sync.checkpoint_every, 50);
        assert_eq!(cfg.search.max_results, 10);
        assert_eq!(cfg.display.wrap_width, 60);
        assert!(cfg.remote.user_agent.starts_with("xkcd-index/"));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let (_tmp, path) = write_config(
            r#"
[remote]
base_url = "http://127.0.0.1:9000"

[sync]
request_delay_ms = 0
"#,
        );
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.remote.base_url, "http://127.0.0.1:9000");
        assert_eq!(cfg.remote.timeout_secs, 10);
        assert_eq!(cfg.sync.request_delay_ms, 0);
        assert_eq!(cfg.sync.checkpoint_every, 50);
    }

    #[test]
    fn rejects_non_http_base_url() {
        let (_tmp, path) = write_config("[remote]\nbase_url = \"xkcd.com\"\n");
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("remote.base_url"));
    }

    #[test]
    fn rejects_zero_checkpoint_interval() {
        let (_tmp, path) = write_config("[sync]\ncheckpoint_every = 0\n");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_config(&tmp.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
