use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::history::DEFAULT_MAX_TURNS;
use crate::prompts::{DEFAULT_GREETING, DEFAULT_SYSTEM_PROMPT};

/// Environment variable that overrides the endpoint from the config file
pub const ENDPOINT_ENV: &str = "CHATRELAY_ENDPOINT_URL";

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL of the completion worker. The worker holds any API secret itself.
    pub endpoint_url: Option<String>,

    /// Base system prompt sent as the first message
    pub system_prompt: String,

    /// Maximum number of user/assistant turns kept in the conversation
    pub max_history: usize,

    /// Greeting printed when a chat starts
    pub greeting: String,

    /// Name applied to the session at start
    pub user_name: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint_url: None,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_history: DEFAULT_MAX_TURNS,
            greeting: DEFAULT_GREETING.to_string(),
            user_name: None,
        }
    }
}

impl Config {
    /// `~/.chatrelay`
    pub fn home_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".chatrelay"))
    }

    /// `~/.chatrelay/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location, then apply the environment
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        let mut config = Self::load_from(&path)?;
        config.apply_env(std::env::var(ENDPOINT_ENV).ok());
        Ok(config)
    }

    /// Load configuration from a file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config: Config = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            Config::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;
        fs::write(path, content)
            .context("Failed to write config file")?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_history == 0 {
            bail!("max_history must be at least 1");
        }
        Ok(())
    }

    /// An endpoint from the environment replaces the file value when non-blank
    pub fn apply_env(&mut self, endpoint: Option<String>) {
        if let Some(url) = endpoint.filter(|url| !url.trim().is_empty()) {
            self.endpoint_url = Some(url);
        }
    }

    /// Apply command-line values on top of file and environment, then re-check limits
    pub fn apply_overrides(
        &mut self,
        endpoint: Option<String>,
        max_history: Option<usize>,
        user_name: Option<String>,
    ) -> Result<()> {
        if let Some(url) = endpoint {
            self.endpoint_url = Some(url);
        }
        if let Some(max_history) = max_history {
            self.max_history = max_history;
        }
        if let Some(name) = user_name {
            self.user_name = Some(name);
        }
        self.validate()
    }

    /// Endpoint URL, trimmed; `None` when unset or blank
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn has_endpoint(&self) -> bool {
        self.endpoint().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.max_history, 10);
        assert!(!config.has_endpoint());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            endpoint_url: Some("https://worker.example.dev/".to_string()),
            max_history: 4,
            user_name: Some("Ada".to_string()),
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults_for_rest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "endpoint_url = \"http://localhost:8787\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.endpoint(), Some("http://localhost:8787"));
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_zero_history_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_history = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("max_history"));
    }

    #[test]
    fn test_blank_endpoint_counts_as_unset() {
        let config = Config {
            endpoint_url: Some("   ".to_string()),
            ..Config::default()
        };
        assert_eq!(config.endpoint(), None);
    }

    #[test]
    fn test_env_overrides_file_unless_blank() {
        let mut config = Config {
            endpoint_url: Some("http://file".to_string()),
            ..Config::default()
        };
        config.apply_env(Some(" ".to_string()));
        assert_eq!(config.endpoint(), Some("http://file"));

        config.apply_env(Some("http://env".to_string()));
        assert_eq!(config.endpoint(), Some("http://env"));
    }

    #[test]
    fn test_flags_override_env_and_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "endpoint_url = \"http://file\"\nmax_history = 6\nuser_name = \"Ada\"\n",
        )
        .unwrap();

        let mut config = Config::load_from(&path).unwrap();
        config.apply_env(Some("http://env".to_string()));
        config
            .apply_overrides(
                Some("http://flag".to_string()),
                Some(3),
                Some("Grace".to_string()),
            )
            .unwrap();

        assert_eq!(config.endpoint(), Some("http://flag"));
        assert_eq!(config.max_history, 3);
        assert_eq!(config.user_name.as_deref(), Some("Grace"));
    }

    #[test]
    fn test_absent_flags_keep_lower_layers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "endpoint_url = \"http://file\"\nmax_history = 6\n").unwrap();

        let mut config = Config::load_from(&path).unwrap();
        config.apply_env(Some("http://env".to_string()));
        config.apply_overrides(None, None, None).unwrap();

        assert_eq!(config.endpoint(), Some("http://env"));
        assert_eq!(config.max_history, 6);
        assert_eq!(config.user_name, None);
    }

    #[test]
    fn test_zero_history_flag_is_rejected() {
        let mut config = Config::default();
        let err = config.apply_overrides(None, Some(0), None).unwrap_err();
        assert!(err.to_string().contains("max_history"));
    }
}
