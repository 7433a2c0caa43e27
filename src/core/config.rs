use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::core::constants::{BACKEND_URL_ENV, DEFAULT_BACKEND_URL};
use crate::utils::url::normalize_base_url;

/// Errors that can occur when locating or loading configuration from disk.
#[derive(Debug)]
pub enum ConfigError {
    /// The platform offers no configuration directory for this user.
    NoConfigDir,

    /// Failed to read the configuration file from disk.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse the configuration file as valid TOML.
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoConfigDir => write!(f, "Failed to determine config directory"),
            ConfigError::Read { path, source } => {
                write!(f, "Failed to read config at {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "Failed to parse config at {}: {}", path.display(), source)
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::NoConfigDir => None,
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the policy backend (e.g., "http://localhost:5000")
    pub backend_url: Option<String>,
    /// Dark palette when true; light when false or unset
    pub dark_theme: Option<bool>,
}

impl Config {
    pub fn load() -> Result<Config, Box<dyn StdError>> {
        let config_path = Self::get_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn load_from_path(config_path: &Path) -> Result<Config, Box<dyn StdError>> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), Box<dyn StdError>> {
        let config_path = Self::get_config_path()?;
        self.save_to_path(&config_path)
    }

    pub fn save_to_path(&self, config_path: &Path) -> Result<(), Box<dyn StdError>> {
        let parent = config_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty());

        if let Some(dir) = parent {
            fs::create_dir_all(dir)?;
        }

        let contents = toml::to_string_pretty(self)?;
        let mut temp_file = match parent {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new()?,
        };

        temp_file.write_all(contents.as_bytes())?;
        temp_file.as_file_mut().sync_all()?;
        temp_file
            .persist(config_path)
            .map_err(|err| -> Box<dyn StdError> { Box::new(err) })?;
        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf, ConfigError> {
        let proj_dirs = ProjectDirs::from("org", "policy-navigator", "policy-navigator")
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    pub fn is_dark_theme(&self) -> bool {
        self.dark_theme.unwrap_or(false)
    }

    /// Pick the backend URL: command line, then environment, then config file,
    /// then the built-in default.
    pub fn resolve_backend_url(&self, cli_override: Option<&str>) -> String {
        let env_value = std::env::var(BACKEND_URL_ENV).ok();
        self.resolve_backend_url_with_env(cli_override, env_value.as_deref())
    }

    fn resolve_backend_url_with_env(
        &self,
        cli_override: Option<&str>,
        env_value: Option<&str>,
    ) -> String {
        let chosen = cli_override
            .filter(|value| !value.trim().is_empty())
            .or(env_value.filter(|value| !value.trim().is_empty()))
            .or(self.backend_url.as_deref())
            .unwrap_or(DEFAULT_BACKEND_URL);
        normalize_base_url(chosen.trim())
    }

    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.backend_url {
            Some(url) => println!("  backend-url: {url}"),
            None => println!("  backend-url: (unset, using {DEFAULT_BACKEND_URL})"),
        }
        match self.dark_theme {
            Some(true) => println!("  theme: dark"),
            Some(false) => println!("  theme: light"),
            None => println!("  theme: (unset, using light)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_config() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("nonexistent_config.toml");

        let config = Config::load_from_path(&config_path).expect("Failed to load config");

        assert_eq!(config, Config::default());
        assert!(!config.is_dark_theme());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            backend_url: Some("http://policy.internal:8080".to_string()),
            dark_theme: Some(true),
        };
        config
            .save_to_path(&config_path)
            .expect("Failed to save config");

        let loaded = Config::load_from_path(&config_path).expect("Failed to load config");
        assert_eq!(loaded, config);
        assert!(loaded.is_dark_theme());
    }

    #[test]
    fn test_theme_flag_uses_fixed_key() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("config.toml");

        let config = Config {
            backend_url: None,
            dark_theme: Some(false),
        };
        config.save_to_path(&config_path).expect("save");

        let contents = fs::read_to_string(&config_path).expect("read");
        assert!(contents.contains("dark_theme = false"));
    }

    #[test]
    fn test_invalid_toml_reports_parse_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "dark_theme = [").expect("write");

        let err = Config::load_from_path(&config_path).expect_err("parse should fail");
        assert!(err.to_string().starts_with("Failed to parse config at"));
    }

    #[test]
    fn test_backend_url_precedence() {
        let config = Config {
            backend_url: Some("http://from-config:5000/".to_string()),
            dark_theme: None,
        };

        assert_eq!(
            config.resolve_backend_url_with_env(Some("http://cli:1"), Some("http://env:2")),
            "http://cli:1"
        );
        assert_eq!(
            config.resolve_backend_url_with_env(None, Some("http://env:2")),
            "http://env:2"
        );
        assert_eq!(
            config.resolve_backend_url_with_env(Some("  "), None),
            "http://from-config:5000"
        );
        assert_eq!(
            Config::default().resolve_backend_url_with_env(None, None),
            DEFAULT_BACKEND_URL
        );
    }
}
