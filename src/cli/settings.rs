//! `set` / `unset` handling for the two persisted settings.

use std::fmt;

use crate::core::config::Config;
use crate::utils::url::normalize_base_url;

pub const BACKEND_URL_KEY: &str = "backend-url";
pub const THEME_KEY: &str = "theme";

/// Errors that can occur when modifying configuration settings.
#[derive(Debug, PartialEq, Eq)]
pub enum SettingError {
    /// The provided setting key is not recognized.
    UnknownKey(String),
    /// The value does not fit the key.
    InvalidValue {
        key: &'static str,
        input: String,
        hint: &'static str,
    },
    /// Required arguments are missing.
    MissingArgs {
        hint: &'static str,
        example: &'static str,
    },
}

impl SettingError {
    /// Print the error message to stderr with appropriate formatting.
    pub fn print(&self) {
        match self {
            SettingError::UnknownKey(key) => {
                eprintln!("❌ Unknown config key: {key}");
                eprintln!("   Known keys: {BACKEND_URL_KEY}, {THEME_KEY}");
            }
            SettingError::InvalidValue { key, input, hint } => {
                eprintln!("❌ Invalid value for {key}: {input}");
                eprintln!("   {hint}");
            }
            SettingError::MissingArgs { hint, example } => {
                eprintln!("⚠️  {hint}");
                eprintln!("Example: {example}");
            }
        }
    }
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::UnknownKey(key) => write!(f, "unknown config key: {key}"),
            SettingError::InvalidValue { key, input, .. } => {
                write!(f, "invalid value for {key}: {input}")
            }
            SettingError::MissingArgs { hint, .. } => write!(f, "{hint}"),
        }
    }
}

impl std::error::Error for SettingError {}

/// Apply `set <key> <value>` to `config`, returning the confirmation to print.
pub fn apply_set(config: &mut Config, key: &str, value: &[String]) -> Result<String, SettingError> {
    let value = value.join(" ");
    let value = value.trim();
    match key {
        BACKEND_URL_KEY => {
            if value.is_empty() {
                return Err(SettingError::MissingArgs {
                    hint: "Specify the backend base URL.",
                    example: "policy-navigator set backend-url http://localhost:5000",
                });
            }
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(SettingError::InvalidValue {
                    key: BACKEND_URL_KEY,
                    input: value.to_string(),
                    hint: "The URL must start with http:// or https://",
                });
            }
            let normalized = normalize_base_url(value);
            config.backend_url = Some(normalized.clone());
            Ok(format!("✅ Set {BACKEND_URL_KEY} to: {normalized}"))
        }
        THEME_KEY => {
            let dark = match value.to_ascii_lowercase().as_str() {
                "dark" => true,
                "light" => false,
                "" => {
                    return Err(SettingError::MissingArgs {
                        hint: "Specify a theme.",
                        example: "policy-navigator set theme dark",
                    })
                }
                _ => {
                    return Err(SettingError::InvalidValue {
                        key: THEME_KEY,
                        input: value.to_string(),
                        hint: "Use 'dark' or 'light'",
                    })
                }
            };
            config.dark_theme = Some(dark);
            Ok(format!(
                "✅ Set {THEME_KEY} to: {}",
                if dark { "dark" } else { "light" }
            ))
        }
        other => Err(SettingError::UnknownKey(other.to_string())),
    }
}

/// Apply `unset <key>` to `config`, returning the confirmation to print.
pub fn apply_unset(config: &mut Config, key: &str) -> Result<String, SettingError> {
    match key {
        BACKEND_URL_KEY => config.backend_url = None,
        THEME_KEY => config.dark_theme = None,
        other => return Err(SettingError::UnknownKey(other.to_string())),
    }
    Ok(format!("✅ Unset {key}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn set_backend_url_normalizes_trailing_slash() {
        let mut config = Config::default();
        let message = apply_set(&mut config, "backend-url", &args(&["https://policy.example/"]))
            .expect("set");
        assert_eq!(config.backend_url.as_deref(), Some("https://policy.example"));
        assert!(message.contains("https://policy.example"));
    }

    #[test]
    fn set_backend_url_rejects_non_http_values() {
        let mut config = Config::default();
        let err = apply_set(&mut config, "backend-url", &args(&["localhost:5000"]))
            .expect_err("should fail");
        assert!(matches!(err, SettingError::InvalidValue { .. }));
        assert_eq!(config.backend_url, None);

        let err = apply_set(&mut config, "backend-url", &[]).expect_err("should fail");
        assert!(matches!(err, SettingError::MissingArgs { .. }));
    }

    #[test]
    fn set_theme_accepts_dark_and_light() {
        let mut config = Config::default();
        apply_set(&mut config, "theme", &args(&["Dark"])).expect("set dark");
        assert_eq!(config.dark_theme, Some(true));
        apply_set(&mut config, "theme", &args(&["light"])).expect("set light");
        assert_eq!(config.dark_theme, Some(false));

        let err = apply_set(&mut config, "theme", &args(&["solarized"])).expect_err("invalid");
        assert!(matches!(err, SettingError::InvalidValue { key: THEME_KEY, .. }));
    }

    #[test]
    fn unset_clears_values() {
        let mut config = Config {
            backend_url: Some("http://policy.example".into()),
            dark_theme: Some(true),
        };
        apply_unset(&mut config, "backend-url").expect("unset url");
        apply_unset(&mut config, "theme").expect("unset theme");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut config = Config::default();
        assert_eq!(
            apply_set(&mut config, "model", &args(&["x"])),
            Err(SettingError::UnknownKey("model".into()))
        );
        assert_eq!(
            apply_unset(&mut config, "model"),
            Err(SettingError::UnknownKey("model".into()))
        );
    }
}
