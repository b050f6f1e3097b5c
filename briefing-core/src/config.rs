use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// Env var consulted for the gateway credential when the config names none.
pub const DEFAULT_SENDKEY_ENV: &str = "SERVERCHAN_SENDKEY";

const DEFAULT_FORECAST_DAYS: u32 = 3;

/// Top-level configuration stored on disk. Holds non-secret defaults only;
/// the push credential itself lives in the environment and `sendkey_env` is
/// merely the NAME of the variable to read it from.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Default city for `briefing weather` / `briefing current`.
    pub default_city: Option<String>,

    /// Default number of forecast days, e.g. 3.
    pub forecast_days: Option<u32>,

    /// Name of the env var holding the gateway send key.
    pub sendkey_env: Option<String>,
}

impl Config {
    /// Resolve the city: explicit argument wins, then the stored default.
    pub fn city_or_default(&self, explicit: Option<String>) -> Result<String> {
        explicit.or_else(|| self.default_city.clone()).ok_or_else(|| {
            anyhow!(
                "No city given and no default configured.\n\
                 Hint: pass a city, or run `briefing configure` first."
            )
        })
    }

    pub fn days_or_default(&self, explicit: Option<u32>) -> u32 {
        explicit.or(self.forecast_days).unwrap_or(DEFAULT_FORECAST_DAYS)
    }

    pub fn sendkey_env_name(&self) -> &str {
        self.sendkey_env.as_deref().unwrap_or(DEFAULT_SENDKEY_ENV)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "daily-briefing", "briefing")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_resolution_prefers_the_explicit_argument() {
        let cfg = Config { default_city: Some("茂名".into()), ..Config::default() };

        let city = cfg.city_or_default(Some("北京".into())).unwrap();
        assert_eq!(city, "北京");

        let city = cfg.city_or_default(None).unwrap();
        assert_eq!(city, "茂名");
    }

    #[test]
    fn city_resolution_errors_when_nothing_is_configured() {
        let cfg = Config::default();
        let err = cfg.city_or_default(None).unwrap_err();

        assert!(err.to_string().contains("briefing configure"));
    }

    #[test]
    fn days_fall_back_to_three() {
        let cfg = Config::default();
        assert_eq!(cfg.days_or_default(None), 3);
        assert_eq!(cfg.days_or_default(Some(7)), 7);

        let cfg = Config { forecast_days: Some(5), ..Config::default() };
        assert_eq!(cfg.days_or_default(None), 5);
    }

    #[test]
    fn sendkey_env_defaults_to_serverchan() {
        let cfg = Config::default();
        assert_eq!(cfg.sendkey_env_name(), "SERVERCHAN_SENDKEY");

        let cfg = Config { sendkey_env: Some("MY_SEND_KEY".into()), ..Config::default() };
        assert_eq!(cfg.sendkey_env_name(), "MY_SEND_KEY");
    }

    #[test]
    fn config_round_trips_through_toml() {
        let cfg = Config {
            default_city: Some("茂名".into()),
            forecast_days: Some(3),
            sendkey_env: Some("MY_SEND_KEY".into()),
        };

        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();

        assert_eq!(parsed.default_city.as_deref(), Some("茂名"));
        assert_eq!(parsed.forecast_days, Some(3));
        assert_eq!(parsed.sendkey_env.as_deref(), Some("MY_SEND_KEY"));
    }
}
