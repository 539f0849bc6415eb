use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Default timezone for time-of-day analysis and "today"
pub const DEFAULT_TIMEZONE: &str = "Asia/Seoul";

/// Configuration for the stallctl server and CLI.
///
/// Precedence, lowest first: built-in defaults, `~/.stallctl/config.toml`,
/// environment (`DATABASE_URL`, `STALLCTL_BIND`, `STALLCTL_TIMEZONE`), then
/// command-line flags applied by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StallConfig {
    pub database_url: Option<String>,
    pub bind: SocketAddr,
    pub timezone: String,
    pub max_connections: u32,
    pub cors_permissive: bool,
}

impl Default for StallConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            bind: SocketAddr::from(([127, 0, 0, 1], 3030)),
            timezone: DEFAULT_TIMEZONE.to_string(),
            max_connections: 5,
            cors_permissive: false,
        }
    }
}

impl StallConfig {
    /// Load config from ~/.stallctl/config.toml plus environment overrides.
    ///
    /// A missing file is not an error; defaults apply.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Load and parse a specific config file (no environment overrides).
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).context("Failed to parse config file (invalid TOML)")?;
        config.tz()?;
        Ok(config)
    }

    /// Get config file path: ~/.stallctl/config.toml
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".stallctl/config.toml")
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = Some(url);
        }
        if let Some(bind) = lookup("STALLCTL_BIND") {
            self.bind = bind
                .parse()
                .with_context(|| format!("STALLCTL_BIND is not a socket address: {bind}"))?;
        }
        if let Some(tz) = lookup("STALLCTL_TIMEZONE") {
            self.timezone = tz;
            self.tz()?;
        }
        Ok(())
    }

    /// Parsed timezone.
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("Unknown timezone '{}': {}", self.timezone, e))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = StallConfig::default();
        assert_eq!(config.bind.port(), 3030);
        assert_eq!(config.tz().unwrap(), chrono_tz::Asia::Seoul);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = StallConfig::from_toml_str(
            r#"
            database_url = "postgres://localhost/stall"
            timezone = "Europe/Berlin"
            "#,
        )
        .unwrap();
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/stall"));
        assert_eq!(config.tz().unwrap(), chrono_tz::Europe::Berlin);
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn rejects_unknown_timezone() {
        let err = StallConfig::from_toml_str(r#"timezone = "Mars/Olympus""#).unwrap_err();
        assert!(err.to_string().contains("Mars/Olympus"));
    }

    #[test]
    fn env_overrides_file() {
        let vars: HashMap<&str, &str> = [
            ("DATABASE_URL", "postgres://db/override"),
            ("STALLCTL_BIND", "0.0.0.0:8080"),
        ]
        .into_iter()
        .collect();

        let mut config = StallConfig::default();
        config
            .apply_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.database_url.as_deref(), Some("postgres://db/override"));
        assert_eq!(config.bind.port(), 8080);
    }

    #[test]
    fn bad_bind_override_fails() {
        let mut config = StallConfig::default();
        assert!(config
            .apply_overrides(|k| (k == "STALLCTL_BIND").then(|| "nope".to_string()))
            .is_err());
    }

    #[test]
    fn load_from_file_round_trips() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let original = StallConfig {
            cors_permissive: true,
            ..StallConfig::default()
        };
        write!(file, "{}", original.to_toml_string().unwrap()).unwrap();

        let loaded = StallConfig::load_from(file.path()).unwrap();
        assert_eq!(loaded, original);
    }
}
