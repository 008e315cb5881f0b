//! Optional `~/.config/kubekit/config.toml`.
//!
//! ```toml
//! tool = "oc"
//! namespace = "kafka"
//! admin_user = "system:admin"
//!
//! [readiness]
//! poll_interval_ms = 1000
//! timeout_ms = 570000
//!
//! [deletion]
//! poll_interval_ms = 1000
//! timeout_ms = 240000
//! ```
//!
//! Every key is optional; command-line flags win over the file.

use anyhow::{Context, Result};
use kubeclient::{ClientConfig, Tool, WaitConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Get the config directory path
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("kubekit"))
}

/// Get the default config file path
pub fn default_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Polling budget as written in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub poll_interval_ms: u64,
    pub timeout_ms: u64,
}

impl Budget {
    fn to_wait_config(self, name: &str) -> Result<WaitConfig> {
        WaitConfig::new(
            Duration::from_millis(self.poll_interval_ms),
            Duration::from_millis(self.timeout_ms),
        )
        .with_context(|| format!("Invalid [{name}] budget"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub tool: Option<Tool>,
    pub namespace: Option<String>,
    pub admin_user: Option<String>,
    pub admin: bool,
    pub readiness: Option<Budget>,
    pub deletion: Option<Budget>,
}

impl Settings {
    /// Load settings from `path`, or from the default location.
    ///
    /// An explicit path must exist; a missing default file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (default_path()?, false),
        };

        if !explicit && !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        log::debug!("loaded config from {}", path.display());
        Self::parse(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Library configuration described by these settings.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = ClientConfig::default();
        if let Some(budget) = self.readiness {
            config = config.with_readiness(budget.to_wait_config("readiness")?);
        }
        if let Some(budget) = self.deletion {
            config = config.with_deletion(budget.to_wait_config("deletion")?);
        }
        if let Some(user) = &self.admin_user {
            config = config.with_admin_user(user.clone());
        }
        config.admin_by_default = self.admin;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full() {
        let settings = Settings::parse(
            r#"
            tool = "oc"
            namespace = "kafka"
            admin_user = "kubeadmin"
            admin = true

            [readiness]
            poll_interval_ms = 500
            timeout_ms = 60000
            "#,
        )
        .unwrap();

        assert_eq!(settings.tool, Some(Tool::Oc));
        assert_eq!(settings.namespace.as_deref(), Some("kafka"));
        assert!(settings.deletion.is_none());

        let config = settings.client_config().unwrap();
        assert_eq!(config.readiness.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.readiness.timeout(), Duration::from_secs(60));
        assert_eq!(config.deletion, WaitConfig::deletion());
        assert_eq!(config.admin_user, "kubeadmin");
        assert!(config.admin_by_default);
    }

    #[test]
    fn test_empty_is_default() {
        let settings = Settings::parse("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.client_config().unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Settings::parse("namespcae = \"typo\"").is_err());
    }

    #[test]
    fn test_invalid_budget_rejected() {
        let settings = Settings::parse(
            r#"
            [deletion]
            poll_interval_ms = 5000
            timeout_ms = 1000
            "#,
        )
        .unwrap();
        let err = settings.client_config().unwrap_err();
        assert!(err.to_string().contains("[deletion]"));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kubekit.toml");
        fs::write(&path, "tool = \"kubectl\"\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.tool, Some(Tool::Kubectl));
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = TempDir::new().unwrap();
        assert!(Settings::load(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
