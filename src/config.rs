//! Tool configuration: external program names, scratch location, timeout.
//!
//! Values come from built-in defaults, then a `.env` file and the process
//! environment, then CLI flags (highest precedence).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default checkout tool.
pub const DEFAULT_CHECKOUT_BIN: &str = "bugsinpy-checkout";
/// Default info tool.
pub const DEFAULT_INFO_BIN: &str = "bugsinpy-info";
/// Default scratch directory for checkouts.
pub const DEFAULT_SCRATCH_DIR: &str = "/tmp/bugsinpy_temp";

const ENV_CHECKOUT_BIN: &str = "BUGHARVEST_CHECKOUT_BIN";
const ENV_INFO_BIN: &str = "BUGHARVEST_INFO_BIN";
const ENV_SCRATCH_DIR: &str = "BUGHARVEST_SCRATCH_DIR";
const ENV_TIMEOUT_SECS: &str = "BUGHARVEST_TIMEOUT_SECS";

/// How the pipeline reaches its external tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    /// Program invoked to check out a bug version.
    pub checkout_bin: String,
    /// Program invoked to describe a bug.
    pub info_bin: String,
    /// Transient checkout directory.
    pub scratch_dir: PathBuf,
    /// Kill external tools that run longer than this.
    pub timeout: Option<Duration>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            checkout_bin: DEFAULT_CHECKOUT_BIN.to_string(),
            info_bin: DEFAULT_INFO_BIN.to_string(),
            scratch_dir: PathBuf::from(DEFAULT_SCRATCH_DIR),
            timeout: None,
        }
    }
}

/// CLI-level overrides; `None` keeps the environment/default value.
#[derive(Debug, Clone, Default)]
pub struct ToolOverrides {
    /// `--checkout-bin`.
    pub checkout_bin: Option<String>,
    /// `--info-bin`.
    pub info_bin: Option<String>,
    /// `--scratch-dir`.
    pub scratch_dir: Option<PathBuf>,
    /// `--timeout-secs`.
    pub timeout_secs: Option<u64>,
}

impl ToolConfig {
    /// Loads `.env` if present, then reads `BUGHARVEST_*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error string if `BUGHARVEST_TIMEOUT_SECS` is not an integer.
    pub fn from_env() -> Result<Self, String> {
        // A missing .env file is the normal case.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error string if the timeout variable is not an integer.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(bin) = lookup(ENV_CHECKOUT_BIN).filter(|v| !v.trim().is_empty()) {
            config.checkout_bin = bin;
        }
        if let Some(bin) = lookup(ENV_INFO_BIN).filter(|v| !v.trim().is_empty()) {
            config.info_bin = bin;
        }
        if let Some(dir) = lookup(ENV_SCRATCH_DIR).filter(|v| !v.trim().is_empty()) {
            config.scratch_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|e| format!("invalid {ENV_TIMEOUT_SECS}={raw:?}: {e}"))?;
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Applies CLI overrides on top of this config.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &ToolOverrides) -> Self {
        if let Some(bin) = &overrides.checkout_bin {
            self.checkout_bin.clone_from(bin);
        }
        if let Some(bin) = &overrides.info_bin {
            self.info_bin.clone_from(bin);
        }
        if let Some(dir) = &overrides.scratch_dir {
            self.scratch_dir.clone_from(dir);
        }
        if let Some(secs) = overrides.timeout_secs {
            self.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = ToolConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ToolConfig::default());
        assert_eq!(config.scratch_dir, PathBuf::from("/tmp/bugsinpy_temp"));
        assert!(config.timeout.is_none());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ToolConfig::from_lookup(lookup_from(&[
            ("BUGHARVEST_CHECKOUT_BIN", "/opt/bip/checkout"),
            ("BUGHARVEST_SCRATCH_DIR", "/var/tmp/scratch"),
            ("BUGHARVEST_TIMEOUT_SECS", "90"),
        ]))
        .unwrap();
        assert_eq!(config.checkout_bin, "/opt/bip/checkout");
        assert_eq!(config.info_bin, DEFAULT_INFO_BIN);
        assert_eq!(config.scratch_dir, PathBuf::from("/var/tmp/scratch"));
        assert_eq!(config.timeout, Some(Duration::from_secs(90)));
    }

    #[test]
    fn zero_timeout_means_none() {
        let config =
            ToolConfig::from_lookup(lookup_from(&[("BUGHARVEST_TIMEOUT_SECS", "0")])).unwrap();
        assert!(config.timeout.is_none());
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let err = ToolConfig::from_lookup(lookup_from(&[("BUGHARVEST_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(err.contains("BUGHARVEST_TIMEOUT_SECS"));
    }

    #[test]
    fn cli_overrides_win() {
        let config = ToolConfig::from_lookup(lookup_from(&[("BUGHARVEST_INFO_BIN", "env-info")]))
            .unwrap()
            .with_overrides(&ToolOverrides {
                info_bin: Some("cli-info".into()),
                timeout_secs: Some(5),
                ..ToolOverrides::default()
            });
        assert_eq!(config.info_bin, "cli-info");
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }
}
