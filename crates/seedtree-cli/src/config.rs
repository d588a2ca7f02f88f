//! CLI configuration — parsed from TOML file + environment variable overrides.
//!
//! Priority: environment variables > config file > defaults.
//!
//! Secrets never live here: entropy and passphrase are read from the
//! environment by `main` and kept in zeroizing buffers.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use seedtree_core::mnemonic::ENTROPY_LENGTHS;
use seedtree_core::{parse_path, CurveKind};

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// General settings
    #[serde(default)]
    pub general: GeneralSection,

    /// Nodes to derive, in output order
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSection {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Entropy length in bytes used by `--random`
    #[serde(default = "default_entropy_len")]
    pub entropy_len: usize,
}

impl Default for GeneralSection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            entropy_len: default_entropy_len(),
        }
    }
}

/// One node to derive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Human-readable label
    pub label: String,

    /// Curve name; `"ed25519 cardano seed"` selects the Icarus pipeline
    #[serde(default = "default_curve")]
    pub curve: String,

    /// Derivation path, e.g. `m/44'/0'/0'/0/0`
    #[serde(default = "default_path")]
    pub path: String,
}

// ============================================================================
// Default value functions
// ============================================================================

fn default_log_level() -> String {
    "info".to_string()
}

fn default_entropy_len() -> usize {
    16 // 12 words
}

fn default_curve() -> String {
    CurveKind::Secp256k1.name().to_string()
}

fn default_path() -> String {
    "m".to_string()
}

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

// ============================================================================
// Loading & environment override
// ============================================================================

impl CliConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: CliConfig =
            toml::from_str(&contents).with_context(|| "Failed to parse TOML config")?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `SEEDTREE_LOG_LEVEL`
    /// - `SEEDTREE_ENTROPY_LEN`
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("SEEDTREE_LOG_LEVEL") {
            self.general.log_level = v;
        }
        if let Ok(v) = std::env::var("SEEDTREE_ENTROPY_LEN") {
            if let Ok(len) = v.parse::<usize>() {
                self.general.entropy_len = len;
            }
        }
    }

    /// Validate that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            LOG_LEVELS.contains(&self.general.log_level.to_ascii_lowercase().as_str()),
            "general.log_level must be one of {:?}",
            LOG_LEVELS
        );
        anyhow::ensure!(
            ENTROPY_LENGTHS.contains(&self.general.entropy_len),
            "general.entropy_len must be one of {:?}",
            ENTROPY_LENGTHS
        );
        anyhow::ensure!(!self.profiles.is_empty(), "at least one [[profiles]] entry is required");

        let mut labels = HashSet::new();
        for profile in &self.profiles {
            anyhow::ensure!(!profile.label.is_empty(), "profiles.label must not be empty");
            anyhow::ensure!(
                labels.insert(profile.label.as_str()),
                "duplicate profile label: {}",
                profile.label
            );
            profile
                .curve_kind()
                .with_context(|| format!("profile {}", profile.label))?;
            parse_path(&profile.path)
                .with_context(|| format!("profile {}: bad path {:?}", profile.label, profile.path))?;
        }

        Ok(())
    }
}

impl Profile {
    pub fn curve_kind(&self) -> Result<CurveKind> {
        Ok(self.curve.parse::<CurveKind>()?)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn minimal_toml() -> &'static str {
        r#"
[[profiles]]
label = "root"
"#
    }

    fn full_toml() -> &'static str {
        r#"
[general]
log_level = "debug"
entropy_len = 32

[[profiles]]
label = "bitcoin"
curve = "secp256k1"
path = "m/84'/0'/0'/0/0"

[[profiles]]
label = "ssh"
curve = "ed25519"
path = "m/44h/22h/0h"

[[profiles]]
label = "cardano"
curve = "ed25519 cardano seed"
path = "m/1852'/1815'/0'/0/0"
"#
    }

    fn load(toml: &str) -> CliConfig {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", toml).unwrap();
        CliConfig::from_file(file.path()).unwrap()
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = load(minimal_toml());
        assert_eq!(config.general.log_level, "info"); // default
        assert_eq!(config.general.entropy_len, 16); // default
        assert_eq!(config.profiles.len(), 1);
        assert_eq!(config.profiles[0].curve, "secp256k1");
        assert_eq!(config.profiles[0].path, "m");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let config = load(full_toml());
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.general.entropy_len, 32);
        assert_eq!(config.profiles.len(), 3);
        assert_eq!(
            config.profiles[2].curve_kind().unwrap(),
            CurveKind::Ed25519Cardano
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file() {
        let err = CliConfig::from_file(Path::new("/nonexistent/seedtree.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = load(minimal_toml());

        std::env::set_var("SEEDTREE_LOG_LEVEL", "trace");
        std::env::set_var("SEEDTREE_ENTROPY_LEN", "24");

        config.apply_env_overrides();

        assert_eq!(config.general.log_level, "trace");
        assert_eq!(config.general.entropy_len, 24);

        std::env::remove_var("SEEDTREE_LOG_LEVEL");
        std::env::remove_var("SEEDTREE_ENTROPY_LEN");
    }

    #[test]
    fn test_validation_no_profiles() {
        let config = load("[general]\nlog_level = \"warn\"\n");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_unknown_curve() {
        let config = load(
            r#"
[[profiles]]
label = "x"
curve = "curve448"
"#,
        );
        let err = config.validate().unwrap_err();
        assert!(format!("{:#}", err).contains("Unsupported curve: curve448"));
    }

    #[test]
    fn test_validation_bad_path() {
        let config = load(
            r#"
[[profiles]]
label = "x"
path = "m/44'/zero"
"#,
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_duplicate_labels() {
        let config = load(
            r#"
[[profiles]]
label = "same"

[[profiles]]
label = "same"
curve = "nist256p1"
"#,
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_bad_entropy_len() {
        let config = load(
            r#"
[general]
entropy_len = 17

[[profiles]]
label = "x"
"#,
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = load(full_toml());
        let serialized = toml::to_string_pretty(&config).unwrap();

        let reparsed: CliConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(reparsed.profiles.len(), config.profiles.len());
        assert_eq!(reparsed.profiles[1].path, config.profiles[1].path);
    }
}
