use anyhow::{Context, Result};
use clap::ValueEnum;
use driftkit::DEFAULT_REGION;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the default config file path (~/.config/driftscope/config.toml)
pub fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("driftscope").join("config.toml"))
}

// ============================================================================
// Config Schema
// ============================================================================

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored human-readable table
    #[default]
    Text,
    /// Full report as pretty-printed JSON
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftscopeConfig {
    /// Region reported for observed resources without one
    #[serde(default = "default_region")]
    pub default_region: String,

    /// Default output format for `compare`
    #[serde(default)]
    pub format: OutputFormat,

    /// Fail `compare` when the score drops below this value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_under: Option<u8>,

    /// Default document locations
    #[serde(default)]
    pub inputs: InputsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

impl Default for DriftscopeConfig {
    fn default() -> Self {
        Self {
            default_region: default_region(),
            format: OutputFormat::default(),
            fail_under: None,
            inputs: InputsConfig::default(),
        }
    }
}

impl DriftscopeConfig {
    /// Load config from an explicit path, or from the default location.
    ///
    /// A missing file at the default location yields the default config; a
    /// missing explicit path is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let path = default_config_path()?;
                if !path.exists() {
                    log::debug!("Config file {} not found, using defaults", path.display());
                    return Ok(Self::default());
                }
                Self::load_from(&path)
            }
        }
    }

    /// Load config from a specific TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid TOML format in {}", path.display()))?;

        if let Some(threshold) = config.fail_under
            && threshold > 100
        {
            anyhow::bail!(
                "fail_under must be between 0 and 100, got {} in {}",
                threshold,
                path.display()
            );
        }

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Serialize to TOML for display
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

impl InputsConfig {
    /// Declared state path with `~` expanded
    pub fn declared_path(&self) -> Option<PathBuf> {
        self.declared.as_deref().map(expand_path)
    }

    /// Actual state path with `~` expanded
    pub fn actual_path(&self) -> Option<PathBuf> {
        self.actual.as_deref().map(expand_path)
    }
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = DriftscopeConfig::default();
        assert_eq!(config.default_region, "us-east-1");
        assert_eq!(config.format, OutputFormat::Text);
        assert!(config.fail_under.is_none());
        assert!(config.inputs.declared.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
default_region = "eu-west-1"
format = "json"
fail_under = 80

[inputs]
declared = "/srv/infra/terraform.tfstate"
"#,
        )
        .unwrap();

        let config = DriftscopeConfig::load(Some(&path)).unwrap();
        assert_eq!(config.default_region, "eu-west-1");
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.fail_under, Some(80));
        assert_eq!(
            config.inputs.declared_path(),
            Some(PathBuf::from("/srv/infra/terraform.tfstate"))
        );
        assert!(config.inputs.actual_path().is_none());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "fail_under = 50\n").unwrap();

        let config = DriftscopeConfig::load_from(&path).unwrap();
        assert_eq!(config.default_region, "us-east-1");
        assert_eq!(config.format, OutputFormat::Text);
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nope.toml");
        assert!(DriftscopeConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        fs::write(&path, "format = \"yaml\"\n").unwrap();
        assert!(DriftscopeConfig::load_from(&path).is_err());

        fs::write(&path, "fail_under = 150\n").unwrap();
        assert!(DriftscopeConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_tilde_expansion() {
        let inputs = InputsConfig {
            declared: Some("~/infra/terraform.tfstate".to_string()),
            actual: None,
        };
        let expanded = inputs.declared_path().unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.ends_with("infra/terraform.tfstate"));
    }

    #[test]
    fn test_roundtrip_toml() {
        let config = DriftscopeConfig {
            fail_under: Some(70),
            ..DriftscopeConfig::default()
        };
        let toml_str = config.to_toml().unwrap();
        assert!(toml_str.contains("fail_under = 70"));
        let parsed: DriftscopeConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.fail_under, Some(70));
    }
}
