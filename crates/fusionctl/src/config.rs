//! TOML configuration for `fusionctl`.
//!
//! Every field is optional; unspecified values fall back to the defaults
//! the backup structures use (4 primaries, 2 backups, GF(2^16)).

use std::path::Path;

use fusion_erasure::{CodeConfig, DEFAULT_WIDTH};
use serde::Deserialize;

/// Top-level configuration, parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Code parameters.
    pub code: CodeSection,
    /// Logging configuration.
    pub log: LogSection,
}

/// `[code]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CodeSection {
    /// Number of primary (data) symbols.
    pub data_count: Option<usize>,
    /// Number of backup (code) symbols.
    pub code_count: Option<usize>,
    /// Field width in bits.
    pub w: Option<u32>,
}

/// `[log]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Log level filter (e.g. `"info"`, `"debug"`, `"warn"`).
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl CliConfig {
    /// Load config from a TOML file, or use defaults if no path given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)?;
                let config: CliConfig = toml::from_str(&content)?;
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse config from a TOML string (used in tests).
    #[cfg(test)]
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Effective number of data symbols.
    pub fn data_count(&self) -> usize {
        self.code.data_count.unwrap_or(4)
    }

    /// Effective number of code symbols.
    pub fn code_count(&self) -> usize {
        self.code.code_count.unwrap_or(2)
    }

    /// Effective field width.
    pub fn width(&self) -> u32 {
        self.code.w.unwrap_or(DEFAULT_WIDTH)
    }

    /// The effective code configuration, validated.
    pub fn code_config(&self) -> anyhow::Result<CodeConfig> {
        let config = CodeConfig::new(self.data_count(), self.code_count(), self.width());
        config.validate()?;
        Ok(config)
    }
}
