//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file:
//!
//! ```toml
//! [consensus]
//! default_n = 10
//! max_concurrent_runs = 5
//!
//! [consensus.stage_n]
//! mine_qual = 20
//!
//! [providers]
//! default = "openai"
//!
//! [output]
//! format = "summary"
//! ```

use consensus_domain::{ConfigError, ConsensusConfig, OutputFormat, ProviderConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Consensus overrides, kept raw until merged onto the defaults
    pub consensus: Value,
    /// Provider settings
    pub providers: ProviderConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            consensus: Value::Object(Default::default()),
            providers: ProviderConfig::default(),
            output: FileOutputConfig::default(),
        }
    }
}

impl FileConfig {
    /// Merge the `[consensus]` table onto the built-in defaults.
    pub fn consensus_config(&self) -> Result<ConsensusConfig, ConfigError> {
        ConsensusConfig::default().with_overrides(&self.consensus)
    }
}

/// Output settings (`[output]` section)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Default output format
    pub format: OutputFormat,
    /// Use colors in terminal output
    pub color: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.consensus_config().unwrap(), ConsensusConfig::default());
        assert_eq!(config.providers, ProviderConfig::default());
        assert_eq!(config.output.format, OutputFormat::Markdown);
    }

    #[test]
    fn test_parse_full_file() {
        let toml_str = r#"
[consensus]
default_n = 7
high_stability_cv = 0.05
use_batch_api = true

[consensus.stage_n]
mine_qual = 20

[providers]
default = "openai"

[providers.openai]
default_model = "gpt-4o"

[output]
format = "json"
color = false
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let consensus = config.consensus_config().unwrap();

        assert_eq!(consensus.default_n, 7);
        assert_eq!(consensus.high_stability_cv, 0.05);
        assert_eq!(consensus.stage_n("mine_qual"), 20);
        assert_eq!(consensus.stage_n("hunt_patterns"), 25);
        assert_eq!(config.providers.default, "openai");
        assert_eq!(config.providers.openai.default_model, "gpt-4o");
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.color, Some(false));
    }

    #[test]
    fn test_wrong_type_surfaces_on_merge() {
        let config: FileConfig = toml::from_str("[consensus]\nmax_concurrent_runs = \"many\"").unwrap();
        assert!(matches!(
            config.consensus_config(),
            Err(ConfigError::InvalidValue(_))
        ));
    }
}
