//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use consensus_domain::ConfigError;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const APP_DIR: &str = "paper-consensus";
const PROJECT_FILES: [&str; 2] = ["consensus.toml", ".consensus.toml"];
const ENV_PREFIX: &str = "PAPER_CONSENSUS_";

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("Failed to read configuration: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `PAPER_CONSENSUS_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./consensus.toml` or `./.consensus.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/paper-consensus/config.toml`
    /// 5. Default values
    ///
    /// Tables merge deeply, so a partial `[consensus.stage_n]` keeps the
    /// other stages.
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigLoadError> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(project_path) = Self::project_config_path() {
            debug!("Loading project config {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        if let Some(path) = config_path {
            if !path.is_file() {
                return Err(ConfigLoadError::NotFound(path.to_path_buf()));
            }
            debug!("Loading config {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        Self::extract(figment)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Load a single TOML string over the defaults.
    pub fn load_str(toml: &str) -> Result<FileConfig, ConfigLoadError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Toml::string(toml));
        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<FileConfig, ConfigLoadError> {
        let config: FileConfig = figment.extract().map_err(Box::new)?;
        // Surface bad consensus values now rather than at first use
        config.consensus_config()?;
        Ok(config)
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/paper-consensus/config.toml if set,
    /// otherwise the platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config file locations being used (for --show-config)
    pub fn describe_sources(explicit: Option<&Path>) -> Vec<String> {
        let mut lines = vec!["Configuration sources (in priority order):".to_string()];

        lines.push(format!("  [ENV  ] Environment: {}*", ENV_PREFIX));

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISS " };
            lines.push(format!("  [{}] Explicit: {}", mark, path.display()));
        }

        match Self::project_config_path() {
            Some(path) => lines.push(format!("  [FOUND] Project: {}", path.display())),
            None => lines.push(format!(
                "  [     ] Project: ./{} or ./{}",
                PROJECT_FILES[0], PROJECT_FILES[1]
            )),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            lines.push(format!("  [{}] Global:  {}", mark, path.display()));
        }

        lines.push("  [     ] Default: built-in defaults".to_string());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consensus_domain::{ConsensusConfig, OutputFormat};
    use std::io::Write;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.consensus_config().unwrap(), ConsensusConfig::default());
        assert_eq!(config.providers.default, "anthropic");
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("paper-consensus"));
    }

    #[test]
    fn test_partial_stage_table_keeps_defaults() {
        let config = ConfigLoader::load_str("[consensus.stage_n]\nhunt_patterns = 40\n").unwrap();
        let consensus = config.consensus_config().unwrap();

        assert_eq!(consensus.stage_n("hunt_patterns"), 40);
        assert_eq!(consensus.stage_n("mine_qual"), 15);
        assert_eq!(consensus.stage_n("verify_claims"), 10);
    }

    #[test]
    fn test_invalid_value_is_rejected() {
        let result = ConfigLoader::load_str("[consensus]\nmax_concurrent_runs = 0\n");
        assert!(matches!(result, Err(ConfigLoadError::Invalid(_))));
    }

    #[test]
    fn test_explicit_file_is_merged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[consensus]\ndefault_n = 3\n\n[output]\nformat = \"summary\"").unwrap();
        drop(file);

        let config = ConfigLoader::load(Some(&path)).unwrap();
        assert_eq!(config.consensus_config().unwrap().default_n, 3);
        assert_eq!(config.output.format, OutputFormat::Summary);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConfigLoader::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigLoadError::NotFound(_))));
    }
}
