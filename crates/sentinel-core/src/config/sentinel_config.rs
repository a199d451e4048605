//! Top-level Sentinel configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{AdmissionConfig, CorpusConfig, FusionConfig, ModelConfig};
use crate::constants::PROJECT_CONFIG_FILE;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`SENTINEL_*`)
/// 3. Project config (`sentinel.toml` in project root)
/// 4. User config (`~/.sentinel/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SentinelConfig {
    pub admission: AdmissionConfig,
    pub fusion: FusionConfig,
    pub model: ModelConfig,
    pub corpus: CorpusConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub max_input_chars: Option<usize>,
    pub model_path: Option<PathBuf>,
    pub schema_path: Option<PathBuf>,
    pub patterns_path: Option<PathBuf>,
    pub hot_reload: Option<bool>,
}

impl SentinelConfig {
    /// Load configuration with layered resolution.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing and embedding).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &SentinelConfig) -> Result<(), ConfigError> {
        let fusion = &config.fusion;
        for (field, value) in [
            ("fusion.high_threshold", fusion.high_threshold),
            ("fusion.medium_threshold", fusion.medium_threshold),
            (
                "fusion.fallback_keyword_probability",
                fusion.fallback_keyword_probability,
            ),
            (
                "fusion.fallback_clean_probability",
                fusion.fallback_clean_probability,
            ),
        ] {
            if let Some(v) = value {
                if !(0.0..=1.0).contains(&v) {
                    return Err(ConfigError::ValidationFailed {
                        field: field.to_string(),
                        message: "must be between 0.0 and 1.0".to_string(),
                    });
                }
            }
        }
        if fusion.effective_medium_threshold() >= fusion.effective_high_threshold() {
            return Err(ConfigError::ValidationFailed {
                field: "fusion.medium_threshold".to_string(),
                message: "must be lower than fusion.high_threshold".to_string(),
            });
        }
        if let Some(c) = fusion.fallback_confidence {
            if !(0.0..=100.0).contains(&c) {
                return Err(ConfigError::ValidationFailed {
                    field: "fusion.fallback_confidence".to_string(),
                    message: "must be between 0 and 100".to_string(),
                });
            }
        }
        if fusion.snippet_max_chars == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "fusion.snippet_max_chars".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.admission.max_input_chars == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "admission.max_input_chars".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the user config path: `~/.sentinel/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".sentinel").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut SentinelConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: SentinelConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it has a value.
    fn merge(base: &mut SentinelConfig, other: &SentinelConfig) {
        fn take<T: Clone>(base: &mut Option<T>, other: &Option<T>) {
            if other.is_some() {
                base.clone_from(other);
            }
        }

        take(&mut base.admission.max_input_chars, &other.admission.max_input_chars);

        take(&mut base.fusion.high_threshold, &other.fusion.high_threshold);
        take(&mut base.fusion.medium_threshold, &other.fusion.medium_threshold);
        take(
            &mut base.fusion.fallback_keyword_probability,
            &other.fusion.fallback_keyword_probability,
        );
        take(
            &mut base.fusion.fallback_clean_probability,
            &other.fusion.fallback_clean_probability,
        );
        take(&mut base.fusion.fallback_confidence, &other.fusion.fallback_confidence);
        take(&mut base.fusion.snippet_max_chars, &other.fusion.snippet_max_chars);
        take(&mut base.fusion.patterns_path, &other.fusion.patterns_path);

        take(&mut base.model.model_path, &other.model.model_path);
        take(&mut base.model.schema_path, &other.model.schema_path);
        take(&mut base.model.augmenter_path, &other.model.augmenter_path);
        take(&mut base.model.hot_reload, &other.model.hot_reload);

        take(&mut base.corpus.data_dir, &other.corpus.data_dir);
        take(&mut base.corpus.output_path, &other.corpus.output_path);
        take(&mut base.corpus.parallel, &other.corpus.parallel);
    }

    /// Apply environment variable overrides.
    /// Pattern: `SENTINEL_MAX_INPUT_CHARS`, `SENTINEL_HIGH_THRESHOLD`, etc.
    fn apply_env_overrides(config: &mut SentinelConfig) {
        if let Some(v) = env_parse::<usize>("SENTINEL_MAX_INPUT_CHARS") {
            config.admission.max_input_chars = Some(v);
        }
        if let Some(v) = env_parse::<f64>("SENTINEL_HIGH_THRESHOLD") {
            config.fusion.high_threshold = Some(v);
        }
        if let Some(v) = env_parse::<f64>("SENTINEL_MEDIUM_THRESHOLD") {
            config.fusion.medium_threshold = Some(v);
        }
        if let Ok(val) = std::env::var("SENTINEL_MODEL_PATH") {
            config.model.model_path = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("SENTINEL_SCHEMA_PATH") {
            config.model.schema_path = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("SENTINEL_PATTERNS_PATH") {
            config.fusion.patterns_path = Some(PathBuf::from(val));
        }
        if let Some(v) = env_parse::<bool>("SENTINEL_HOT_RELOAD") {
            config.model.hot_reload = Some(v);
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut SentinelConfig, cli: &CliOverrides) {
        if let Some(v) = cli.max_input_chars {
            config.admission.max_input_chars = Some(v);
        }
        if let Some(ref v) = cli.model_path {
            config.model.model_path = Some(v.clone());
        }
        if let Some(ref v) = cli.schema_path {
            config.model.schema_path = Some(v.clone());
        }
        if let Some(ref v) = cli.patterns_path {
            config.fusion.patterns_path = Some(v.clone());
        }
        if let Some(v) = cli.hot_reload {
            config.model.hot_reload = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
