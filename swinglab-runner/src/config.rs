//! Serializable pipeline configuration.
//!
//! One TOML file drives a run:
//!
//! ```toml
//! [pivots]
//! atr_multiplier = 3.0
//!
//! [scoring]
//! tp_min = 0.8
//! tp_max = 3.0
//!
//! [run]
//! seed = 7
//! policy = "random"
//! ```
//!
//! Every section and field is optional and falls back to its default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use swinglab_core::episode::EpisodeConfig;
use swinglab_core::pivots::PivotConfig;
use swinglab_core::scoring::ScoringConfig;
use swinglab_core::simulation::{RewardConfig, SimulationConfig};
use swinglab_core::structure::{FeatureConfig, StructuralFeatureEngine};
use swinglab_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("failed to serialize config for hashing: {0}")]
    Hash(#[from] serde_json::Error),

    #[error("{0}")]
    Invalid(#[from] CoreError),
}

/// Decision policy used by `simulate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Enter in the direction of the confidence sign.
    #[default]
    Confidence,
    /// Seeded uniform random actions, a baseline.
    Random,
}

/// Run-level settings that do not belong to any engine stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSection {
    /// ATR period used when the input table has no `atr` column.
    pub atr_period: usize,
    pub seed: u64,
    pub policy: PolicyKind,
    /// Output root; per-asset artifacts go below it.
    pub output_root: PathBuf,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            atr_period: 14,
            seed: 42,
            policy: PolicyKind::default(),
            output_root: PathBuf::from("output"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub pivots: PivotConfig,
    pub features: FeatureConfig,
    pub scoring: ScoringConfig,
    pub simulation: SimulationConfig,
    pub reward: RewardConfig,
    pub episode: EpisodeConfig,
    pub run: RunSection,
}

impl PipelineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load `path` when given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pivots.validate()?;
        self.features.validate()?;
        self.scoring.validate()?;
        self.simulation.validate()?;
        self.reward.validate()?;
        self.episode.validate()?;
        if self.run.atr_period == 0 {
            return Err(CoreError::InvalidConfig("run.atr_period must be > 0".into()).into());
        }
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Deterministic BLAKE3 hash of the canonical JSON form.
    ///
    /// Two runs with identical settings share a hash, whatever the TOML
    /// layout or field order that produced them.
    pub fn config_hash(&self) -> Result<String, ConfigError> {
        let json = serde_json::to_string(self)?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }

    pub fn feature_engine(&self) -> StructuralFeatureEngine {
        StructuralFeatureEngine::new(self.pivots, self.features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.pivots.atr_multiplier, 3.0);
        assert_eq!(config.run.atr_period, 14);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = PipelineConfig::from_toml_str(
            r#"
            [scoring]
            tp_max = 2.5

            [simulation]
            max_holding_bars = 48
            intrabar = "stop_first"

            [run]
            policy = "random"
            seed = 7
            "#,
        )
        .unwrap();
        assert_eq!(config.scoring.tp_max, 2.5);
        assert_eq!(config.scoring.tp_min, 0.8);
        assert_eq!(config.simulation.max_holding_bars, Some(48));
        assert_eq!(config.run.policy, PolicyKind::Random);
        assert_eq!(config.run.seed, 7);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = PipelineConfig::from_toml_str("[pivots]\natr_multiplier = -1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("atr_multiplier"));

        let err = PipelineConfig::from_toml_str("[pivots]\natr_multiplier = \"x\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn config_hash_is_deterministic() {
        let a = PipelineConfig::default();
        let b = PipelineConfig::from_toml_str("[run]\nseed = 42\n").unwrap();
        assert_eq!(a.config_hash().unwrap(), b.config_hash().unwrap());
        assert_eq!(a.config_hash().unwrap().len(), 64);
    }

    #[test]
    fn config_hash_changes_with_params() {
        let a = PipelineConfig::default();
        let mut b = a.clone();
        b.reward.clip = 2.0;
        assert_ne!(a.config_hash().unwrap(), b.config_hash().unwrap());
    }

    #[test]
    fn rendered_toml_roundtrips() {
        let mut config = PipelineConfig::default();
        config.simulation.max_holding_bars = Some(10);
        let text = config.to_toml_string().unwrap();
        let back = PipelineConfig::from_toml_str(&text).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = PipelineConfig::load(Path::new("/nonexistent/swinglab.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
