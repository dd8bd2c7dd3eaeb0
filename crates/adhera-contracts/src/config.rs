//! Pipeline configuration.
//!
//! A `PipelineConfig` can be built from defaults, deserialized from a TOML
//! document, or assembled field by field from CLI flags. `validate()` must
//! pass before the generator runs — an invalid configuration never reaches
//! the pipeline.
//!
//! Example TOML:
//! ```toml
//! seed = 42
//! n_patients = 500
//! intervention_threshold = 75.0
//! intervention_limit = 20
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AdheraError, AdheraResult};

/// Default seed for the pseudo-random stream.
pub const DEFAULT_SEED: u64 = 42;

/// Default population size.
pub const DEFAULT_N_PATIENTS: u32 = 500;

/// Default adherence threshold (percent) below which a patient becomes an
/// intervention candidate.
pub const DEFAULT_INTERVENTION_THRESHOLD: f64 = 75.0;

/// Default cap on the intervention shortlist length.
pub const DEFAULT_INTERVENTION_LIMIT: usize = 20;

/// All externally overridable knobs of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Seed for the generator's pseudo-random stream.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Number of patients to generate. Must be at least 1.
    #[serde(default = "default_n_patients")]
    pub n_patients: u32,

    /// Adherence percentage below which a patient qualifies for
    /// intervention. Must lie in `[0, 100]`.
    #[serde(default = "default_intervention_threshold")]
    pub intervention_threshold: f64,

    /// Maximum number of patients on the intervention shortlist.
    #[serde(default = "default_intervention_limit")]
    pub intervention_limit: usize,
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_n_patients() -> u32 {
    DEFAULT_N_PATIENTS
}

fn default_intervention_threshold() -> f64 {
    DEFAULT_INTERVENTION_THRESHOLD
}

fn default_intervention_limit() -> usize {
    DEFAULT_INTERVENTION_LIMIT
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            n_patients: DEFAULT_N_PATIENTS,
            intervention_threshold: DEFAULT_INTERVENTION_THRESHOLD,
            intervention_limit: DEFAULT_INTERVENTION_LIMIT,
        }
    }
}

impl PipelineConfig {
    /// Parse `s` as TOML and build a `PipelineConfig`.
    ///
    /// Missing fields fall back to their defaults. Returns
    /// `AdheraError::ConfigError` if the TOML is malformed.
    pub fn from_toml_str(s: &str) -> AdheraResult<Self> {
        let config: PipelineConfig = toml::from_str(s).map_err(|e| AdheraError::ConfigError {
            reason: format!("failed to parse pipeline TOML: {}", e),
        })?;
        Ok(config)
    }

    /// Read the file at `path` and parse it as TOML pipeline configuration.
    ///
    /// Returns `AdheraError::ConfigError` if the file cannot be read or its
    /// contents are not valid TOML matching `PipelineConfig`.
    pub fn from_file(path: &Path) -> AdheraResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| AdheraError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Check that every field is in range.
    ///
    /// Rules:
    /// - `n_patients >= 1` — a cohort of zero patients is rejected here,
    ///   before generation starts.
    /// - `intervention_threshold` in `[0, 100]` and not NaN.
    ///
    /// Returns `AdheraError::InvalidConfiguration` naming the first field
    /// that fails.
    pub fn validate(&self) -> AdheraResult<()> {
        if self.n_patients == 0 {
            return Err(AdheraError::InvalidConfiguration {
                reason: "n_patients must be at least 1".to_string(),
            });
        }
        if !(0.0..=100.0).contains(&self.intervention_threshold) {
            return Err(AdheraError::InvalidConfiguration {
                reason: format!(
                    "intervention_threshold must be in [0, 100], got {}",
                    self.intervention_threshold
                ),
            });
        }
        Ok(())
    }
}
