//! Error types for the Adhera adherence pipeline.
//!
//! All fallible operations in the pipeline return `AdheraResult<T>`.
//! Error variants carry enough context to name the offending record or
//! configuration field in logs and console output.

use thiserror::Error;

/// The unified error type for the Adhera pipeline.
#[derive(Debug, Error)]
pub enum AdheraError {
    /// A configuration value is out of range or otherwise unusable.
    ///
    /// Surfaced before generation starts; the generator never runs on an
    /// invalid configuration.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// A record references a patient or medication that does not exist.
    ///
    /// Aborts aggregation (and rejects store inserts). The message names
    /// the dangling identifier.
    #[error("data integrity violation: {reason}")]
    DataIntegrity { reason: String },

    /// The storage collaborator could not persist a record.
    ///
    /// Storage failures are propagated unchanged, never swallowed.
    #[error("store write failed: {reason}")]
    StoreWrite { reason: String },

    /// A configuration file could not be read or parsed.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

/// Convenience alias used throughout the Adhera crates.
pub type AdheraResult<T> = Result<T, AdheraError>;
