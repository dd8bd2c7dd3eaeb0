//! Pipeline run identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a single pipeline run.
///
/// The run id ties log lines and exported reports to one invocation. It is
/// deliberately NOT part of `Cohort`: cohort contents are a pure function
/// of `(seed, n_patients)` and must not vary between runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub uuid::Uuid);

impl RunId {
    /// Create a new, unique run ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
