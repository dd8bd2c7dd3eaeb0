//! # adhera-cohort
//!
//! The deterministic synthetic cohort generator.
//!
//! This crate provides:
//! - The `RandomSource` seam (`StdSource` for production, `ScriptedSource`
//!   for tests)
//! - The `generate` / `generate_seeded` entry points producing a `Cohort`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use adhera_cohort::generate_seeded;
//! use adhera_contracts::config::PipelineConfig;
//!
//! let cohort = generate_seeded(&PipelineConfig::default())?;
//! ```

pub mod generate;
pub mod source;

pub use generate::{generate, generate_seeded};
pub use source::{RandomSource, ScriptedSource, StdSource};

// ── Tests ─────────────────────────────────────────────────────────────────────
