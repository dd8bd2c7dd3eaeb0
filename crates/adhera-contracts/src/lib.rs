//! # adhera-contracts
//!
//! Shared types, configuration, and error taxonomy for the Adhera
//! medication-adherence pipeline.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions, configuration, and error types.

pub mod config;
pub mod entity;
pub mod error;
pub mod run;
