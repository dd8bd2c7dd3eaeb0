//! # adhera-store
//!
//! The relational-store boundary of the Adhera pipeline: the `CohortStore`
//! trait and its in-memory reference implementation.
//!
//! The store enforces the persisted schema's constraints — primary-key
//! uniqueness and foreign-key existence — and nothing else. Aggregation
//! logic never lives behind this boundary.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use adhera_store::{CohortStore, InMemoryStore};
//!
//! let store = InMemoryStore::new();
//! store.save_cohort(&cohort)?;
//! let loaded = store.load_cohort()?;
//! ```

pub mod memory;
pub mod store;

pub use memory::InMemoryStore;
pub use store::CohortStore;

// ── Tests ─────────────────────────────────────────────────────────────────────
