//! Accumulators that fold parsed addresses into per-key statistics.
//!
//! Both accumulators follow the same discipline: a fold is a no-op unless
//! the incoming result is valid and matches the accumulator's key, and folds
//! commute — the resulting counts never depend on fold order, so partial
//! aggregations can be built independently and merged.

mod address;
mod domain;

pub use address::AddressAnalysis;
pub use domain::DomainAnalysis;
