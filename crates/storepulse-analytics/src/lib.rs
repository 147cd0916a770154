//! StorePulse Analytics
//!
//! This crate provides the rollup and reporting logic:
//! - Query sanitization (regex escaping, sort allow-listing, normalization)
//! - Fire-and-forget search query logging
//! - Time-bucketed and Top-N aggregation
//! - Trend (percentage change) calculation
//! - Report assembly

pub mod aggregate;
pub mod logger;
pub mod report;
pub mod sanitize;
pub mod trend;

#[cfg(test)]
mod test_support;

pub use logger::{SearchLogHandle, SearchQueryLogger};
pub use report::{Report, ReportKind};
