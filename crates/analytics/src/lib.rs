//! # Operations Analytics
//!
//! Turns a trader's validated operations into the daily performance picture and
//! the funded-account verdict.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** No I/O and no shared state. Both calculators are plain values
//!   built from configuration and can be used from any number of requests at once.
//! - **Two stages:** `DailyAggregator` buckets operations by calendar day;
//!   `PerformanceEvaluator` scores those days against a goal.
//!
//! ## Public API
//!
//! - `DailyAggregator` / `DailyAggregates`: per-day operation counts, results and costs.
//! - `PerformanceEvaluator` / `Evaluation`: metrics, verdict, violations and warnings.
//! - `AnalyticsError`: an invalid policy, or amounts that leave the `Decimal` range.

// Declare the modules that constitute this crate.
pub mod aggregator;
pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use aggregator::{DailyAggregates, DailyAggregator};
pub use engine::{Evaluation, PerformanceEvaluator};
pub use error::AnalyticsError;
pub use report::{AnalysisMetrics, DailyResult, FlaggedDay, ValidationVerdict};
