//! Read-only queries over a [`Dataset`](crate::dataset::Dataset).
//!
//! Daily aggregation, count ranking and contiguous-window search live here,
//! along with the value types they return and the [`report::Report`] that
//! bundles them for presentation.

pub mod aggregate;
pub mod ranking;
pub mod report;
pub mod types;
