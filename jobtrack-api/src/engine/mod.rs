//! Read-only query and analytics engine over one owner's job records.
//!
//! Both components hold nothing but a shared [`JobStore`](crate::storage::JobStore)
//! handle and can serve any number of requests concurrently.

pub mod listing;
pub mod stats;

pub use listing::{JobListing, JobQuery};
pub use stats::StatsAggregator;
