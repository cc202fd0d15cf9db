//! In-memory release data served over HTTP.

mod data_service;
mod error;
mod filter;
mod stats;

pub use data_service::{DataService, Snapshot};
pub use error::ServiceError;
pub use filter::ReleaseFilter;
pub use stats::DashboardStats;
