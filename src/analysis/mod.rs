//! Release feature derivation and aggregation.

pub mod aggregate;
pub mod features;
mod release;

pub use aggregate::{Metric, MetricRow, generate_stats, group_by};
pub use features::{CalendarZone, derive_release, derive_releases};
pub use release::{
    DAY_NAMES, DerivedRelease, ReleaseType, SeasonQuarter, TimeSlot, VersionType,
};
