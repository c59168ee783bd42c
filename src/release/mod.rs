//! Release operations handed to a deployment manager
//!
//! The option structs replace call-site option lists, and plans bundle
//! them with the fetched chart.

pub mod options;
pub mod plan;
pub mod status;

pub use options::{DeleteOptions, InstallRequest, ListOptions, SortBy, SortOrder, UpdateRequest};
pub use plan::{PlannedChart, ReleasePlan};
pub use status::{parse_status_filter, ReleaseStatus};
