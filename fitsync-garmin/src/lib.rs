//! Garmin Connect deployment of the resolution engine: the field catalog,
//! an on-disk record provider, today's activity list and the text report.

pub mod activities;
pub mod catalog;
pub mod provider;
pub mod report;

pub use activities::{format_duration, todays_activities, ActivitySummary};
pub use catalog::{garmin_catalog, sources, GarminConfig};
pub use provider::JsonDirProvider;
pub use report::{render_report, ReportInput};
