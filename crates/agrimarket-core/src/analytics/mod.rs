//! Analytics domain module.
//!
//! View and login records are append-only instrumentation; nothing in the
//! marketplace mutates or deletes them.

mod model;

pub use model::{
    DashboardStats, DeviceInfo, LocationInfo, LoginRecord, UNKNOWN, ViewRecord, VisitorMetadata,
};
