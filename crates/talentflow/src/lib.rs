//! Hiring analytics for the TalentFlow dashboard.
//!
//! The [`analytics`] module reduces job and candidate collections into the
//! dashboard's summary views and renders them as a sectioned CSV export.
//! The remaining modules carry the service plumbing shared by the binaries.

pub mod analytics;
pub mod config;
pub mod error;
pub mod telemetry;
