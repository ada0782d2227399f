//! Smoke tests and seeding for the hotel equipments tables.
//!
//! Talks to the hosted `/rest/v1/<table>` API with a static key and provides:
//! - Table access probes
//! - Test record creation and deletion
//! - Idempotent seeding of the default equipments
//! - A runner that aggregates the checks into a scored report

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod report;
pub mod runner;
pub mod steps;
pub mod verify;

pub use client::{Query, RestClient};
pub use config::ClientConfig;
pub use error::ClientError;
pub use model::RecordId;
pub use report::{RunReport, StepResult};
