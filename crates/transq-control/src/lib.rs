//! Control-file backed scheduling of SAP transport request imports.
//!
//! This crate provides the whole control-file workflow:
//! - A line-oriented store of `(request, date)` entries with duplicate and
//!   cofile gates
//! - A due/remaining partition over the store for a given processing date
//! - Backup-then-rewrite replacement of the store contents
//! - Forwarding of due requests through an injected import-queue capability
//!
//! The store format is one record per line, `<request:10> <date:DD/MM/YYYY>`.
//! Lines that do not match the schema are preserved and reported, never
//! silently repaired.

mod config;
mod error;
mod forwarder;
mod store;
mod types;

pub use config::{Config, ConfigBuilder};
pub use error::ControlError;
pub use forwarder::{ImportQueue, ProcessSummary, process_due};
pub use store::{ControlStore, Partition};
pub use types::{DATE_FORMAT, RequestId, ScheduleDate, ScheduleEntry, validate_date};
