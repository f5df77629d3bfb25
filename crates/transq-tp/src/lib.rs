//! tp integration for transq.
//!
//! Wraps the external tp transport program behind the import-queue
//! capability: one synchronous `tp ADDTOBUFFER` invocation per due request,
//! combined output appended to a per-run log file. tp is treated as opaque;
//! its exit status is returned to the caller but nothing here interprets it.

mod client;

pub use client::TpClient;
