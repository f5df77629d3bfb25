//! Dispatch of due requests to the import queue.

use std::io;
use std::process::ExitStatus;

use tracing::{debug, info, warn};

use crate::error::ControlError;
use crate::store::ControlStore;
use crate::types::{RequestId, ScheduleDate};

/// Capability to insert one transport request into the import queue.
///
/// The real implementation shells out to tp and waits for it; tests
/// substitute a recorder to assert on the dispatch sequence.
pub trait ImportQueue {
    /// Attempt one queue insertion and wait for it to finish.
    fn add_to_buffer(&mut self, request: &RequestId) -> io::Result<ExitStatus>;
}

/// Counts reported after a processing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    /// Entries whose date equalled the processing date.
    pub due: usize,
    /// Invocations whose process actually ran.
    pub dispatched: usize,
}

/// Forward every entry due on `today` to the import queue and drop it from
/// the store.
///
/// Due entries are removed (after the backup copy) *before* dispatch, so a
/// dispatch failure afterwards leaves the entry gone from the store:
/// at-most-once from the store's perspective. tp's exit status is logged but
/// never inspected; a spawn failure is logged and skipped, leaving
/// `dispatched` short of `due` for the operator to see.
pub fn process_due(
    store: &ControlStore,
    today: ScheduleDate,
    queue: &mut dyn ImportQueue,
) -> Result<ProcessSummary, ControlError> {
    let split = store.partition(today)?;
    if !split.due.is_empty() {
        store.replace_all(&split.remaining)?;
    }

    let mut dispatched = 0;
    for request in &split.due {
        info!(request = %request, "adding request to the import queue");
        match queue.add_to_buffer(request) {
            Ok(status) => {
                debug!(request = %request, code = ?status.code(), "tp finished");
                dispatched += 1;
            }
            Err(error) => {
                warn!(request = %request, %error, "tp could not be invoked");
            }
        }
    }

    Ok(ProcessSummary {
        due: split.due.len(),
        dispatched,
    })
}
