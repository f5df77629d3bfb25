//! Due-processing flow: dispatch today's requests through tp.

use miette::Result;
use tracing::debug;

use transq_control::{Config, ControlStore, ScheduleDate, process_due};
use transq_tp::TpClient;

/// Process the control file and import every request due today.
///
/// Prints the due and dispatched counts when done; the detailed tp output
/// lands in the per-run log file under the configured log directory.
pub fn run(config: &Config, today: ScheduleDate) -> Result<()> {
    let store = ControlStore::new(config);
    let mut tp = TpClient::new(config);
    debug!(log = %tp.log_path().display(), "run log for this processing run");

    println!("Running tp to insert the requests in the queue...");
    let summary = process_due(&store, today, &mut tp).map_err(|e| miette::miette!("{}", e))?;

    println!("Finished.");
    println!(
        "There were {} requests for today in the control file.",
        summary.due
    );
    println!(
        "{} requests were inserted in the import queue.",
        summary.dispatched
    );
    Ok(())
}
