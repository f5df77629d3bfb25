//! Invoke the tp transport program.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use chrono::{DateTime, Local};
use tracing::debug;

use transq_control::{Config, ImportQueue, RequestId};

/// tp operation used for every dispatch.
const TP_OPERATION: &str = "ADDTOBUFFER";

/// Time layout of the per-run log name.
const LOG_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Runs `tp ADDTOBUFFER` once per request, synchronously, with the combined
/// output of every invocation appended to one log file per run.
///
/// The log is named from the timestamp taken at construction but only
/// created when the first request is dispatched, so a run with nothing due
/// leaves no log behind. There is no timeout and no retry; each invocation
/// is waited for before the next starts.
pub struct TpClient {
    program: String,
    sid: String,
    client: String,
    profile_path: PathBuf,
    log_path: PathBuf,
    log: Option<File>,
}

impl TpClient {
    /// Client for one processing run, log named from the current local time.
    pub fn new(config: &Config) -> Self {
        Self::with_timestamp(config, Local::now())
    }

    /// Like [`TpClient::new`] with an explicit timestamp for the log name.
    pub fn with_timestamp(config: &Config, stamp: DateTime<Local>) -> Self {
        let name = format!("{}.log", stamp.format(LOG_STAMP_FORMAT));
        Self {
            program: config.tp_program.clone(),
            sid: config.sid.clone(),
            client: config.client.clone(),
            profile_path: config.profile_path(),
            log_path: config.log_dir.join(name),
            log: None,
        }
    }

    /// Path of this run's log file.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Argument vector for one queue insertion.
    fn args(&self, request: &RequestId) -> Vec<String> {
        vec![
            TP_OPERATION.to_string(),
            request.to_string(),
            self.sid.clone(),
            format!("client={}", self.client),
            format!("pf={}", self.profile_path.display()),
        ]
    }

    /// Handle to the run log, opening it on first use.
    fn open_log(&mut self) -> io::Result<File> {
        if let Some(log) = &self.log {
            return log.try_clone();
        }
        let log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        let handle = log.try_clone()?;
        self.log = Some(log);
        Ok(handle)
    }
}

impl ImportQueue for TpClient {
    fn add_to_buffer(&mut self, request: &RequestId) -> io::Result<ExitStatus> {
        let out = self.open_log()?;
        let err = out.try_clone()?;
        let args = self.args(request);
        debug!(program = %self.program, ?args, "invoking tp");
        let status = Command::new(&self.program)
            .args(&args)
            .stdout(Stdio::from(out))
            .stderr(Stdio::from(err))
            .status()?;
        debug!(request = %request, code = ?status.code(), "tp exited");
        Ok(status)
    }
}
