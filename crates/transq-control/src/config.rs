//! Runtime configuration shared by the store and the tp wrapper.

use std::path::PathBuf;

// Defaults matching the site constants this tool grew up with.
const DEFAULT_CONTROL_FILE: &str = "requestscontrol.txt";
const DEFAULT_TRANS_DIR: &str = "/usr/sap/trans";
const DEFAULT_SID: &str = "NEP";
const DEFAULT_CLIENT: &str = "300";
const DEFAULT_PROFILE: &str = "TP_DOMAIN_NED.PFL";
const DEFAULT_TP_PROGRAM: &str = "tp";

/// Configuration for one run of the tool.
///
/// Everything the two flows need: where the control file lives, where the
/// transport directory is, and how tp addresses the target system. Built
/// from CLI flags in the binary and from temp paths in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path of the control file.
    pub control_file: PathBuf,
    /// SAP transport directory, holding `cofiles/` and `bin/`.
    pub trans_dir: PathBuf,
    /// Target system id.
    pub sid: String,
    /// Target client number.
    pub client: String,
    /// Transport profile file name under `<trans_dir>/bin`.
    pub profile: String,
    /// Program invoked to insert requests into the import queue.
    pub tp_program: String,
    /// Directory receiving the per-run tp logs.
    pub log_dir: PathBuf,
}

impl Config {
    /// Builder starting from the defaults.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Directory probed by the cofile gate.
    pub fn cofiles_dir(&self) -> PathBuf {
        self.trans_dir.join("cofiles")
    }

    /// Full path of the transport profile passed to tp.
    pub fn profile_path(&self) -> PathBuf {
        self.trans_dir.join("bin").join(&self.profile)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            control_file: PathBuf::from(DEFAULT_CONTROL_FILE),
            trans_dir: PathBuf::from(DEFAULT_TRANS_DIR),
            sid: DEFAULT_SID.to_string(),
            client: DEFAULT_CLIENT.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
            tp_program: DEFAULT_TP_PROGRAM.to_string(),
            log_dir: PathBuf::from("."),
        }
    }
}

/// Builder for [`Config`].
#[derive(Debug, Default, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    #[must_use]
    pub fn control_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.control_file = path.into();
        self
    }

    #[must_use]
    pub fn trans_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.trans_dir = path.into();
        self
    }

    #[must_use]
    pub fn sid(mut self, sid: impl Into<String>) -> Self {
        self.config.sid = sid.into();
        self
    }

    #[must_use]
    pub fn client(mut self, client: impl Into<String>) -> Self {
        self.config.client = client.into();
        self
    }

    #[must_use]
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.config.profile = profile.into();
        self
    }

    #[must_use]
    pub fn tp_program(mut self, program: impl Into<String>) -> Self {
        self.config.tp_program = program.into();
        self
    }

    #[must_use]
    pub fn log_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log_dir = path.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
