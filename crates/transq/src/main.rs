//! transq: scheduler to insert SAP transport requests in the import queue.
//!
//! Maintains a control file of `(request, date)` entries and, when run on a
//! request's scheduled date, inserts it into the import queue through tp:
//! - no action flag: interactive menu
//! - `--insert`: add new requests to the control file
//! - `--process`: dispatch the requests due today

use std::path::PathBuf;

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use transq_control::{Config, ScheduleDate};

mod insert;
mod process;

#[derive(Parser)]
#[command(name = "transq")]
#[command(about = "Scheduler to insert SAP transport requests in the import queue", long_about = None)]
struct Cli {
    /// Add new requests to the control file
    #[arg(long, conflicts_with = "process")]
    insert: bool,

    /// Process the control file and import the requests due today
    #[arg(long)]
    process: bool,

    /// Control file holding the scheduled requests
    #[arg(long, env = "TRANSQ_CONTROL_FILE", default_value = "requestscontrol.txt")]
    control_file: PathBuf,

    /// SAP transport directory (holds cofiles/ and bin/)
    #[arg(long, env = "TRANSQ_TRANS_DIR", default_value = "/usr/sap/trans")]
    trans_dir: PathBuf,

    /// Target system id
    #[arg(long, env = "TRANSQ_SID", default_value = "NEP")]
    sid: String,

    /// Target client number
    #[arg(long, env = "TRANSQ_CLIENT", default_value = "300")]
    client: String,

    /// Transport profile file name under <trans-dir>/bin
    #[arg(long, env = "TRANSQ_PROFILE", default_value = "TP_DOMAIN_NED.PFL")]
    profile: String,

    /// tp program to invoke
    #[arg(long, env = "TRANSQ_TP_PROGRAM", default_value = "tp")]
    tp_program: String,

    /// Directory receiving the per-run tp logs
    #[arg(long, env = "TRANSQ_LOG_DIR", default_value = ".")]
    log_dir: PathBuf,
}

impl Cli {
    fn config(&self) -> Config {
        Config::builder()
            .control_file(self.control_file.clone())
            .trans_dir(self.trans_dir.clone())
            .sid(self.sid.clone())
            .client(self.client.clone())
            .profile(self.profile.clone())
            .tp_program(self.tp_program.clone())
            .log_dir(self.log_dir.clone())
            .build()
    }
}

/// Prompt on stderr, read one trimmed line from stdin.
///
/// Returns `None` once stdin is exhausted, so the interactive loops can
/// tell end of input apart from an empty entry.
fn prompt(label: &str) -> Option<String> {
    eprint!("{} ", label);
    let mut input = String::new();
    match std::io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input.trim().to_string()),
    }
}

/// Interactive menu shown when no action flag is given.
fn menu(config: &Config, today: ScheduleDate) -> Result<()> {
    println!("******************************************************************");
    println!("*** SCHEDULER TO INSERT TRANSPORT REQUESTS IN THE IMPORT QUEUE ***");
    println!("******************************************************************");
    println!("System: {}   Client: {}", config.sid, config.client);
    println!("1 - Add new requests to the control file");
    println!("2 - Process the control file and import the due requests");
    println!("q - Quit");

    let result = match prompt("Choice:").as_deref() {
        Some("1") => insert::run(config, today),
        Some("2") => process::run(config, today),
        _ => Ok(()),
    };

    prompt("Press Enter to exit.");
    result
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                "transq=info,transq_control=info,transq_tp=info".to_string()
            }),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    let today = ScheduleDate::today();

    if cli.insert {
        insert::run(&config, today)
    } else if cli.process {
        process::run(&config, today)
    } else {
        menu(&config, today)
    }
}
