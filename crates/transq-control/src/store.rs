//! File-backed store of scheduled transport requests.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::Config;
use crate::error::ControlError;
use crate::types::{RequestId, ScheduleDate, ScheduleEntry};

/// Outcome of splitting the control file by date.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Requests scheduled for the processing date, in store order.
    pub due: Vec<RequestId>,
    /// Raw lines that stay in the control file, in store order.
    pub remaining: Vec<String>,
    /// Lines that did not match the record format (kept in `remaining`).
    pub malformed: usize,
}

/// Line-oriented store of `(request, date)` entries backed by the control
/// file.
///
/// The file must already exist; no operation creates it. Reads and rewrites
/// are whole-file with no locking, so concurrent runs against the same file
/// are unsafe.
pub struct ControlStore {
    path: PathBuf,
    cofiles_dir: PathBuf,
}

impl ControlStore {
    /// Store over the control file named by `config`.
    pub fn new(config: &Config) -> Self {
        Self {
            path: config.control_file.clone(),
            cofiles_dir: config.cofiles_dir(),
        }
    }

    /// Path of the control file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the sibling backup written before each rewrite.
    ///
    /// The name is fixed, so every rewrite overwrites the previous backup.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".bak");
        PathBuf::from(name)
    }

    /// Append one entry, gated on the cofile and on uniqueness.
    ///
    /// The request's cofile must exist under the transport directory (a
    /// request only grows one once it has been released), and no existing
    /// line may start with the same request number.
    pub fn add(&self, request: &RequestId, date: ScheduleDate) -> Result<(), ControlError> {
        let cofile = self.cofiles_dir.join(request.cofile_name());
        if !cofile.exists() {
            return Err(ControlError::MissingCofile {
                request: request.clone(),
                path: cofile,
            });
        }

        let content = fs::read_to_string(&self.path)?;
        for line in content.lines() {
            if line.starts_with(request.as_str()) {
                return Err(ControlError::Duplicate(request.clone()));
            }
        }

        let entry = ScheduleEntry {
            request: request.clone(),
            date,
        };
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        if !content.is_empty() && !content.ends_with('\n') {
            // Unterminated final line, give the new record its own line.
            writeln!(file)?;
        }
        writeln!(file, "{}", entry.to_line())?;
        debug!(request = %entry.request, date = %entry.date, "appended entry to control file");
        Ok(())
    }

    /// Split the control file into due requests and everything else.
    ///
    /// A well-formed line whose date equals `today` contributes its request
    /// to `due`; every other line passes through unchanged into `remaining`.
    /// Lines that do not parse keep their place in `remaining`; they are
    /// warned about and counted, never repaired and never dispatched.
    pub fn partition(&self, today: ScheduleDate) -> Result<Partition, ControlError> {
        let content = fs::read_to_string(&self.path)?;
        let mut split = Partition::default();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                split.remaining.push(line.to_string());
                continue;
            }
            match ScheduleEntry::parse_line(line) {
                Ok(entry) if entry.date == today => split.due.push(entry.request),
                Ok(_) => split.remaining.push(line.to_string()),
                Err(error) => {
                    split.malformed += 1;
                    warn!(
                        line = index + 1,
                        %error,
                        "control line does not match the record format, leaving it in place"
                    );
                    split.remaining.push(line.to_string());
                }
            }
        }
        debug!(
            due = split.due.len(),
            remaining = split.remaining.len(),
            malformed = split.malformed,
            "partitioned control file"
        );
        Ok(split)
    }

    /// Back up the control file, then overwrite it with `remaining`.
    ///
    /// Callers invoke this only when the due partition is non-empty; a run
    /// with nothing due leaves both the store and the backup untouched.
    pub fn replace_all(&self, remaining: &[String]) -> Result<(), ControlError> {
        let backup = self.backup_path();
        fs::copy(&self.path, &backup)?;
        let mut content = remaining.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        fs::write(&self.path, content)?;
        debug!(
            backup = %backup.display(),
            lines = remaining.len(),
            "rewrote control file"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn date(text: &str) -> ScheduleDate {
        ScheduleDate::parse(text).unwrap()
    }

    fn request(text: &str) -> RequestId {
        RequestId::parse(text).unwrap()
    }

    /// Control file with the given lines plus an empty cofiles tree.
    fn setup(lines: &[&str]) -> (TempDir, ControlStore) {
        let dir = tempfile::tempdir().unwrap();
        let control = dir.path().join("requestscontrol.txt");
        let mut content = lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        fs::write(&control, content).unwrap();
        fs::create_dir_all(dir.path().join("trans/cofiles")).unwrap();
        let config = Config::builder()
            .control_file(control)
            .trans_dir(dir.path().join("trans"))
            .build();
        (dir, ControlStore::new(&config))
    }

    /// Drop the cofile that marks a request as released.
    fn release(dir: &TempDir, text: &str) {
        let cofile = dir
            .path()
            .join("trans/cofiles")
            .join(request(text).cofile_name());
        fs::write(cofile, "").unwrap();
    }

    fn content(store: &ControlStore) -> String {
        fs::read_to_string(store.path()).unwrap()
    }

    #[test]
    fn test_add_appends_formatted_line() {
        let (dir, store) = setup(&[]);
        release(&dir, "NEPK900123");

        store.add(&request("NEPK900123"), date("01/01/2030")).unwrap();

        assert_eq!(content(&store), "NEPK900123 01/01/2030\n");
    }

    #[test]
    fn test_add_preserves_existing_entries() {
        let (dir, store) = setup(&["NEPK900001 02/02/2030"]);
        release(&dir, "NEPK900123");

        store.add(&request("NEPK900123"), date("01/01/2030")).unwrap();

        assert_eq!(
            content(&store),
            "NEPK900001 02/02/2030\nNEPK900123 01/01/2030\n"
        );
    }

    #[test]
    fn test_add_rejects_duplicate_regardless_of_date() {
        let (dir, store) = setup(&["NEPK900123 01/01/2030"]);
        release(&dir, "NEPK900123");
        let before = content(&store);

        let error = store
            .add(&request("NEPK900123"), date("05/05/2031"))
            .unwrap_err();

        assert!(matches!(error, ControlError::Duplicate(_)));
        assert_eq!(content(&store), before);
    }

    #[test]
    fn test_add_rejects_missing_cofile_and_leaves_store_untouched() {
        let (_dir, store) = setup(&["NEPK900001 02/02/2030"]);
        let before = content(&store);

        let error = store
            .add(&request("NEPK900123"), date("01/01/2030"))
            .unwrap_err();

        match error {
            ControlError::MissingCofile { request, path } => {
                assert_eq!(request.as_str(), "NEPK900123");
                assert!(path.ends_with("cofiles/K900123.NEP"));
            }
            other => panic!("expected MissingCofile, got {other:?}"),
        }
        assert_eq!(content(&store), before);
    }

    #[test]
    fn test_add_requires_existing_store_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("trans/cofiles")).unwrap();
        let config = Config::builder()
            .control_file(dir.path().join("missing.txt"))
            .trans_dir(dir.path().join("trans"))
            .build();
        let store = ControlStore::new(&config);
        release(&dir, "NEPK900123");

        let error = store
            .add(&request("NEPK900123"), date("01/01/2030"))
            .unwrap_err();

        assert!(matches!(error, ControlError::Io(_)));
    }

    #[test]
    fn test_add_terminates_a_ragged_final_line() {
        let (dir, store) = setup(&[]);
        fs::write(store.path(), "NEPK900001 02/02/2030").unwrap();
        release(&dir, "NEPK900123");

        store.add(&request("NEPK900123"), date("01/01/2030")).unwrap();

        assert_eq!(
            content(&store),
            "NEPK900001 02/02/2030\nNEPK900123 01/01/2030\n"
        );
    }

    #[test]
    fn test_partition_splits_by_date_in_store_order() {
        let (_dir, store) = setup(&[
            "NEPK900001 01/01/2030",
            "NEPK900002 24/12/2029",
            "NEPK900003 01/01/2030",
        ]);

        let split = store.partition(date("01/01/2030")).unwrap();

        assert_eq!(split.due, vec![request("NEPK900001"), request("NEPK900003")]);
        assert_eq!(split.remaining, vec!["NEPK900002 24/12/2029".to_string()]);
        assert_eq!(split.malformed, 0);
    }

    #[test]
    fn test_partition_of_empty_store() {
        let (_dir, store) = setup(&[]);

        let split = store.partition(date("01/01/2030")).unwrap();

        assert_eq!(split, Partition::default());
    }

    #[test]
    fn test_partition_preserves_malformed_lines_verbatim() {
        let (_dir, store) = setup(&[
            "not a record",
            "NEPK900001 01/01/2030",
            "NEPK900002 32/01/2030",
        ]);

        let split = store.partition(date("01/01/2030")).unwrap();

        assert_eq!(split.due, vec![request("NEPK900001")]);
        assert_eq!(
            split.remaining,
            vec![
                "not a record".to_string(),
                "NEPK900002 32/01/2030".to_string(),
            ]
        );
        assert_eq!(split.malformed, 2);
    }

    #[test]
    fn test_partition_passes_blank_lines_through_silently() {
        let (_dir, store) = setup(&["", "NEPK900001 01/01/2030"]);

        let split = store.partition(date("01/01/2030")).unwrap();

        assert_eq!(split.due, vec![request("NEPK900001")]);
        assert_eq!(split.remaining, vec![String::new()]);
        assert_eq!(split.malformed, 0);
    }

    #[test]
    fn test_partition_is_a_total_split() {
        let lines = [
            "NEPK900001 01/01/2030",
            "garbage",
            "NEPK900002 02/01/2030",
            "NEPK900003 01/01/2030",
        ];
        let (_dir, store) = setup(&lines);

        let split = store.partition(date("01/01/2030")).unwrap();

        assert_eq!(split.due.len() + split.remaining.len(), lines.len());
    }

    #[test]
    fn test_replace_all_backs_up_then_rewrites() {
        let (_dir, store) = setup(&["NEPK900001 01/01/2030", "NEPK900002 24/12/2029"]);
        let original = content(&store);

        store
            .replace_all(&["NEPK900002 24/12/2029".to_string()])
            .unwrap();

        assert_eq!(fs::read_to_string(store.backup_path()).unwrap(), original);
        assert_eq!(content(&store), "NEPK900002 24/12/2029\n");
    }

    #[test]
    fn test_replace_all_with_nothing_remaining_empties_the_store() {
        let (_dir, store) = setup(&["NEPK900001 01/01/2030"]);
        let original = content(&store);

        store.replace_all(&[]).unwrap();

        assert_eq!(fs::read_to_string(store.backup_path()).unwrap(), original);
        assert_eq!(content(&store), "");
    }

    #[test]
    fn test_replace_all_overwrites_the_previous_backup() {
        let (_dir, store) = setup(&["NEPK900001 01/01/2030"]);

        store
            .replace_all(&["NEPK900009 09/09/2031".to_string()])
            .unwrap();
        store.replace_all(&[]).unwrap();

        assert_eq!(
            fs::read_to_string(store.backup_path()).unwrap(),
            "NEPK900009 09/09/2031\n"
        );
        assert_eq!(content(&store), "");
    }
}
