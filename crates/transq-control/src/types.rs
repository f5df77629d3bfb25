//! Record types for the control file.

use std::fmt;

use chrono::{Local, NaiveDate};

use crate::error::ControlError;

/// Wire format of schedule dates.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Length of a transport request number.
const REQUEST_LEN: usize = 10;

/// Length of the system/project prefix inside a request number.
const PREFIX_LEN: usize = 3;

/// A transport request number, e.g. `NEPK900123`.
///
/// Exactly 10 ASCII alphanumeric characters: a 3-character prefix naming the
/// source system plus a 7-character sequence. The cofile name is derived by
/// swapping the halves around a dot (`K900123.NEP`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Parse a request number, rejecting anything that is not 10 ASCII
    /// alphanumeric characters.
    pub fn parse(text: &str) -> Result<Self, ControlError> {
        if text.len() != REQUEST_LEN || !text.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ControlError::InvalidRequest(text.to_string()));
        }
        Ok(Self(text.to_string()))
    }

    /// The full request number.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 3-character system/project prefix.
    pub fn prefix(&self) -> &str {
        &self.0[..PREFIX_LEN]
    }

    /// The 7-character sequence after the prefix.
    pub fn sequence(&self) -> &str {
        &self.0[PREFIX_LEN..]
    }

    /// Name of the companion cofile under the transport directory.
    pub fn cofile_name(&self) -> String {
        format!("{}.{}", self.sequence(), self.prefix())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A calendar date in the control file's `DD/MM/YYYY` format.
///
/// Parsing is strict: the text must round-trip to the identical string, so
/// non-canonical spellings like `1/1/2024` are rejected along with
/// impossible dates like `31/02/2024`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScheduleDate(NaiveDate);

impl ScheduleDate {
    /// Parse a date, rejecting anything that does not round-trip under
    /// [`DATE_FORMAT`].
    pub fn parse(text: &str) -> Result<Self, ControlError> {
        let parsed = NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map_err(|_| ControlError::InvalidDate(text.to_string()))?;
        if parsed.format(DATE_FORMAT).to_string() != text {
            return Err(ControlError::InvalidDate(text.to_string()));
        }
        Ok(Self(parsed))
    }

    /// Today in local time.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// True if this date is strictly later than `other`.
    pub fn is_after(self, other: Self) -> bool {
        self.0 > other.0
    }
}

impl From<NaiveDate> for ScheduleDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for ScheduleDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

/// One control-file record: a request and the date it becomes due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    /// Request to insert into the import queue.
    pub request: RequestId,
    /// Date on which the request becomes due.
    pub date: ScheduleDate,
}

impl ScheduleEntry {
    /// Parse one store line, `<requestId:10><space><date:10>`.
    ///
    /// Field boundaries come from the single space separator; both fields
    /// are then parsed strictly, so trailing garbage fails the date parse.
    pub fn parse_line(line: &str) -> Result<Self, ControlError> {
        let Some((request, date)) = line.split_once(' ') else {
            return Err(ControlError::MalformedLine(line.to_string()));
        };
        Ok(Self {
            request: RequestId::parse(request)?,
            date: ScheduleDate::parse(date)?,
        })
    }

    /// Render the entry as a store line (no trailing newline).
    pub fn to_line(&self) -> String {
        format!("{} {}", self.request, self.date)
    }
}

/// Validate a date entered in the manual-insert flow.
///
/// True only if `text` parses strictly under [`DATE_FORMAT`] and the parsed
/// date is strictly later than `today`. Parse failures yield `false`, never
/// an error, so callers can simply re-prompt.
pub fn validate_date(text: &str, today: ScheduleDate) -> bool {
    ScheduleDate::parse(text)
        .map(|date| date.is_after(today))
        .unwrap_or(false)
}
