//! Error types for the control-file workflow.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::RequestId;

/// Errors that can occur while maintaining or processing the control file.
#[derive(Debug, Error)]
pub enum ControlError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Text is not a well-formed transport request number.
    #[error("invalid request number: {0:?}")]
    InvalidRequest(String),

    /// Text is not a canonical `DD/MM/YYYY` date.
    #[error("invalid schedule date: {0:?}")]
    InvalidDate(String),

    /// Control-file line that does not match the record format.
    #[error("malformed control line: {0:?}")]
    MalformedLine(String),

    /// Cofile for the request does not exist under the transport directory.
    #[error("cofile for request {request} not found: {}", .path.display())]
    MissingCofile {
        /// Request whose cofile was probed.
        request: RequestId,
        /// Path that was probed.
        path: PathBuf,
    },

    /// Request is already present in the control file.
    #[error("request {0} already in control file")]
    Duplicate(RequestId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_display_names_the_request() {
        let request = RequestId::parse("NEPK900123").unwrap();
        let error = ControlError::Duplicate(request);
        assert_eq!(error.to_string(), "request NEPK900123 already in control file");
    }

    #[test]
    fn test_missing_cofile_display_names_the_path() {
        let request = RequestId::parse("NEPK900123").unwrap();
        let error = ControlError::MissingCofile {
            request,
            path: PathBuf::from("/usr/sap/trans/cofiles/K900123.NEP"),
        };
        let text = error.to_string();
        assert!(text.contains("NEPK900123"));
        assert!(text.contains("K900123.NEP"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error: ControlError = io.into();
        assert!(matches!(error, ControlError::Io(_)));
    }
}
