//! Error types for taskflow
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (validation failure, bad args, bad config)
//! - 3: Unknown id (task, time entry, attachment, project)
//! - 4: Operation failed (I/O, serialization)

use thiserror::Error;

/// Exit codes for the taskflow CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const NOT_FOUND: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for taskflow operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    /// Rejected input. The message is written for end users and is surfaced
    /// verbatim as the notification text.
    #[error("{0}")]
    Validation(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Unknown ids (exit code 3)
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Time entry not found: {0}")]
    TimeEntryNotFound(String),

    #[error("Attachment not found: {0}")]
    AttachmentNotFound(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::Validation(_) | Error::InvalidConfig(_) | Error::InvalidArgument(_) => {
                exit_codes::USER_ERROR
            }

            // Unknown ids
            Error::TaskNotFound(_)
            | Error::TimeEntryNotFound(_)
            | Error::AttachmentNotFound(_)
            | Error::ProjectNotFound(_) => exit_codes::NOT_FOUND,

            // Operation failures
            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// True for errors caused by rejected user input rather than a missing
    /// id or a failed operation.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

/// Result type alias for taskflow operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_map_by_kind() {
        assert_eq!(
            Error::Validation("Please enter a task title".to_string()).exit_code(),
            exit_codes::USER_ERROR
        );
        assert_eq!(
            Error::TaskNotFound("tf-missing".to_string()).exit_code(),
            exit_codes::NOT_FOUND
        );
        assert_eq!(
            Error::OperationFailed("boom".to_string()).exit_code(),
            exit_codes::OPERATION_FAILED
        );
    }

    #[test]
    fn validation_displays_message_verbatim() {
        let err = Error::Validation("Please enter a task title".to_string());
        assert_eq!(err.to_string(), "Please enter a task title");
        assert!(err.is_validation());
    }
}
