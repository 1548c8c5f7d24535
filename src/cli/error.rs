//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::{InfraError, StoreError};

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    CheckFailed(String),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        Self::Infra(InfraError::Application(e))
    }
}

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::CheckFailed(_) => crate::exitcode::DATAERR,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Format { .. } => crate::exitcode::DATAERR,
                InfraError::Store(s) => Self::store_exit_code(s),
                InfraError::Application(a) => match a {
                    ApplicationError::Domain(_) => crate::exitcode::DATAERR,
                    ApplicationError::Storage(s) => Self::store_exit_code(s),
                    ApplicationError::EmptyHierarchy => crate::exitcode::NOINPUT,
                    ApplicationError::OperationFailed { .. } => crate::exitcode::SOFTWARE,
                },
            },
        }
    }

    fn store_exit_code(e: &StoreError) -> i32 {
        match e {
            StoreError::Io { .. } => crate::exitcode::IOERR,
            StoreError::Format { .. } => crate::exitcode::DATAERR,
            StoreError::UnknownNode(_) => crate::exitcode::DATAERR,
        }
    }
}
