use jobfinder_api::{ApiError, FailureKind};
use jobfinder_storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("failed to persist session state: {0}")]
    Storage(#[from] StorageError),

    /// An authenticated operation was attempted with no active session.
    #[error("No authentication token")]
    NotAuthenticated,

    /// The server rejected the session token; the session has been ended.
    #[error("Session expired")]
    SessionExpired,

    #[error("session record has no token")]
    MissingToken,

    #[error("auth response did not include a user record")]
    MissingUser,
}

impl AppError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AppError::Api(e) => e.kind(),
            AppError::Storage(_) => FailureKind::Configuration,
            AppError::NotAuthenticated | AppError::SessionExpired | AppError::MissingToken => {
                FailureKind::Authentication
            }
            AppError::MissingUser => FailureKind::Application,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
