use thiserror::Error;

/// Failures reported by a [`UserStore`](crate::store::UserStore) backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("{0}")]
    Unavailable(String),

    /// Only returned by conditional writes.
    #[error("user {0} already exists")]
    AlreadyExists(String),

    #[error("malformed stored item: {0}")]
    Malformed(String),
}

/// Coarse classification used to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    StoreUnavailable,
}

#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("Invalid request body: {0}")]
    InvalidPayload(String),

    #[error("userId is required")]
    MissingUserId,

    #[error("User already exists")]
    Conflict(String),

    #[error("Error checking for existing user: {0}")]
    LookupFailed(#[source] StoreError),

    #[error("Failed to save user: {0}")]
    SaveFailed(#[source] StoreError),
}

impl RegistrationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistrationError::InvalidPayload(_) | RegistrationError::MissingUserId => {
                ErrorKind::Validation
            }
            RegistrationError::Conflict(_) => ErrorKind::Conflict,
            RegistrationError::LookupFailed(_) | RegistrationError::SaveFailed(_) => {
                ErrorKind::StoreUnavailable
            }
        }
    }
}

impl From<serde_json::Error> for RegistrationError {
    fn from(err: serde_json::Error) -> Self {
        RegistrationError::InvalidPayload(err.to_string())
    }
}

pub type RegistrationResult<T> = Result<T, RegistrationError>;
