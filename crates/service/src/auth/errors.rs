use thiserror::Error;

use crate::errors::ServiceError;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("username already taken")]
    UsernameTaken,
    #[error("email already registered")]
    EmailTaken,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Storage(#[from] ServiceError),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::UsernameTaken => 1002,
            AuthError::EmailTaken => 1003,
            AuthError::InvalidCredentials => 1004,
            AuthError::Storage(_) => 1200,
        }
    }

    /// True for failures caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, AuthError::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let all = [
            AuthError::Validation("x".into()),
            AuthError::UsernameTaken,
            AuthError::EmailTaken,
            AuthError::InvalidCredentials,
            AuthError::Storage(ServiceError::Unavailable("down".into())),
        ];
        let mut codes: Vec<u16> = all.iter().map(AuthError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn storage_is_server_side() {
        assert!(AuthError::InvalidCredentials.is_client_error());
        assert!(!AuthError::Storage(ServiceError::Unavailable("down".into())).is_client_error());
    }
}
