use poem::http::StatusCode;
use thiserror::Error;

/// Error kinds surfaced by the profile service.
///
/// `NotFound`, `Conflict` and `Validation` carry a message that is safe to
/// return to the caller. `Internal` wraps anything else and is only logged.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn user_not_found() -> Self {
        Self::NotFound("User not found".to_string())
    }

    pub fn email_conflict() -> Self {
        Self::Conflict("Email already exists".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Postgres reports unique constraint violations as SQLSTATE 23505.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|x| x.as_database_error())
        .is_some_and(|x| x.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn test_status() {
        assert_eq!(AppError::user_not_found().status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::email_conflict().status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Validation("bad".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_message() {
        assert_eq!(AppError::user_not_found().to_string(), "User not found");
        assert_eq!(AppError::email_conflict().to_string(), "Email already exists");
    }

    #[test]
    fn test_is_unique_violation_other_errors() {
        assert!(!is_unique_violation(&anyhow!("boom")));
        assert!(!is_unique_violation(&anyhow::Error::from(
            sqlx::Error::RowNotFound
        )));
    }
}
