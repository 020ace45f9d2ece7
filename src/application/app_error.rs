use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Authentication required")]
    MissingCredentials,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Wire-level status names for the error body. The `status` field carries
/// the name, the numeric code mirrors the HTTP status line.
#[derive(Clone, Copy, Debug)]
pub enum ErrorStatus {
    Unauthorized,
    BadRequest,
    InternalServerError,
}

impl ErrorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorStatus::Unauthorized => "UNAUTHORIZED",
            ErrorStatus::BadRequest => "BAD_REQUEST",
            ErrorStatus::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
