use rocket::http::Status;
use sentify_core::SentifyError;
use sentify_protocol::ErrorBody;
use thiserror::Error;

/// Errors raised while running the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("rocket error: {0}")]
    Rocket(#[from] rocket::Error),
}

/// HTTP status for a core error.
pub fn status_for(err: &SentifyError) -> Status {
    match err {
        SentifyError::Validation(_) => Status::UnprocessableEntity,
        SentifyError::StoreUnavailable(_) => Status::ServiceUnavailable,
        SentifyError::Classification(_) | SentifyError::Config(_) => Status::InternalServerError,
    }
}

/// Wire payload for a core error.
pub fn error_body(err: &SentifyError) -> ErrorBody {
    ErrorBody {
        kind: err.kind().to_string(),
        message: err.to_string(),
    }
}
