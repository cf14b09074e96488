use actix_web::{
    error::{BlockingError, ResponseError},
    http::StatusCode,
    HttpResponse,
};
use derive_more::Display;
use diesel::result::{DatabaseErrorKind, Error as DBError};
use r2d2::Error as PoolError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Display, PartialEq)]
pub enum Error {
    BadRequest(String),
    InternalServerError(String),
    NotFound(String),
    PoolError(String),
    #[display(fmt = "")]
    ValidationError(Vec<String>),
    BlockingError(String),
    #[display(fmt = "Session has ended")]
    SessionEnded,
    #[display(fmt = "Question does not belong to this session")]
    InvalidSession,
    #[display(fmt = "An answer has already been submitted for this question")]
    DuplicateAnswer,
    #[display(fmt = "Could not generate a unique session code")]
    ExhaustedRetries,
    #[display(fmt = "Too many requests, retry in {} seconds", _0)]
    RateLimited(i64),
    UniqueViolation(String),
    #[display(fmt = "Unauthorized")]
    Unauthorized,
    #[display(fmt = "Forbidden")]
    Forbidden,
    CannotEncodeJwtToken(String),
    CannotDecodeJwtToken(String),
}

// User-friendly error messages
#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub errors: Vec<String>,
}

impl ResponseError for Error {
    fn error_response(&self) -> HttpResponse {
        match self {
            Error::ValidationError(ref validation_errors) => HttpResponse::UnprocessableEntity()
                .json(ErrorResponse::from(validation_errors.to_vec())),
            Error::BadRequest(error) => {
                HttpResponse::BadRequest().json(ErrorResponse::from(error))
            }
            Error::NotFound(message) => {
                HttpResponse::NotFound().json(ErrorResponse::from(message))
            }
            Error::InvalidSession => {
                HttpResponse::BadRequest().json(ErrorResponse::from(self.to_string()))
            }
            Error::SessionEnded | Error::DuplicateAnswer => {
                HttpResponse::Conflict().json(ErrorResponse::from(self.to_string()))
            }
            Error::ExhaustedRetries => {
                HttpResponse::ServiceUnavailable().json(ErrorResponse::from(self.to_string()))
            }
            Error::RateLimited(retry_after) => HttpResponse::TooManyRequests()
                .insert_header(("Retry-After", retry_after.to_string()))
                .json(ErrorResponse::from(self.to_string())),
            Error::Unauthorized => {
                HttpResponse::Unauthorized().json(ErrorResponse::from("Unauthorized"))
            }
            Error::Forbidden => HttpResponse::Forbidden().json(ErrorResponse::from("Forbidden")),
            _ => HttpResponse::new(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

impl From<&str> for ErrorResponse {
    fn from(error: &str) -> Self {
        ErrorResponse {
            errors: vec![error.into()],
        }
    }
}

impl From<&String> for ErrorResponse {
    fn from(error: &String) -> Self {
        ErrorResponse {
            errors: vec![error.into()],
        }
    }
}

impl From<String> for ErrorResponse {
    fn from(error: String) -> Self {
        ErrorResponse {
            errors: vec![error],
        }
    }
}

impl From<Vec<String>> for ErrorResponse {
    fn from(errors: Vec<String>) -> Self {
        ErrorResponse { errors }
    }
}

// Convert DBErrors to our Error type
impl From<DBError> for Error {
    fn from(error: DBError) -> Error {
        match error {
            DBError::DatabaseError(kind, info) => {
                if let DatabaseErrorKind::UniqueViolation = kind {
                    let message = info.details().unwrap_or_else(|| info.message()).to_string();
                    return Error::UniqueViolation(message);
                }
                Error::InternalServerError("Unknown database error".into())
            }
            DBError::NotFound => Error::NotFound("Record not found".into()),
            _ => Error::InternalServerError("Unknown database error".into()),
        }
    }
}

// Convert PoolError to our Error type
impl From<PoolError> for Error {
    fn from(error: PoolError) -> Error {
        Error::PoolError(error.to_string())
    }
}

impl From<BlockingError> for Error {
    fn from(error: BlockingError) -> Error {
        Error::BlockingError(error.to_string())
    }
}
