use axum::http::StatusCode;
use standard_error::{Interpolate, StandardError, Status};

pub type Result<T> = core::result::Result<T, StandardError>;

pub trait OrStandardError<T> {
    fn or_err(self, code: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> OrStandardError<T> for core::result::Result<T, E> {
    fn or_err(self, code: &str) -> Result<T> {
        self.map_err(|e| StandardError::new(code).interpolate_err(e.to_string()))
    }
}

pub fn bad_request(code: &str, detail: impl ToString) -> StandardError {
    StandardError::new(code)
        .interpolate_err(detail.to_string())
        .code(StatusCode::BAD_REQUEST)
}

pub fn not_found(code: &str) -> StandardError {
    StandardError::new(code).code(StatusCode::NOT_FOUND)
}
