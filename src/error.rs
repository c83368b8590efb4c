//! Errors surfaced by a chat turn. Each carries a stable machine code for the
//! HTTP body and a human message; the variant decides the HTTP status.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppError {
    /// The request itself is unusable (e.g. a blank chat message).
    UserInput { code: String, message: String },
    /// The configured data file is absent.
    NotFound { code: String, message: String },
    /// The data file exists but its contents cannot answer the question.
    Data { code: String, message: String },
    Io { code: String, message: String },
    Internal { code: String, message: String },
}

impl AppError {
    pub fn code_str(&self) -> &str {
        match self {
            AppError::UserInput { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::Data { code, .. }
            | AppError::Io { code, .. }
            | AppError::Internal { code, .. } => code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::UserInput { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::Data { message, .. }
            | AppError::Io { message, .. }
            | AppError::Internal { message, .. } => message,
        }
    }

    pub fn user(code: &str, msg: impl Into<String>) -> Self { AppError::UserInput { code: code.to_string(), message: msg.into() } }
    pub fn not_found(code: &str, msg: impl Into<String>) -> Self { AppError::NotFound { code: code.to_string(), message: msg.into() } }
    pub fn data(code: &str, msg: impl Into<String>) -> Self { AppError::Data { code: code.to_string(), message: msg.into() } }
    pub fn internal(code: &str, msg: impl Into<String>) -> Self { AppError::Internal { code: code.to_string(), message: msg.into() } }

    pub fn http_status(&self) -> u16 {
        match self {
            AppError::UserInput { .. } => 400,
            AppError::NotFound { .. } => 404,
            AppError::Data { .. } => 422,
            AppError::Io { .. } => 503,
            AppError::Internal { .. } => 500,
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self { AppError::internal("internal", err.to_string()) }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self { AppError::Io { code: "io".into(), message: err.to_string() } }
}

impl From<polars::prelude::PolarsError> for AppError {
    // Missing columns and bad casts come from the shape of the source file
    fn from(err: polars::prelude::PolarsError) -> Self { AppError::data("data_error", err.to_string()) }
}
