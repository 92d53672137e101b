use askama::Template;
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};

use crate::views::NotFoundPage;

pub type Maybe<T> = Result<T, Error>;

pub async fn handler404(path: Uri) -> Response {
    let page = NotFoundPage {
        flashes: Vec::new(),
        path: path.to_string(),
    };
    match page.render() {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(err) => Error::from(err).into_response(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing required configuration: {}", .missing.join(", "))]
    MissingConfig { missing: Vec<&'static str> },
    #[error("invalid configuration for {key}: {message}")]
    InvalidConfig { key: &'static str, message: String },
    #[error("Database error: {message}")]
    Connection { message: String },
    #[error("Database error: {message}")]
    Database { message: String },
    #[error("{message}")]
    Validation { message: &'static str },
    #[error("Please log in as admin to access this page.")]
    NotAuthorized,
    #[error("malformed certificate links for {regno}: {message}")]
    Deserialization { regno: String, message: String },
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Only errors that end a request outright become responses (template
/// failures, unreadable stored links); the rest are flashed by handlers.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => Self::Connection {
                message: err.to_string(),
            },
            other => Self::Database {
                message: other.to_string(),
            },
        }
    }
}
