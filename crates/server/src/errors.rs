use std::sync::Arc;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::errors::{error_to_http, Error, ErrorKind};
use common::hashid::HashIdError;
use common::validation::ValidationErrors;
use thiserror::Error as ThisError;
use tracing::{debug, error};

/// Handler-side error. Converting it into a response only records the
/// error; [`error_boundary`] decides what the client sees.
#[derive(Debug)]
pub struct ApiError(pub Error);

/// Error stashed in response extensions for the boundary to translate.
#[derive(Debug, Clone)]
pub struct RecordedError(pub Arc<Error>);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        res.extensions_mut().insert(RecordedError(Arc::new(self.0)));
        res
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl From<ErrorKind> for ApiError {
    fn from(kind: ErrorKind) -> Self {
        Self(kind.error())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errs: ValidationErrors) -> Self {
        Self(Error::validation(errs))
    }
}

impl From<HashIdError> for ApiError {
    fn from(err: HashIdError) -> Self {
        Self(err.into())
    }
}

/// Runs after the handler and turns a recorded [`ApiError`] into the final
/// response. Responses without a recorded error pass through untouched.
pub async fn error_boundary(req: Request, next: Next) -> Response {
    let res = next.run(req).await;
    match res.extensions().get::<RecordedError>().cloned() {
        Some(RecordedError(err)) => render(&err),
        None => res,
    }
}

pub fn render(err: &Error) -> Response {
    let Some(http) = error_to_http(Some(err)) else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    if http.status.is_server_error() {
        error!(error = %err, status = http.status.as_u16(), "request failed");
    } else {
        debug!(error = %err, status = http.status.as_u16(), "request rejected");
    }
    let mut res = match http.body {
        Some(body) => (http.status, Json(body)).into_response(),
        None => http.status.into_response(),
    };
    res.headers_mut().extend(http.headers);
    res
}

#[derive(Debug, ThisError)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("identifier codec: {0}")]
    HashId(#[from] HashIdError),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
