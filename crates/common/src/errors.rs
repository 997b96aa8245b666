//! Domain error taxonomy and its HTTP translation.
//!
//! Failures are tagged with one of five [`ErrorKind`]s where they are first
//! detected, wrapped with context on the way up, and classified exactly once
//! at the HTTP boundary by [`error_to_http`].

use std::error::Error as StdError;

use axum::http::{HeaderMap, StatusCode};
use serde::Serialize;
use thiserror::Error as ThisError;

use crate::hashid::HashIdError;
use crate::validation::{map_validation_errors, ValidationErrors};

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ThisError)]
pub enum ErrorKind {
    #[error("unauthorized")]
    Unauthorized,
    #[error("permission_denied")]
    PermissionDenied,
    #[error("not_found")]
    NotFound,
    #[error("validation_failed")]
    ValidationFailed,
    #[error("unexpected")]
    Unexpected,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 5] = [
        ErrorKind::Unauthorized,
        ErrorKind::PermissionDenied,
        ErrorKind::NotFound,
        ErrorKind::ValidationFailed,
        ErrorKind::Unexpected,
    ];

    /// Canonical name; also the message of a freshly wrapped error.
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::PermissionDenied => "permission_denied",
            ErrorKind::NotFound => "not_found",
            ErrorKind::ValidationFailed => "validation_failed",
            ErrorKind::Unexpected => "unexpected",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    pub fn error(self) -> Error {
        Error::new(self, None)
    }

    pub fn wrap<E>(self, inner: E) -> Error
    where
        E: Into<BoxError>,
    {
        Error::new(self, Some(inner.into()))
    }
}

/// One node of a causal chain: a kind plus an optional inner cause.
#[derive(Debug, ThisError)]
#[error("{}", describe(.kind, .source))]
pub struct Error {
    kind: ErrorKind,
    #[source]
    source: Option<BoxError>,
}

fn describe(kind: &ErrorKind, source: &Option<BoxError>) -> String {
    match source {
        Some(inner) => format!("{kind}: {inner}"),
        None => kind.as_str().to_owned(),
    }
}

impl Error {
    pub fn new(kind: ErrorKind, inner: Option<BoxError>) -> Self {
        Self { kind, source: inner }
    }

    pub fn validation(errs: ValidationErrors) -> Self {
        ErrorKind::ValidationFailed.wrap(errs)
    }

    /// Kind attached at this node.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Innermost kind reachable through nested taxonomy errors.
    pub fn root_kind(&self) -> ErrorKind {
        let mut kind = self.kind;
        let mut cur = self.source.as_deref().map(|e| e as &(dyn StdError + 'static));
        while let Some(node) = cur {
            if let Some(e) = node.downcast_ref::<Error>() {
                kind = e.kind;
            } else if let Some(k) = node.downcast_ref::<ErrorKind>() {
                kind = *k;
            }
            cur = node.source();
        }
        kind
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        is_kind(self, kind)
    }

    /// First validation failure set carried anywhere in the chain.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        find_validation_errors(self)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        kind.error()
    }
}

impl From<ValidationErrors> for Error {
    fn from(errs: ValidationErrors) -> Self {
        Error::validation(errs)
    }
}

impl From<HashIdError> for Error {
    fn from(err: HashIdError) -> Self {
        match err {
            HashIdError::Decoding(_) => ErrorKind::ValidationFailed.wrap(err),
            HashIdError::Encoding(_) | HashIdError::InvalidConfig(_) => {
                ErrorKind::Unexpected.wrap(err)
            }
        }
    }
}

/// True if `kind` is attached anywhere along `err`'s source chain.
///
/// Foreign errors in the chain are matched by message through
/// [`legacy_message_matches`].
pub fn is_kind(err: &(dyn StdError + 'static), kind: ErrorKind) -> bool {
    let mut cur = Some(err);
    while let Some(node) = cur {
        let matched = if let Some(e) = node.downcast_ref::<Error>() {
            e.kind == kind
        } else if let Some(k) = node.downcast_ref::<ErrorKind>() {
            *k == kind
        } else {
            legacy_message_matches(&node.to_string(), kind)
        };
        if matched {
            return true;
        }
        cur = node.source();
    }
    false
}

/// Message-based classification for errors that carry their kind only as a
/// `"<kind>"` or `"<kind>: ..."` message. A foreign error whose text happens
/// to start with a kind name is classified as that kind.
pub fn legacy_message_matches(message: &str, kind: ErrorKind) -> bool {
    let name = kind.as_str();
    match message.strip_prefix(name) {
        Some("") => true,
        Some(rest) => rest.starts_with(": "),
        None => false,
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidationErrorBody {
    pub error: &'static str,
    pub details: Vec<String>,
}

/// Transport-level rendering of an error.
#[derive(Debug, Clone)]
pub struct HttpError {
    pub status: StatusCode,
    pub body: Option<serde_json::Value>,
    pub headers: HeaderMap,
}

impl HttpError {
    fn empty(status: StatusCode) -> Self {
        Self { status, body: None, headers: HeaderMap::new() }
    }
}

/// Maps an error chain onto a status and body. `None` in, `None` out: with
/// no error there is nothing to respond with. Anything outside the known
/// kinds becomes an opaque 500.
pub fn error_to_http(err: Option<&(dyn StdError + 'static)>) -> Option<HttpError> {
    let err = err?;
    let translated = if is_kind(err, ErrorKind::Unauthorized) {
        HttpError::empty(StatusCode::UNAUTHORIZED)
    } else if is_kind(err, ErrorKind::PermissionDenied) {
        HttpError::empty(StatusCode::FORBIDDEN)
    } else if is_kind(err, ErrorKind::NotFound) {
        HttpError::empty(StatusCode::NOT_FOUND)
    } else if is_kind(err, ErrorKind::ValidationFailed) {
        let body = ValidationErrorBody {
            error: ErrorKind::ValidationFailed.as_str(),
            details: find_validation_errors(err).map(map_validation_errors).unwrap_or_default(),
        };
        HttpError {
            status: StatusCode::BAD_REQUEST,
            body: serde_json::to_value(body).ok(),
            headers: HeaderMap::new(),
        }
    } else {
        HttpError::empty(StatusCode::INTERNAL_SERVER_ERROR)
    };
    Some(translated)
}

fn find_validation_errors<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a ValidationErrors> {
    let mut cur = Some(err);
    while let Some(node) = cur {
        if let Some(errs) = node.downcast_ref::<ValidationErrors>() {
            return Some(errs);
        }
        cur = node.source();
    }
    None
}
