use serde::{Deserialize, Serialize};

use crate::validation::{FieldError, Validate, ValidationErrors};

pub const MAX_PAGE_LIMIT: i64 = 50;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Offset pagination as received in query strings.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default)]
    pub limit: i64,
}

impl Validate for Pagination {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();
        if self.skip < 0 {
            errs.push(FieldError::new("Pagination.Skip", "min").with_param("0"));
        }
        if self.limit < 0 {
            errs.push(FieldError::new("Pagination.Limit", "min").with_param("0"));
        } else if self.limit > MAX_PAGE_LIMIT {
            let max = FieldError::new("Pagination.Limit", "max");
            errs.push(max.with_param(MAX_PAGE_LIMIT.to_string()));
        }
        errs.into_result()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ListPage<T> {
    pub total: i64,
    pub items: Vec<T>,
}

/// Error envelope: a stable machine-readable `code` plus a message.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: String,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self { code: code.into(), error: error.into() }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationText {
    pub en: String,
    pub th: String,
}
