//! Extractors that decode obfuscated identifiers from the request.

use async_trait::async_trait;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use common::errors::ErrorKind;
use common::hashid::{Id, IdHasher};

use crate::errors::ApiError;
use crate::state::AppState;

/// Single `:id` path parameter decoded with the shared codec.
///
/// A malformed hash is rejected as a validation failure; a hash decoding to
/// the unset id is treated as not found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedId(pub Id);

#[async_trait]
impl FromRequestParts<AppState> for DecodedId {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(hash) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ErrorKind::NotFound.wrap(e.body_text()))?;
        let id = state.hashid.decode(&hash)?;
        if id.is_none() {
            return Err(ErrorKind::NotFound.into());
        }
        Ok(Self(id))
    }
}
