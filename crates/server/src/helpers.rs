use axum::http::{header::ACCEPT_LANGUAGE, HeaderMap};

/// Language from `accept-language` when it is one of `supported`,
/// otherwise the first supported language.
pub fn accepted_language<'a>(headers: &HeaderMap, supported: &[&'a str]) -> Option<&'a str> {
    let requested = headers.get(ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok());
    supported
        .iter()
        .find(|lang| Some(**lang) == requested)
        .or_else(|| supported.first())
        .copied()
}
