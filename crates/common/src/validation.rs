//! Field-level validation failures and their user-facing phrasing.

use thiserror::Error;

/// One rule violation on one field.
///
/// `namespace` is the dotted path starting at the root type, e.g.
/// `User.profile.age`; `tag` is the rule name and `param` its argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    namespace: String,
    tag: String,
    param: String,
}

impl FieldError {
    pub fn new(namespace: impl Into<String>, tag: impl Into<String>) -> Self {
        Self { namespace: namespace.into(), tag: tag.into(), param: String::new() }
    }

    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = param.into();
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Last segment of the namespace.
    pub fn field(&self) -> &str {
        self.namespace.rsplit('.').next().unwrap_or(&self.namespace)
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn param(&self) -> &str {
        &self.param
    }
}

/// Ordered set of violations from one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", describe(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, err: FieldError) {
        self.errors.push(err);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.errors.iter()
    }

    /// `Ok(())` when nothing was recorded, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| {
            format!(
                "Key: '{}' Error:Field validation for '{}' failed on the '{}' tag",
                e.namespace,
                e.field(),
                e.tag
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Implemented by request types that check their own field rules.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Converts one raw path segment into its display form.
pub type Casing = fn(&str) -> String;

/// Renders violations as `"<field path> <rule phrase>"` strings.
#[derive(Debug, Clone, Copy)]
pub struct ValidationTranslator {
    casing: Casing,
}

impl Default for ValidationTranslator {
    fn default() -> Self {
        Self { casing: lower_camel }
    }
}

impl ValidationTranslator {
    pub fn with_casing(casing: Casing) -> Self {
        Self { casing }
    }

    pub fn translate(&self, errs: &ValidationErrors) -> Vec<String> {
        errs.iter()
            .map(|e| format!("{} {}", self.field_path(e.namespace()), self.phrase(e)))
            .collect()
    }

    /// Drops the root segment and re-cases the rest.
    fn field_path(&self, namespace: &str) -> String {
        namespace
            .split('.')
            .skip(1)
            .map(|segment| (self.casing)(segment))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn phrase(&self, e: &FieldError) -> String {
        let param = e.param();
        match e.tag() {
            "gtfield" => format!("must greater than {}", (self.casing)(param)),
            "gtefield" => format!("must be greater than or equal {}", (self.casing)(param)),
            "lte" => format!("must be maximum {param}"),
            "gt" => format!("must be greater than {param}"),
            "gte" => format!("must be greater than or equal {param}"),
            "ltefield" => format!("must be less then or equal {}", (self.casing)(param)),
            "required_with" => format!("required with {}", (self.casing)(param)),
            "oneof" => format!("must be one of {param}"),
            other => other.to_string(),
        }
    }
}

/// Translate with the default lower-camel casing.
pub fn map_validation_errors(errs: &ValidationErrors) -> Vec<String> {
    ValidationTranslator::default().translate(errs)
}

/// `FirstName`, `first_name` and `first-name` all become `firstName`;
/// runs of capitals fold to lowercase after the first (`UserID` → `userId`),
/// and a digit capitalises the next letter.
pub fn lower_camel(s: &str) -> String {
    let s = s.trim();
    let mut out = String::with_capacity(s.len());
    let mut cap_next = false;
    let mut prev_is_cap = false;
    for (i, c) in s.chars().enumerate() {
        let is_cap = c.is_ascii_uppercase();
        let is_low = c.is_ascii_lowercase();
        let ch = if cap_next {
            c.to_ascii_uppercase()
        } else if i == 0 || (prev_is_cap && is_cap) {
            c.to_ascii_lowercase()
        } else {
            c
        };
        prev_is_cap = is_cap;
        if is_cap || is_low {
            out.push(ch);
            cap_next = false;
        } else if c.is_ascii_digit() {
            out.push(c);
            cap_next = true;
        } else {
            cap_next = matches!(c, '_' | ' ' | '-' | '.');
        }
    }
    out
}
