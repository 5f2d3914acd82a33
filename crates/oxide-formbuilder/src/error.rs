//! Error types for forms.

use thiserror::Error;

/// Form-specific errors.
///
/// Only integration mistakes and lookups surface here. A field that fails
/// validation is not an error: its outcome is stored on the field itself.
#[derive(Debug, Error)]
pub enum FormError {
    /// A validator chain references a name that has no registered predicate.
    #[error("no validator with key {0} set")]
    UnknownValidator(String),

    /// The anti-forgery capability was needed but none was injected.
    #[error("anti-forgery capability is not available")]
    AntiForgeryUnavailable,

    /// Attempted to append to a setting that is not a list.
    #[error("attempting to add value to non-list setting: {0}")]
    NotAList(String),

    /// A dynamically set value does not fit the setting's type.
    #[error("invalid value for setting {key}: {message}")]
    InvalidSetting { key: String, message: String },

    /// A file field was validated without an upload record.
    #[error("no file found for field with slug {0}")]
    MissingUpload(String),

    /// No field is stored under the requested slug.
    #[error("field with key {0} does not exist")]
    FieldNotFound(String),

    /// Writing rendered markup to the output sink failed.
    #[error("failed to write form output: {0}")]
    Io(#[from] std::io::Error),

    /// A form definition could not be parsed.
    #[error("failed to parse form definition: {0}")]
    Json(#[from] serde_json::Error),
}

impl FormError {
    /// Returns whether this error signals a misconfigured form or registry.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownValidator(_)
                | Self::AntiForgeryUnavailable
                | Self::NotAList(_)
                | Self::InvalidSetting { .. }
                | Self::MissingUpload(_)
        )
    }
}

/// Validation messages of the fields that failed, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<(String, String)>,
}

impl ValidationErrors {
    /// Creates a new empty ValidationErrors.
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Records the message for a field, replacing an earlier one.
    pub fn add(&mut self, slug: &str, message: impl Into<String>) {
        let message = message.into();
        match self.errors.iter_mut().find(|(s, _)| s == slug) {
            Some(entry) => entry.1 = message,
            None => self.errors.push((slug.to_string(), message)),
        }
    }

    /// Returns whether there are any errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of fields with errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns the message for a specific field.
    pub fn get(&self, slug: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(s, _)| s == slug)
            .map(|(_, m)| m.as_str())
    }

    /// Iterates over `(slug, message)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(s, m)| (s.as_str(), m.as_str()))
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (slug, message) in &self.errors {
            writeln!(f, "{slug}: {message}")?;
        }
        Ok(())
    }
}

/// Result type alias for form operations.
pub type Result<T> = std::result::Result<T, FormError>;
