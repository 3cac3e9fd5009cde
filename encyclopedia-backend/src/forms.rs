//! Entry submission form and its validation.

use serde::{Deserialize, Serialize};

use crate::entries::file_ops;
use crate::entries::store::{EntryResult, EntryStore};

/// Warning shown when a submission fails field validation
pub const INVALID_FORM_WARNING: &str = "Invalid request form";

/// Warning shown when a new entry's title is already taken
pub fn duplicate_warning(title: &str) -> String {
    format!("Entry \"{}\" already exists", title)
}

/// Title/content pair as posted by the new and edit pages.
/// Missing fields deserialize as empty and fail validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormError {
    pub field: &'static str,
    pub message: String,
}

impl FormError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Trimmed, validated submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanEntry {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid(CleanEntry),
    Invalid(Vec<FormError>),
    /// Well-formed, but the title collides with this stored entry
    Duplicate(String),
}

impl Validation {
    /// Field errors to show next to the form; empty unless `Invalid`
    pub fn errors(&self) -> &[FormError] {
        match self {
            Validation::Invalid(errors) => errors,
            _ => &[],
        }
    }
}

impl EntryForm {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn clean(&self) -> Result<CleanEntry, Vec<FormError>> {
        let title = self.title.trim();
        let content = self.content.trim();
        let mut errors = Vec::new();

        if title.is_empty() {
            errors.push(FormError::new("title", "This field is required."));
        } else if !file_ops::is_valid_title(title) {
            errors.push(FormError::new(
                "title",
                "Titles must be at most 252 bytes, cannot contain slashes or control characters, and cannot start with a dot.",
            ));
        }

        if content.is_empty() {
            errors.push(FormError::new("content", "This field is required."));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(CleanEntry {
            title: title.to_string(),
            content: content.to_string(),
        })
    }

    /// Validate a submission for a new entry, checking the title against the store
    pub fn validate_new(&self, store: &EntryStore) -> EntryResult<Validation> {
        let clean = match self.clean() {
            Ok(clean) => clean,
            Err(errors) => return Ok(Validation::Invalid(errors)),
        };

        match store.canonical_title(&clean.title)? {
            Some(existing) => Ok(Validation::Duplicate(existing)),
            None => Ok(Validation::Valid(clean)),
        }
    }

    /// Validate a submission for an edit; edits overwrite, so there is no duplicate check
    pub fn validate_edit(&self) -> Validation {
        match self.clean() {
            Ok(clean) => Validation::Valid(clean),
            Err(errors) => Validation::Invalid(errors),
        }
    }
}
