use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Enumeration of reasons a job posting submission is rejected before reaching a store.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("source_link is required")]
    MissingSourceLink,
    #[error("description is required")]
    MissingDescription,
    #[error("description is empty after normalization")]
    EmptyNormalizedDescription,
}

impl ValidationError {
    /// Short label used when reporting rejections in metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::MissingSourceLink => "missing_source_link",
            ValidationError::MissingDescription => "missing_description",
            ValidationError::EmptyNormalizedDescription => "empty_normalized_description",
        }
    }
}

/// The body of a request made to submit a job posting.
///
/// Missing fields and explicit `null` values deserialize to empty strings, which
/// `validate` then rejects.
#[derive(Deserialize, Debug, Default, PartialEq, Eq, Clone)]
pub struct Submission {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub source_link: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Submission {
    #[cfg(test)]
    pub fn new(source_link: &str, description: &str) -> Self {
        Self {
            source_link: source_link.to_owned(),
            description: description.to_owned(),
        }
    }

    /// Check the raw submission before any normalization happens.
    /// The source link is checked first, so it is reported even when the description is also empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.source_link) {
            return Err(ValidationError::MissingSourceLink);
        }
        if is_blank(&self.description) {
            return Err(ValidationError::MissingDescription);
        }
        Ok(())
    }
}

/// A job posting ready to be inserted: a non-blank source link and a non-blank,
/// already normalized description. The only way to build one is `NewPosting::new`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPosting {
    source_link: String,
    description: String,
}

impl NewPosting {
    /// Build a posting from a source link and the normalizer's output for its description.
    pub fn new(source_link: String, description: String) -> Result<Self, ValidationError> {
        if is_blank(&source_link) {
            return Err(ValidationError::MissingSourceLink);
        }
        if is_blank(&description) {
            return Err(ValidationError::EmptyNormalizedDescription);
        }

        Ok(Self {
            source_link,
            description,
        })
    }

    pub fn source_link(&self) -> &str {
        &self.source_link
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn into_parts(self) -> (String, String) {
        (self.source_link, self.description)
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
