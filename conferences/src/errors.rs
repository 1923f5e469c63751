use std::fmt;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// Form attributes that can carry validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::AsRefStr, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Attribute {
    FullName,
    User,
    Position,
    Affiliation,
    Avatar,
    PersonalUrl,
    MeetingIds,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    #[error("can't be blank")]
    Required,

    #[error("is invalid")]
    Invalid,

    #[error("is too large (maximum is {maximum} bytes)")]
    TooLarge { maximum: u64 },
}

impl ErrorKind {
    /// Stable identifier handed to the presentation layer.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Required => "required",
            ErrorKind::Invalid => "invalid",
            ErrorKind::TooLarge { .. } => "too_large",
        }
    }
}

/// Validation errors keyed by attribute, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: IndexMap<Attribute, Vec<ErrorKind>>,
}

impl ValidationErrors {
    pub fn add(&mut self, attribute: Attribute, kind: ErrorKind) {
        self.errors.entry(attribute).or_default().push(kind);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, attribute: Attribute) -> &[ErrorKind] {
        self.errors.get(&attribute).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, attribute: Attribute, kind: &ErrorKind) -> bool {
        self.get(attribute).contains(kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &ErrorKind)> {
        self.errors
            .iter()
            .flat_map(|(attribute, kinds)| kinds.iter().map(move |kind| (*attribute, kind)))
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        match self.is_empty() {
            true => Ok(value),
            false => Err(self),
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages = self
            .iter()
            .map(|(attribute, kind)| format!("{attribute} {kind}"))
            .collect::<Vec<_>>();
        f.write_str(&messages.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Serialize)]
struct ErrorEntry {
    error: &'static str,
    message: String,
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.errors.iter().map(|(attribute, kinds)| {
            let entries = kinds
                .iter()
                .map(|kind| ErrorEntry {
                    error: kind.code(),
                    message: kind.to_string(),
                })
                .collect::<Vec<_>>();
            (attribute, entries)
        }))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SpeakerError {
    #[error("invalid conference speaker: {0}")]
    Invalid(ValidationErrors),

    #[error("conference speaker {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl From<ValidationErrors> for SpeakerError {
    fn from(errors: ValidationErrors) -> Self {
        SpeakerError::Invalid(errors)
    }
}
