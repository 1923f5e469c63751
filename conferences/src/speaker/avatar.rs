use serde::{Deserialize, Serialize};

use crate::errors::ErrorKind;

pub const DEFAULT_MAXIMUM_AVATAR_SIZE: u64 = 5 * 1024 * 1024;

/// An avatar already handed to the asset storage: its key there and its size in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarUpload {
    pub key: String,
    pub size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvatarPolicy {
    pub maximum_size: u64,
}

impl Default for AvatarPolicy {
    fn default() -> Self {
        Self {
            maximum_size: DEFAULT_MAXIMUM_AVATAR_SIZE,
        }
    }
}

impl AvatarPolicy {
    pub fn check(&self, upload: &AvatarUpload) -> Result<(), ErrorKind> {
        match upload.size <= self.maximum_size {
            true => Ok(()),
            false => Err(ErrorKind::TooLarge {
                maximum: self.maximum_size,
            }),
        }
    }
}

/// What a submitted form does to the avatar of the speaker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AvatarChange {
    #[default]
    Keep,
    Replace(AvatarUpload),
    Remove,
}

impl AvatarChange {
    /// The stored avatar key after applying this change to `current`.
    pub fn apply(&self, current: Option<String>) -> Option<String> {
        match self {
            AvatarChange::Keep => current,
            AvatarChange::Replace(upload) => Some(upload.key.clone()),
            AvatarChange::Remove => None,
        }
    }
}
