use std::borrow::Cow;

use anyhow::Result;
use database::{
    conference_speaker::ConferenceSpeakerValues,
    participatory_space_link::{LinkRelation, ParticipatorySpaceLink},
};
use serde::{Deserialize, Serialize};

use crate::{
    context::FormContext,
    errors::{Attribute, ErrorKind, ValidationErrors},
    localized::LocalizedText,
    repository::Directory,
    speaker::{
        ConferenceSpeaker,
        SpeakerLookups,
        avatar::{AvatarChange, AvatarUpload},
        personal_url,
    },
};


/// Speaker attributes as submitted by an admin.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SpeakerParams {
    pub existing_user: bool,
    pub full_name: Option<String>,
    pub user_id: Option<i64>,
    pub twitter_handle: Option<String>,
    pub personal_url: Option<String>,
    pub position: LocalizedText,
    pub affiliation: LocalizedText,
    pub short_bio: LocalizedText,
    pub avatar: Option<AvatarUpload>,
    pub remove_avatar: bool,
    pub meeting_ids: Vec<i64>,
}

/// Who the speaker is: someone typed by name, or a user of the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SpeakerIdentity {
    Named { full_name: String },
    ExistingUser { user_id: Option<i64> },
}

impl Default for SpeakerIdentity {
    fn default() -> Self {
        SpeakerIdentity::Named { full_name: String::new() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpeakerForm {
    id: Option<i64>,
    pub identity: SpeakerIdentity,
    pub twitter_handle: Option<String>,
    personal_url: Option<String>,
    pub position: LocalizedText,
    pub affiliation: LocalizedText,
    pub short_bio: LocalizedText,
    pub avatar: Option<AvatarUpload>,
    pub remove_avatar: bool,
    pub meeting_ids: Vec<i64>,
}

/// Normalized attributes of a form that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakerAttributes {
    pub user_id: Option<i64>,
    pub full_name: String,
    pub twitter_handle: Option<String>,
    pub personal_url: Option<String>,
    pub position: LocalizedText,
    pub affiliation: LocalizedText,
    pub short_bio: LocalizedText,
    pub avatar: AvatarChange,
    pub meeting_ids: Vec<i64>,
}

impl SpeakerAttributes {
    pub fn to_values(&self, conference_id: i64, current_avatar: Option<String>) -> ConferenceSpeakerValues {
        ConferenceSpeakerValues {
            conference_id,
            user_id: self.user_id,
            full_name: self.full_name.clone(),
            twitter_handle: self.twitter_handle.clone(),
            personal_url: self.personal_url.clone(),
            position: self.position.clone().into(),
            affiliation: self.affiliation.clone().into(),
            short_bio: self.short_bio.clone().into(),
            avatar: self.avatar.apply(current_avatar),
        }
    }
}

impl From<SpeakerParams> for SpeakerForm {
    fn from(params: SpeakerParams) -> Self {
        let identity = match params.existing_user {
            true => SpeakerIdentity::ExistingUser { user_id: params.user_id },
            false => SpeakerIdentity::Named {
                full_name: params.full_name.unwrap_or_default(),
            },
        };

        Self {
            id: None,
            identity,
            twitter_handle: params.twitter_handle,
            personal_url: params.personal_url,
            position: params.position,
            affiliation: params.affiliation,
            short_bio: params.short_bio,
            avatar: params.avatar,
            remove_avatar: params.remove_avatar,
            meeting_ids: params.meeting_ids,
        }
    }
}

impl SpeakerForm {
    /// Prefills an edit form from a persisted speaker, including the meetings it is linked to.
    pub async fn map_from_record(record: &ConferenceSpeaker, directory: &impl Directory) -> Result<Self> {
        let identity = match record.user_id {
            Some(user_id) => SpeakerIdentity::ExistingUser { user_id: Some(user_id) },
            None => SpeakerIdentity::Named {
                full_name: record.full_name.clone(),
            },
        };

        let meeting_ids = record
            .speaker_meetings(directory)
            .await?
            .into_iter()
            .map(|link| link.to_id)
            .collect();

        Ok(Self {
            id: Some(record.id),
            identity,
            twitter_handle: record.twitter_handle.clone(),
            personal_url: record.personal_url.clone(),
            position: record.position.clone(),
            affiliation: record.affiliation.clone(),
            short_bio: record.short_bio.clone(),
            avatar: None,
            remove_avatar: false,
            meeting_ids,
        })
    }

    /// Id of the wrapped speaker; `None` while the form is not bound to one.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn is_bound(&self) -> bool {
        self.id.is_some()
    }

    pub fn existing_user(&self) -> bool {
        matches!(self.identity, SpeakerIdentity::ExistingUser { .. })
    }

    pub fn user_id(&self) -> Option<i64> {
        match self.identity {
            SpeakerIdentity::ExistingUser { user_id } => user_id,
            SpeakerIdentity::Named { .. } => None,
        }
    }

    pub fn personal_url(&self) -> Option<Cow<'_, str>> {
        self.personal_url.as_deref().and_then(personal_url::normalize)
    }

    pub fn set_personal_url(&mut self, value: Option<String>) {
        self.personal_url = value;
    }

    /// Links of the wrapped speaker to the meetings it speaks at.
    pub async fn selected_meeting_links(&self, directory: &impl Directory) -> Result<Vec<ParticipatorySpaceLink>> {
        match self.id {
            Some(id) => directory.links_from(LinkRelation::SpeakingMeetings, id).await,
            None => Ok(Vec::new()),
        }
    }

    /// Runs every rule and reports all failures at once.
    pub fn validate(&self, lookups: &SpeakerLookups, context: &FormContext) -> Result<SpeakerAttributes, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let (user_id, full_name) = match &self.identity {
            SpeakerIdentity::Named { full_name } => {
                if full_name.trim().is_empty() {
                    errors.add(Attribute::FullName, ErrorKind::Required);
                }
                (None, full_name.trim().to_string())
            },
            SpeakerIdentity::ExistingUser { user_id } => {
                match lookups.user().filter(|user| Some(user.id) == *user_id) {
                    Some(user) => (Some(user.id), user.name.clone()),
                    None => {
                        errors.add(Attribute::User, ErrorKind::Required);
                        (None, String::new())
                    },
                }
            },
        };

        let default_locale = context.default_locale();
        if !self.position.is_present_in(default_locale) {
            errors.add(Attribute::Position, ErrorKind::Required);
        }
        if !self.affiliation.is_present_in(default_locale) {
            errors.add(Attribute::Affiliation, ErrorKind::Required);
        }

        if let Some(avatar) = &self.avatar {
            if let Err(kind) = context.avatar_policy.check(avatar) {
                errors.add(Attribute::Avatar, kind);
            }
        }

        let personal_url = self.personal_url();
        if let Some(url) = &personal_url {
            if !personal_url::is_valid(url) {
                errors.add(Attribute::PersonalUrl, ErrorKind::Invalid);
            }
        }

        if self.meeting_ids.iter().any(|id| !lookups.is_available_meeting(*id)) {
            errors.add(Attribute::MeetingIds, ErrorKind::Invalid);
        }

        let avatar = match (&self.avatar, self.remove_avatar) {
            (Some(upload), _) => AvatarChange::Replace(upload.clone()),
            (None, true) => AvatarChange::Remove,
            (None, false) => AvatarChange::Keep,
        };

        let mut meeting_ids = self.meeting_ids.clone();
        meeting_ids.sort_unstable();
        meeting_ids.dedup();

        errors.into_result(SpeakerAttributes {
            user_id,
            full_name,
            twitter_handle: self
                .twitter_handle
                .as_deref()
                .map(str::trim)
                .filter(|handle| !handle.is_empty())
                .map(str::to_string),
            personal_url: personal_url.map(Cow::into_owned),
            position: self.position.clone(),
            affiliation: self.affiliation.clone(),
            short_bio: self.short_bio.clone(),
            avatar,
            meeting_ids,
        })
    }
}
