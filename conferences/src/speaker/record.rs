use anyhow::Result;
use database::{
    conference_speaker::{ConferenceSpeakerRow, ConferenceSpeakerValues},
    participatory_space_link::{LinkRelation, ParticipatorySpaceLink},
};
use time::OffsetDateTime;

use crate::{
    errors::{Attribute, ValidationErrors},
    localized::LocalizedText,
    repository::Directory,
    speaker::avatar::{AvatarChange, AvatarPolicy},
};

/// A speaker of a conference, optionally linked to a user of the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct ConferenceSpeaker {
    pub id: i64,
    pub conference_id: i64,
    pub user_id: Option<i64>,
    pub full_name: String,
    pub(crate) twitter_handle: Option<String>,
    pub personal_url: Option<String>,
    pub position: LocalizedText,
    pub affiliation: LocalizedText,
    pub short_bio: LocalizedText,
    pub avatar: Option<String>,
    pub created_at: OffsetDateTime,
}

impl ConferenceSpeaker {
    pub const RESOURCE_TYPE: &str = "conference_speaker";

    /// The handle without the leading `@`s it may have been typed with.
    pub fn twitter_handle(&self) -> &str {
        self.twitter_handle
            .as_deref()
            .unwrap_or_default()
            .trim_start_matches('@')
    }

    /// Links to the meetings this speaker speaks at.
    pub async fn speaker_meetings(&self, directory: &impl Directory) -> Result<Vec<ParticipatorySpaceLink>> {
        directory.links_from(LinkRelation::SpeakingMeetings, self.id).await
    }

    pub fn values(&self) -> ConferenceSpeakerValues {
        ConferenceSpeakerValues {
            conference_id: self.conference_id,
            user_id: self.user_id,
            full_name: self.full_name.clone(),
            twitter_handle: self.twitter_handle.clone(),
            personal_url: self.personal_url.clone(),
            position: self.position.clone().into(),
            affiliation: self.affiliation.clone().into(),
            short_bio: self.short_bio.clone().into(),
            avatar: self.avatar.clone(),
        }
    }

    /// Checked again right before anything is written.
    pub fn validate_avatar(avatar: &AvatarChange, policy: &AvatarPolicy) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if let AvatarChange::Replace(upload) = avatar {
            if let Err(kind) = policy.check(upload) {
                errors.add(Attribute::Avatar, kind);
            }
        }

        errors.into_result(())
    }
}

impl From<ConferenceSpeakerRow> for ConferenceSpeaker {
    fn from(value: ConferenceSpeakerRow) -> Self {
        Self {
            id: value.id,
            conference_id: value.conference_id,
            user_id: value.user_id,
            full_name: value.full_name,
            twitter_handle: value.twitter_handle,
            personal_url: value.personal_url,
            position: value.position.0.into(),
            affiliation: value.affiliation.0.into(),
            short_bio: value.short_bio.0.into(),
            avatar: value.avatar,
            created_at: value.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::FutureExt;
    use uuid::Uuid;

    use super::*;
    use crate::{errors::ErrorKind, repository::mock::{MockRepository, speaker}, speaker::avatar::AvatarUpload};

    #[test]
    fn strips_leading_at_from_twitter_handle() {
        let mut speaker = speaker();

        speaker.twitter_handle = Some("@alice".to_string());
        assert_eq!(speaker.twitter_handle(), "alice");

        speaker.twitter_handle = Some("alice".to_string());
        assert_eq!(speaker.twitter_handle(), "alice");

        speaker.twitter_handle = Some("@@alice".to_string());
        assert_eq!(speaker.twitter_handle(), "alice");
        assert_eq!(speaker.values().twitter_handle.as_deref(), Some("@@alice"));

        speaker.twitter_handle = None;
        assert_eq!(speaker.twitter_handle(), "");
    }

    #[tokio::test]
    async fn speaker_meetings_reads_speaking_meetings_links() {
        let mut directory = MockRepository::new();
        directory
            .expect_links_from()
            .withf(|relation, from_id| *relation == LinkRelation::SpeakingMeetings && *from_id == 5)
            .once()
            .returning(|relation, from_id| {
                async move {
                    Ok(vec![ParticipatorySpaceLink {
                        id: Uuid::nil(),
                        relation,
                        from_id,
                        to_id: 10,
                    }])
                }
                .boxed()
            });

        let links = speaker().speaker_meetings(&directory).await.unwrap();

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].to_id, 10);
    }

    #[test]
    fn rejects_oversized_avatar_before_writing() {
        let policy = AvatarPolicy { maximum_size: 10 };
        let avatar = AvatarChange::Replace(AvatarUpload { key: "a.png".into(), size: 11 });

        let errors = ConferenceSpeaker::validate_avatar(&avatar, &policy).unwrap_err();

        assert!(errors.contains(Attribute::Avatar, &ErrorKind::TooLarge { maximum: 10 }));
        assert!(ConferenceSpeaker::validate_avatar(&AvatarChange::Remove, &policy).is_ok());
    }
}
