use anyhow::Result;
use database::{
    conference_speaker::ConferenceSpeakerValues,
    meeting::Meeting,
    organization::Organization,
    participatory_space_link::{LinkRelation, ParticipatorySpaceLink},
    user::User,
};
use time::macros::datetime;

use crate::{
    audit::AuditEntry,
    context::FormContext,
    localized::LocalizedText,
    repository::{Directory, SpeakerStore},
    speaker::{ConferenceSpeaker, avatar::AvatarPolicy},
};

mockall::mock! {
    pub Repository {}
    impl Directory for Repository {
        fn find_user(&self, organization_id: i64, user_id: i64) -> impl Future<Output = Result<Option<User>>> + Send;
        fn meetings_in_space(&self, participatory_space_id: i64) -> impl Future<Output = Result<Vec<Meeting>>> + Send;
        fn links_from(&self, relation: LinkRelation, from_id: i64) -> impl Future<Output = Result<Vec<ParticipatorySpaceLink>>> + Send;
        fn find_speaker(&self, id: i64) -> impl Future<Output = Result<Option<ConferenceSpeaker>>> + Send;
    }
    impl SpeakerStore for Repository {
        fn create(
            &self,
            speaker: ConferenceSpeakerValues,
            meeting_ids: Vec<i64>,
            audit: AuditEntry,
        ) -> impl Future<Output = Result<ConferenceSpeaker>> + Send;
        fn update(
            &self,
            id: i64,
            speaker: ConferenceSpeakerValues,
            meeting_ids: Vec<i64>,
            audit: AuditEntry,
        ) -> impl Future<Output = Result<ConferenceSpeaker>> + Send;
        fn destroy(&self, id: i64, audit: AuditEntry) -> impl Future<Output = Result<()>> + Send;
    }
}

pub(crate) fn context() -> FormContext {
    FormContext {
        organization: Organization {
            id: 1,
            name: "Barcelona".to_string(),
            default_locale: "en".to_string(),
        },
        conference_id: 2,
        avatar_policy: AvatarPolicy { maximum_size: 1024 },
        locale: None,
    }
}

pub(crate) fn user() -> User {
    User {
        id: 3,
        organization_id: 1,
        name: "Grace Hopper".to_string(),
        nickname: "grace".to_string(),
    }
}

pub(crate) fn speaker() -> ConferenceSpeaker {
    ConferenceSpeaker {
        id: 5,
        conference_id: 2,
        user_id: None,
        full_name: "Ada Lovelace".to_string(),
        twitter_handle: None,
        personal_url: None,
        position: LocalizedText::new().with("en", "Engineer"),
        affiliation: LocalizedText::new().with("en", "Analytical Society"),
        short_bio: LocalizedText::new(),
        avatar: None,
        created_at: datetime!(2024-01-01 0:00 UTC),
    }
}
