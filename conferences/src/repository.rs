use anyhow::Result;
use database::{
    PgPool,
    action_log::{self, ActionLog},
    conference::{self, Conference},
    conference_speaker::{self, ConferenceSpeakerValues},
    meeting::{self, Meeting},
    organization::{self, Organization},
    participatory_space_link::{self, LinkRelation, ParticipatorySpaceLink},
    user::{self, User},
};

use crate::{audit::AuditEntry, speaker::ConferenceSpeaker};

#[cfg(test)]
pub(crate) mod mock;

/// Read access to everything a speaker form consults.
pub trait Directory: Send + Sync {
    fn find_user(&self, organization_id: i64, user_id: i64) -> impl Future<Output = Result<Option<User>>> + Send;

    fn meetings_in_space(&self, participatory_space_id: i64) -> impl Future<Output = Result<Vec<Meeting>>> + Send;

    fn links_from(&self, relation: LinkRelation, from_id: i64) -> impl Future<Output = Result<Vec<ParticipatorySpaceLink>>> + Send;

    fn find_speaker(&self, id: i64) -> impl Future<Output = Result<Option<ConferenceSpeaker>>> + Send;
}

/// Writes a speaker, its meeting links and its audit entry as one unit.
pub trait SpeakerStore: Send + Sync {
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

#[derive(Debug, Clone)]
pub struct PgRepository {
    database: PgPool,
}

impl PgRepository {
    pub fn new(database: PgPool) -> Self {
        Self { database }
    }

    pub async fn conference(&self, id: i64) -> Result<Option<Conference>> {
        conference::fetch(&self.database, id).await
    }

    pub async fn organization(&self, id: i64) -> Result<Option<Organization>> {
        organization::fetch(&self.database, id).await
    }

    pub async fn speakers_of(&self, conference_id: i64) -> Result<Vec<ConferenceSpeaker>> {
        let rows = conference_speaker::fetch_by_conference(&self.database, conference_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn history_of(&self, speaker_id: i64) -> Result<Vec<ActionLog>> {
        action_log::fetch_for_resource(&self.database, ConferenceSpeaker::RESOURCE_TYPE, speaker_id).await
    }
}

impl Directory for PgRepository {
    async fn find_user(&self, organization_id: i64, user_id: i64) -> Result<Option<User>> {
        user::fetch_in_organization(&self.database, organization_id, user_id).await
    }

    async fn meetings_in_space(&self, participatory_space_id: i64) -> Result<Vec<Meeting>> {
        meeting::fetch_in_space(&self.database, participatory_space_id).await
    }

    async fn links_from(&self, relation: LinkRelation, from_id: i64) -> Result<Vec<ParticipatorySpaceLink>> {
        participatory_space_link::fetch_from(&self.database, relation, from_id).await
    }

    async fn find_speaker(&self, id: i64) -> Result<Option<ConferenceSpeaker>> {
        let row = conference_speaker::fetch(&self.database, id).await?;
        Ok(row.map(Into::into))
    }
}

impl SpeakerStore for PgRepository {
    #[tracing::instrument(skip_all)]
    async fn create(&self, speaker: ConferenceSpeakerValues, meeting_ids: Vec<i64>, audit: AuditEntry) -> Result<ConferenceSpeaker> {
        let mut transaction = self.database.begin().await?;

        let row = conference_speaker::insert(&mut transaction, &speaker).await?;
        participatory_space_link::replace(&mut transaction, LinkRelation::SpeakingMeetings, row.id, &meeting_ids).await?;
        action_log::insert(&mut transaction, &audit.into_action_log(row.id)).await?;

        transaction.commit().await?;

        Ok(row.into())
    }

    #[tracing::instrument(skip(self, speaker, meeting_ids, audit))]
    async fn update(&self, id: i64, speaker: ConferenceSpeakerValues, meeting_ids: Vec<i64>, audit: AuditEntry) -> Result<ConferenceSpeaker> {
        let mut transaction = self.database.begin().await?;

        let row = conference_speaker::update(&mut transaction, id, &speaker).await?;
        participatory_space_link::replace(&mut transaction, LinkRelation::SpeakingMeetings, id, &meeting_ids).await?;
        action_log::insert(&mut transaction, &audit.into_action_log(id)).await?;

        transaction.commit().await?;

        Ok(row.into())
    }

    #[tracing::instrument(skip(self, audit))]
    async fn destroy(&self, id: i64, audit: AuditEntry) -> Result<()> {
        let mut transaction = self.database.begin().await?;

        participatory_space_link::delete_from(&mut transaction, LinkRelation::SpeakingMeetings, id).await?;
        conference_speaker::delete(&mut transaction, id).await?;
        action_log::insert(&mut transaction, &audit.into_action_log(id)).await?;

        transaction.commit().await?;

        Ok(())
    }
}
