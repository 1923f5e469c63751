use crate::{
    audit::{AuditEntry, SpeakerAction, changeset},
    context::FormContext,
    errors::SpeakerError,
    repository::{Directory, SpeakerStore},
    speaker::{ConferenceSpeaker, SpeakerForm, SpeakerLookups},
};

#[cfg(test)]
mod tests;

#[tracing::instrument(skip(form, context, repository), fields(conference_id = context.conference_id))]
pub async fn create_speaker<R>(form: &SpeakerForm, context: &FormContext, admin_id: i64, repository: &R) -> Result<ConferenceSpeaker, SpeakerError>
where
    R: Directory + SpeakerStore,
{
    let lookups = SpeakerLookups::resolve(form, context, repository).await?;
    let attributes = form.validate(&lookups, context)?;
    ConferenceSpeaker::validate_avatar(&attributes.avatar, &context.avatar_policy)?;

    let values = attributes.to_values(context.conference_id, None);
    let audit = AuditEntry::new(context, admin_id, SpeakerAction::Create, changeset(None, Some(&values))?);

    let speaker = repository.create(values, attributes.meeting_ids, audit).await?;

    tracing::info!(speaker_id = speaker.id, "created conference speaker");

    Ok(speaker)
}

#[tracing::instrument(skip(form, context, repository), fields(conference_id = context.conference_id))]
pub async fn update_speaker<R>(
    id: i64,
    form: &SpeakerForm,
    context: &FormContext,
    admin_id: i64,
    repository: &R,
) -> Result<ConferenceSpeaker, SpeakerError>
where
    R: Directory + SpeakerStore,
{
    let current = find_in_conference(id, context, repository).await?;

    let lookups = SpeakerLookups::resolve(form, context, repository).await?;
    let attributes = form.validate(&lookups, context)?;
    ConferenceSpeaker::validate_avatar(&attributes.avatar, &context.avatar_policy)?;

    let values = attributes.to_values(context.conference_id, current.avatar.clone());
    let audit = AuditEntry::new(
        context,
        admin_id,
        SpeakerAction::Update,
        changeset(Some(&current.values()), Some(&values))?,
    );

    let speaker = repository.update(id, values, attributes.meeting_ids, audit).await?;

    tracing::info!("updated conference speaker");

    Ok(speaker)
}

#[tracing::instrument(skip(context, repository), fields(conference_id = context.conference_id))]
pub async fn destroy_speaker<R>(id: i64, context: &FormContext, admin_id: i64, repository: &R) -> Result<(), SpeakerError>
where
    R: Directory + SpeakerStore,
{
    let current = find_in_conference(id, context, repository).await?;

    let audit = AuditEntry::new(context, admin_id, SpeakerAction::Delete, changeset(Some(&current.values()), None)?);
    repository.destroy(id, audit).await?;

    tracing::info!("destroyed conference speaker");

    Ok(())
}

/// Speakers of other conferences are reported as missing.
async fn find_in_conference(id: i64, context: &FormContext, directory: &impl Directory) -> Result<ConferenceSpeaker, SpeakerError> {
    match directory.find_speaker(id).await? {
        Some(speaker) if speaker.conference_id == context.conference_id => Ok(speaker),
        _ => Err(SpeakerError::NotFound(id)),
    }
}
