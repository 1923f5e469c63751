use anyhow::Result;
use database::user::User;
use serde::Serialize;

use crate::{context::FormContext, localized::LocalizedText, repository::Directory, speaker::SpeakerForm};

/// One entry of the meeting selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeetingOption {
    pub title: String,
    pub id: i64,
}

/// Lookups a speaker form needs, resolved once per request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeakerLookups {
    user: Option<User>,
    available_meetings: Vec<MeetingOption>,
}

impl SpeakerLookups {
    pub fn new(user: Option<User>, mut available_meetings: Vec<MeetingOption>) -> Self {
        available_meetings.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));

        Self { user, available_meetings }
    }

    #[tracing::instrument(skip_all, fields(conference_id = context.conference_id))]
    pub async fn resolve(form: &SpeakerForm, context: &FormContext, directory: &impl Directory) -> Result<Self> {
        let user = match form.user_id() {
            Some(user_id) => directory.find_user(context.organization.id, user_id).await?,
            None => None,
        };

        let locale = context.default_locale();
        let meetings = directory
            .meetings_in_space(context.conference_id)
            .await?
            .into_iter()
            .map(|meeting| MeetingOption {
                title: LocalizedText::from(meeting.title.0)
                    .translated(locale, &context.organization.default_locale)
                    .to_string(),
                id: meeting.id,
            })
            .collect();

        Ok(Self::new(user, meetings))
    }

    /// The user picked in the form, if it belongs to the current organization.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Meetings of the current space ordered by title.
    pub fn available_meetings(&self) -> &[MeetingOption] {
        &self.available_meetings
    }

    pub fn is_available_meeting(&self, id: i64) -> bool {
        self.available_meetings.iter().any(|meeting| meeting.id == id)
    }
}

#[cfg(test)]
mod tests {
    use database::{Json, Translations, meeting::Meeting};
    use futures::FutureExt;

    use super::*;
    use crate::{
        repository::mock::{MockRepository, context, user},
        speaker::{SpeakerIdentity, SpeakerParams},
    };

    fn meeting(id: i64, title: &str) -> Meeting {
        Meeting {
            id,
            component_id: 9,
            title: Json(Translations::from([("en".to_string(), title.to_string())])),
        }
    }

    #[tokio::test]
    async fn resolves_user_within_organization_and_sorted_meetings() {
        let mut directory = MockRepository::new();
        directory
            .expect_find_user()
            .withf(|organization_id, user_id| *organization_id == 1 && *user_id == 3)
            .once()
            .returning(|_, _| async { Ok(Some(user())) }.boxed());
        directory
            .expect_meetings_in_space()
            .withf(|participatory_space_id| *participatory_space_id == 2)
            .once()
            .returning(|_| async { Ok(vec![meeting(1, "Opening"), meeting(2, "Keynote"), meeting(3, "Closing")]) }.boxed());

        let form = SpeakerForm::from(SpeakerParams {
            existing_user: true,
            user_id: Some(3),
            ..Default::default()
        });

        let lookups = SpeakerLookups::resolve(&form, &context(), &directory).await.unwrap();

        assert_eq!(lookups.user(), Some(&user()));
        assert_eq!(
            lookups.available_meetings(),
            [
                MeetingOption { title: "Closing".to_string(), id: 3 },
                MeetingOption { title: "Keynote".to_string(), id: 2 },
                MeetingOption { title: "Opening".to_string(), id: 1 },
            ],
        );
    }

    #[tokio::test]
    async fn user_from_another_organization_resolves_to_nothing() {
        let mut directory = MockRepository::new();
        directory
            .expect_find_user()
            .once()
            .returning(|_, _| async { Ok(None) }.boxed());
        directory
            .expect_meetings_in_space()
            .returning(|_| async { Ok(Vec::new()) }.boxed());

        let mut form = SpeakerForm::default();
        form.identity = SpeakerIdentity::ExistingUser { user_id: Some(99) };

        let lookups = SpeakerLookups::resolve(&form, &context(), &directory).await.unwrap();

        assert_eq!(lookups.user(), None);
    }

    #[tokio::test]
    async fn named_speaker_skips_user_lookup() {
        let mut directory = MockRepository::new();
        directory.expect_find_user().never();
        directory
            .expect_meetings_in_space()
            .returning(|_| async { Ok(Vec::new()) }.boxed());

        let lookups = SpeakerLookups::resolve(&SpeakerForm::default(), &context(), &directory).await.unwrap();

        assert_eq!(lookups, SpeakerLookups::default());
    }

    #[tokio::test]
    async fn meeting_titles_follow_locale_override() {
        let mut directory = MockRepository::new();
        directory
            .expect_meetings_in_space()
            .returning(|_| {
                async {
                    Ok(vec![
                        Meeting {
                            id: 1,
                            component_id: 9,
                            title: Json(Translations::from([
                                ("en".to_string(), "Opening".to_string()),
                                ("ca".to_string(), "Obertura".to_string()),
                            ])),
                        },
                        meeting(2, "Keynote"),
                    ])
                }
                .boxed()
            });

        let mut context = context();
        context.locale = Some("ca".to_string());

        let lookups = SpeakerLookups::resolve(&SpeakerForm::default(), &context, &directory).await.unwrap();

        assert_eq!(
            lookups.available_meetings(),
            [
                MeetingOption { title: "Keynote".to_string(), id: 2 },
                MeetingOption { title: "Obertura".to_string(), id: 1 },
            ],
        );
    }
}
