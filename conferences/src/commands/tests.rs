use anyhow::anyhow;
use database::participatory_space_link::ParticipatorySpaceLink;
use futures::FutureExt;
use serde_json::json;
use uuid::Uuid;

use super::*;
use crate::{
    errors::{Attribute, ErrorKind},
    localized::LocalizedText,
    repository::mock::{MockRepository, context, speaker, user},
    speaker::{SpeakerParams, avatar::AvatarUpload},
};

fn params() -> SpeakerParams {
    SpeakerParams {
        full_name: Some("Ada Lovelace".to_string()),
        position: LocalizedText::new().with("en", "Engineer"),
        affiliation: LocalizedText::new().with("en", "Analytical Society"),
        ..Default::default()
    }
}

fn expect_lookups(repository: &mut MockRepository) {
    repository
        .expect_find_user()
        .returning(|_, _| async { Ok(Some(user())) }.boxed());
    repository
        .expect_meetings_in_space()
        .returning(|_| async { Ok(Vec::new()) }.boxed());
}

#[tokio::test]
async fn creates_speaker_with_audit_entry() {
    let mut repository = MockRepository::new();
    expect_lookups(&mut repository);
    repository
        .expect_create()
        .withf(|values, meeting_ids, audit| {
            values.conference_id == 2
                && values.full_name == "Ada Lovelace"
                && meeting_ids.is_empty()
                && audit.action == SpeakerAction::Create
                && audit.admin_id == 7
                && audit.changeset["full_name"] == json!([null, "Ada Lovelace"])
        })
        .once()
        .returning(|_, _, _| async { Ok(speaker()) }.boxed());

    let form = SpeakerForm::from(params());

    let created = create_speaker(&form, &context(), 7, &repository).await.unwrap();

    assert_eq!(created.id, 5);
}

#[tokio::test]
async fn creates_speaker_linked_to_user() {
    let mut repository = MockRepository::new();
    expect_lookups(&mut repository);
    repository
        .expect_create()
        .withf(|values, _, _| values.user_id == Some(3) && values.full_name == "Grace Hopper")
        .once()
        .returning(|_, _, _| async { Ok(speaker()) }.boxed());

    let form = SpeakerForm::from(SpeakerParams {
        existing_user: true,
        full_name: None,
        user_id: Some(3),
        ..params()
    });

    assert!(create_speaker(&form, &context(), 7, &repository).await.is_ok());
}

#[tokio::test]
async fn invalid_form_writes_nothing() {
    let mut repository = MockRepository::new();
    expect_lookups(&mut repository);
    repository.expect_create().never();

    let form = SpeakerForm::from(SpeakerParams {
        full_name: None,
        avatar: Some(AvatarUpload { key: "big.png".to_string(), size: 4096 }),
        ..params()
    });

    let error = create_speaker(&form, &context(), 7, &repository).await.unwrap_err();

    let SpeakerError::Invalid(errors) = error else {
        panic!("expected validation errors, got {error:?}");
    };
    assert!(errors.contains(Attribute::FullName, &ErrorKind::Required));
    assert!(errors.contains(Attribute::Avatar, &ErrorKind::TooLarge { maximum: 1024 }));
}

#[tokio::test]
async fn storage_failure_is_reported() {
    let mut repository = MockRepository::new();
    expect_lookups(&mut repository);
    repository
        .expect_create()
        .returning(|_, _, _| async { Err(anyhow!("connection reset")) }.boxed());

    let error = create_speaker(&SpeakerForm::from(params()), &context(), 7, &repository)
        .await
        .unwrap_err();

    assert!(matches!(error, SpeakerError::Storage(_)));
}

#[tokio::test]
async fn unchanged_update_keeps_user_and_meetings() {
    let mut record = speaker();
    record.user_id = Some(3);
    record.full_name = user().name;
    record.twitter_handle = Some("grace".to_string());
    record.avatar = Some("avatar.png".to_string());
    let stored = record.clone();

    let mut repository = MockRepository::new();
    repository
        .expect_find_speaker()
        .returning(move |_| {
            let stored = stored.clone();
            async move { Ok(Some(stored)) }.boxed()
        });
    repository
        .expect_find_user()
        .returning(|_, _| async { Ok(Some(user())) }.boxed());
    repository
        .expect_meetings_in_space()
        .returning(|_| {
            async {
                Ok(vec![database::meeting::Meeting {
                    id: 10,
                    component_id: 9,
                    title: database::Json(database::Translations::from([("en".to_string(), "Keynote".to_string())])),
                }])
            }
            .boxed()
        });
    repository
        .expect_links_from()
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
    repository
        .expect_update()
        .withf(|id, values, meeting_ids, audit| {
            *id == 5
                && values.user_id == Some(3)
                && values.avatar.as_deref() == Some("avatar.png")
                && meeting_ids == &[10]
                && audit.action == SpeakerAction::Update
                && audit.changeset == json!({})
        })
        .once()
        .returning(|_, _, _, _| async { Ok(speaker()) }.boxed());

    let form = SpeakerForm::map_from_record(&record, &repository).await.unwrap();

    assert!(update_speaker(5, &form, &context(), 7, &repository).await.is_ok());
}

#[tokio::test]
async fn unchanged_update_keeps_twitter_handle_as_stored() {
    let mut record = speaker();
    record.twitter_handle = Some("@ada".to_string());
    let stored = record.clone();

    let mut repository = MockRepository::new();
    expect_lookups(&mut repository);
    repository
        .expect_find_speaker()
        .returning(move |_| {
            let stored = stored.clone();
            async move { Ok(Some(stored)) }.boxed()
        });
    repository
        .expect_links_from()
        .returning(|_, _| async { Ok(Vec::new()) }.boxed());
    repository
        .expect_update()
        .withf(|_, values, _, audit| {
            values.twitter_handle.as_deref() == Some("@ada")
                && audit.action == SpeakerAction::Update
                && audit.changeset == json!({})
        })
        .once()
        .returning(|_, _, _, _| async { Ok(speaker()) }.boxed());

    let form = SpeakerForm::map_from_record(&record, &repository).await.unwrap();

    assert!(update_speaker(5, &form, &context(), 7, &repository).await.is_ok());
}

#[tokio::test]
async fn update_removes_avatar_on_request() {
    let mut record = speaker();
    record.avatar = Some("avatar.png".to_string());

    let mut repository = MockRepository::new();
    expect_lookups(&mut repository);
    repository
        .expect_find_speaker()
        .returning(move |_| {
            let record = record.clone();
            async move { Ok(Some(record)) }.boxed()
        });
    repository
        .expect_update()
        .withf(|_, values, _, audit| values.avatar.is_none() && audit.changeset["avatar"] == json!(["avatar.png", null]))
        .once()
        .returning(|_, _, _, _| async { Ok(speaker()) }.boxed());

    let form = SpeakerForm::from(SpeakerParams {
        remove_avatar: true,
        ..params()
    });

    assert!(update_speaker(5, &form, &context(), 7, &repository).await.is_ok());
}

#[tokio::test]
async fn update_of_speaker_in_another_conference_is_not_found() {
    let mut repository = MockRepository::new();
    repository.expect_find_speaker().returning(|_| {
        let mut other = speaker();
        other.conference_id = 42;
        async move { Ok(Some(other)) }.boxed()
    });
    repository.expect_update().never();

    let error = update_speaker(5, &SpeakerForm::from(params()), &context(), 7, &repository)
        .await
        .unwrap_err();

    assert!(matches!(error, SpeakerError::NotFound(5)));
}

#[tokio::test]
async fn destroys_speaker_with_audit_entry() {
    let mut repository = MockRepository::new();
    repository
        .expect_find_speaker()
        .returning(|_| async { Ok(Some(speaker())) }.boxed());
    repository
        .expect_destroy()
        .withf(|id, audit| *id == 5 && audit.action == SpeakerAction::Delete && audit.changeset["full_name"] == json!(["Ada Lovelace", null]))
        .once()
        .returning(|_, _| async { Ok(()) }.boxed());

    assert!(destroy_speaker(5, &context(), 7, &repository).await.is_ok());
}

#[tokio::test]
async fn destroying_missing_speaker_is_not_found() {
    let mut repository = MockRepository::new();
    repository
        .expect_find_speaker()
        .returning(|_| async { Ok(None) }.boxed());
    repository.expect_destroy().never();

    let error = destroy_speaker(5, &context(), 7, &repository).await.unwrap_err();

    assert!(matches!(error, SpeakerError::NotFound(5)));
}

