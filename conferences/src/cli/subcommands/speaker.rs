use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use clap::Parser;
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    audit,
    cli::args::{avatar::AvatarConfig, database::DatabaseConfig},
    commands,
    context::FormContext,
    errors::SpeakerError,
    localized::LocalizedText,
    repository::{Directory, PgRepository},
    speaker::{ConferenceSpeaker, SpeakerForm, SpeakerLookups, SpeakerParams},
};

#[derive(Debug, Parser)]
#[command(about = "Manages the speakers of a conference")]
pub struct Speaker {
    #[command(flatten)]
    pub database_args: DatabaseConfig,

    #[command(flatten)]
    pub avatar_args: AvatarConfig,

    #[arg(long, env, help = "locale whose translations are required; defaults to the organization's")]
    pub default_locale: Option<String>,

    #[command(subcommand)]
    pub action: Action,
}

#[derive(Debug, clap::Subcommand)]
pub enum Action {
    #[command(about = "Lists the speakers of a conference")]
    List {
        #[arg(long)]
        conference_id: i64,
    },
    #[command(about = "Prints the edit form of a speaker with the meetings it can be linked to")]
    Show {
        #[arg(long)]
        id: i64,
    },
    #[command(about = "Prints the admin log of a speaker")]
    History {
        #[arg(long)]
        id: i64,
    },
    #[command(about = "Creates a speaker from a JSON file of attributes")]
    Create {
        #[arg(long)]
        conference_id: i64,
        #[arg(long)]
        admin_id: i64,
        #[arg(long)]
        input: PathBuf,
    },
    #[command(about = "Updates a speaker from a JSON file of attributes")]
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        admin_id: i64,
        #[arg(long)]
        input: PathBuf,
    },
    #[command(about = "Destroys a speaker and its meeting links")]
    Destroy {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        admin_id: i64,
    },
}

#[derive(Serialize)]
struct SpeakerOutput<'a> {
    id: i64,
    conference_id: i64,
    user_id: Option<i64>,
    full_name: &'a str,
    twitter_handle: &'a str,
    personal_url: Option<&'a str>,
    position: &'a LocalizedText,
    affiliation: &'a LocalizedText,
    short_bio: &'a LocalizedText,
    avatar: Option<&'a str>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl<'a> From<&'a ConferenceSpeaker> for SpeakerOutput<'a> {
    fn from(speaker: &'a ConferenceSpeaker) -> Self {
        Self {
            id: speaker.id,
            conference_id: speaker.conference_id,
            user_id: speaker.user_id,
            full_name: &speaker.full_name,
            twitter_handle: speaker.twitter_handle(),
            personal_url: speaker.personal_url.as_deref(),
            position: &speaker.position,
            affiliation: &speaker.affiliation,
            short_bio: &speaker.short_bio,
            avatar: speaker.avatar.as_deref(),
            created_at: speaker.created_at,
        }
    }
}

impl Speaker {
    pub async fn run(&self) -> Result<()> {
        let pgpool = self.database_args.connect().await?;
        let repository = PgRepository::new(pgpool);

        match &self.action {
            Action::List { conference_id } => {
                let speakers = repository.speakers_of(*conference_id).await?;
                print_json(&speakers.iter().map(SpeakerOutput::from).collect::<Vec<_>>())
            },
            Action::Show { id } => {
                let speaker = self.find(&repository, *id).await?;
                let context = self.context(&repository, speaker.conference_id).await?;

                let form = SpeakerForm::map_from_record(&speaker, &repository).await?;
                let lookups = SpeakerLookups::resolve(&form, &context, &repository).await?;
                let selected_meeting_links = form.selected_meeting_links(&repository).await?;

                print_json(&serde_json::json!({
                    "form": form,
                    "user": lookups.user(),
                    "available_meetings": lookups.available_meetings(),
                    "selected_meeting_links": selected_meeting_links,
                }))
            },
            Action::History { id } => {
                let entries = repository
                    .history_of(*id)
                    .await?
                    .iter()
                    .map(|log| {
                        serde_json::json!({
                            "summary": audit::present(log),
                            "changeset": log.changeset.0,
                            "created_at": log.created_at.unix_timestamp(),
                        })
                    })
                    .collect::<Vec<_>>();
                print_json(&entries)
            },
            Action::Create { conference_id, admin_id, input } => {
                let context = self.context(&repository, *conference_id).await?;
                let form = read_form(input).await?;

                let speaker = report(commands::create_speaker(&form, &context, *admin_id, &repository).await)?;
                print_json(&SpeakerOutput::from(&speaker))
            },
            Action::Update { id, admin_id, input } => {
                let current = self.find(&repository, *id).await?;
                let context = self.context(&repository, current.conference_id).await?;
                let form = read_form(input).await?;

                let speaker = report(commands::update_speaker(*id, &form, &context, *admin_id, &repository).await)?;
                print_json(&SpeakerOutput::from(&speaker))
            },
            Action::Destroy { id, admin_id } => {
                let current = self.find(&repository, *id).await?;
                let context = self.context(&repository, current.conference_id).await?;

                report(commands::destroy_speaker(*id, &context, *admin_id, &repository).await)
            },
        }
    }

    async fn find(&self, repository: &PgRepository, id: i64) -> Result<ConferenceSpeaker> {
        repository
            .find_speaker(id)
            .await?
            .with_context(|| format!("conference speaker {id} not found"))
    }

    async fn context(&self, repository: &PgRepository, conference_id: i64) -> Result<FormContext> {
        let conference = repository
            .conference(conference_id)
            .await?
            .with_context(|| format!("conference {conference_id} not found"))?;
        let organization = repository
            .organization(conference.organization_id)
            .await?
            .with_context(|| format!("organization {} not found", conference.organization_id))?;

        Ok(FormContext {
            organization,
            conference_id: conference.id,
            avatar_policy: self.avatar_args.policy(),
            locale: self.default_locale.clone(),
        })
    }
}

async fn read_form(path: &Path) -> Result<SpeakerForm> {
    let input = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let params: SpeakerParams = serde_json::from_str(&input)
        .with_context(|| format!("failed to parse {} as speaker attributes", path.display()))?;

    Ok(params.into())
}

/// Prints validation errors on stdout for the caller to show next to the fields.
fn report<T>(result: Result<T, SpeakerError>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(SpeakerError::Invalid(errors)) => {
            print_json(&serde_json::json!({ "errors": &errors }))?;
            bail!("conference speaker is invalid: {errors}")
        },
        Err(err) => Err(err.into()),
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}
