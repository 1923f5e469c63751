use anyhow::{Error, Result};
use futures::TryStreamExt;
use sea_query::{Expr, Iden, Order, PostgresQueryBuilder, Query, SimpleExpr};
use sea_query_binder::SqlxBinder;
use serde::Serialize;
use sqlx::{FromRow, PgConnection, PgPool, types::Json};
use time::OffsetDateTime;

use crate::Translations;

#[derive(Iden, Clone, Copy)]
pub(crate) enum DatabaseConferenceSpeaker {
    #[iden = "conference_speakers"]
    Table,
    Id,
    ConferenceId,
    UserId,
    FullName,
    TwitterHandle,
    PersonalUrl,
    Position,
    Affiliation,
    ShortBio,
    Avatar,
    CreatedAt,
}

const COLUMNS: [DatabaseConferenceSpeaker; 11] = [
    DatabaseConferenceSpeaker::Id,
    DatabaseConferenceSpeaker::ConferenceId,
    DatabaseConferenceSpeaker::UserId,
    DatabaseConferenceSpeaker::FullName,
    DatabaseConferenceSpeaker::TwitterHandle,
    DatabaseConferenceSpeaker::PersonalUrl,
    DatabaseConferenceSpeaker::Position,
    DatabaseConferenceSpeaker::Affiliation,
    DatabaseConferenceSpeaker::ShortBio,
    DatabaseConferenceSpeaker::Avatar,
    DatabaseConferenceSpeaker::CreatedAt,
];

#[derive(Debug, Clone, FromRow)]
pub struct ConferenceSpeakerRow {
    pub id: i64,
    pub conference_id: i64,
    pub user_id: Option<i64>,
    pub full_name: String,
    pub twitter_handle: Option<String>,
    pub personal_url: Option<String>,
    pub position: Json<Translations>,
    pub affiliation: Json<Translations>,
    pub short_bio: Json<Translations>,
    pub avatar: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Writable columns of a speaker; `id` and `created_at` are assigned by the database.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConferenceSpeakerValues {
    pub conference_id: i64,
    pub user_id: Option<i64>,
    pub full_name: String,
    pub twitter_handle: Option<String>,
    pub personal_url: Option<String>,
    pub position: Translations,
    pub affiliation: Translations,
    pub short_bio: Translations,
    pub avatar: Option<String>,
}

impl ConferenceSpeakerValues {
    fn assignments(&self) -> Result<Vec<(DatabaseConferenceSpeaker, SimpleExpr)>> {
        Ok(vec![
            (DatabaseConferenceSpeaker::ConferenceId, self.conference_id.into()),
            (DatabaseConferenceSpeaker::UserId, self.user_id.into()),
            (DatabaseConferenceSpeaker::FullName, self.full_name.clone().into()),
            (DatabaseConferenceSpeaker::TwitterHandle, self.twitter_handle.clone().into()),
            (DatabaseConferenceSpeaker::PersonalUrl, self.personal_url.clone().into()),
            (DatabaseConferenceSpeaker::Position, serde_json::to_value(&self.position)?.into()),
            (DatabaseConferenceSpeaker::Affiliation, serde_json::to_value(&self.affiliation)?.into()),
            (DatabaseConferenceSpeaker::ShortBio, serde_json::to_value(&self.short_bio)?.into()),
            (DatabaseConferenceSpeaker::Avatar, self.avatar.clone().into()),
        ])
    }
}

pub async fn fetch(database: &PgPool, id: i64) -> Result<Option<ConferenceSpeakerRow>> {
    let (sql, values) = Query::select()
        .columns(COLUMNS)
        .from(DatabaseConferenceSpeaker::Table)
        .and_where(Expr::col(DatabaseConferenceSpeaker::Id).eq(id))
        .build_sqlx(PostgresQueryBuilder);

    sqlx::query_as_with::<_, ConferenceSpeakerRow, _>(&sql, values)
        .fetch_optional(&mut *database.acquire().await?)
        .await
        .map_err(Error::msg)
}

/// Speakers of a conference in their default order: full name, then creation time.
pub async fn fetch_by_conference(database: &PgPool, conference_id: i64) -> Result<Vec<ConferenceSpeakerRow>> {
    let (sql, values) = Query::select()
        .columns(COLUMNS)
        .from(DatabaseConferenceSpeaker::Table)
        .and_where(Expr::col(DatabaseConferenceSpeaker::ConferenceId).eq(conference_id))
        .order_by(DatabaseConferenceSpeaker::FullName, Order::Asc)
        .order_by(DatabaseConferenceSpeaker::CreatedAt, Order::Asc)
        .build_sqlx(PostgresQueryBuilder);

    sqlx::query_as_with::<_, ConferenceSpeakerRow, _>(&sql, values)
        .fetch(&mut *database.acquire().await?)
        .try_collect()
        .await
        .map_err(Error::msg)
}

pub async fn insert(connection: &mut PgConnection, speaker: &ConferenceSpeakerValues) -> Result<ConferenceSpeakerRow> {
    let (columns, exprs): (Vec<_>, Vec<_>) = speaker.assignments()?.into_iter().unzip();

    let (sql, values) = Query::insert()
        .into_table(DatabaseConferenceSpeaker::Table)
        .columns(columns)
        .values_panic(exprs)
        .returning(Query::returning().columns(COLUMNS))
        .build_sqlx(PostgresQueryBuilder);

    sqlx::query_as_with::<_, ConferenceSpeakerRow, _>(&sql, values)
        .fetch_one(&mut *connection)
        .await
        .map_err(Error::msg)
}

pub async fn update(connection: &mut PgConnection, id: i64, speaker: &ConferenceSpeakerValues) -> Result<ConferenceSpeakerRow> {
    let (sql, values) = Query::update()
        .table(DatabaseConferenceSpeaker::Table)
        .values(speaker.assignments()?)
        .and_where(Expr::col(DatabaseConferenceSpeaker::Id).eq(id))
        .returning(Query::returning().columns(COLUMNS))
        .build_sqlx(PostgresQueryBuilder);

    sqlx::query_as_with::<_, ConferenceSpeakerRow, _>(&sql, values)
        .fetch_one(&mut *connection)
        .await
        .map_err(Error::msg)
}

pub async fn delete(connection: &mut PgConnection, id: i64) -> Result<u64> {
    let (sql, values) = Query::delete()
        .from_table(DatabaseConferenceSpeaker::Table)
        .and_where(Expr::col(DatabaseConferenceSpeaker::Id).eq(id))
        .build_sqlx(PostgresQueryBuilder);

    sqlx::query_with(&sql, values)
        .execute(&mut *connection)
        .await
        .map(|result| result.rows_affected())
        .map_err(Error::msg)
}
