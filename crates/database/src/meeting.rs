use anyhow::{Error, Result};
use futures::TryStreamExt;
use sea_query::{Expr, Iden, JoinType, Order, PostgresQueryBuilder, Query};
use sea_query_binder::SqlxBinder;
use sqlx::{FromRow, PgPool, types::Json};

use crate::Translations;

pub const MEETINGS_MANIFEST: &str = "meetings";

#[derive(Iden)]
pub(crate) enum DatabaseComponent {
    #[iden = "components"]
    Table,
    Id,
    ParticipatorySpaceId,
    ManifestName,
}

#[derive(Iden)]
pub(crate) enum DatabaseMeeting {
    #[iden = "meetings"]
    Table,
    Id,
    ComponentId,
    Title,
}

#[derive(Debug, Clone, FromRow)]
pub struct Meeting {
    pub id: i64,
    pub component_id: i64,
    pub title: Json<Translations>,
}

/// Every meeting that belongs to a `meetings` component of the given space.
pub async fn fetch_in_space(database: &PgPool, participatory_space_id: i64) -> Result<Vec<Meeting>> {
    let (sql, values) = Query::select()
        .columns([
            (DatabaseMeeting::Table, DatabaseMeeting::Id),
            (DatabaseMeeting::Table, DatabaseMeeting::ComponentId),
            (DatabaseMeeting::Table, DatabaseMeeting::Title),
        ])
        .from(DatabaseMeeting::Table)
        .join(
            JoinType::InnerJoin,
            DatabaseComponent::Table,
            Expr::col((DatabaseMeeting::Table, DatabaseMeeting::ComponentId))
                .equals((DatabaseComponent::Table, DatabaseComponent::Id)),
        )
        .and_where(Expr::col((DatabaseComponent::Table, DatabaseComponent::ParticipatorySpaceId)).eq(participatory_space_id))
        .and_where(Expr::col((DatabaseComponent::Table, DatabaseComponent::ManifestName)).eq(MEETINGS_MANIFEST))
        .order_by((DatabaseMeeting::Table, DatabaseMeeting::Id), Order::Asc)
        .build_sqlx(PostgresQueryBuilder);

    sqlx::query_as_with::<_, Meeting, _>(&sql, values)
        .fetch(&mut *database.acquire().await?)
        .try_collect()
        .await
        .map_err(Error::msg)
}
