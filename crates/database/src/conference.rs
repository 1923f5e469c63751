use anyhow::{Error, Result};
use sea_query::{Expr, Iden, PostgresQueryBuilder, Query};
use sea_query_binder::SqlxBinder;
use sqlx::{FromRow, PgPool, types::Json};

use crate::Translations;

#[derive(Iden)]
pub(crate) enum DatabaseConference {
    #[iden = "conferences"]
    Table,
    Id,
    OrganizationId,
    Title,
}

#[derive(Debug, Clone, FromRow)]
pub struct Conference {
    pub id: i64,
    pub organization_id: i64,
    pub title: Json<Translations>,
}

pub async fn fetch(database: &PgPool, id: i64) -> Result<Option<Conference>> {
    let (sql, values) = Query::select()
        .columns([
            DatabaseConference::Id,
            DatabaseConference::OrganizationId,
            DatabaseConference::Title,
        ])
        .from(DatabaseConference::Table)
        .and_where(Expr::col(DatabaseConference::Id).eq(id))
        .build_sqlx(PostgresQueryBuilder);

    sqlx::query_as_with::<_, Conference, _>(&sql, values)
        .fetch_optional(&mut *database.acquire().await?)
        .await
        .map_err(Error::msg)
}
