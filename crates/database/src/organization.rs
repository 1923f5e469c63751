use anyhow::{Error, Result};
use sea_query::{Expr, Iden, PostgresQueryBuilder, Query};
use sea_query_binder::SqlxBinder;
use sqlx::{FromRow, PgPool};

#[derive(Iden)]
pub(crate) enum DatabaseOrganization {
    #[iden = "organizations"]
    Table,
    Id,
    Name,
    DefaultLocale,
}

#[derive(Debug, Clone, FromRow)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub default_locale: String,
}

pub async fn fetch(database: &PgPool, id: i64) -> Result<Option<Organization>> {
    let (sql, values) = Query::select()
        .columns([
            DatabaseOrganization::Id,
            DatabaseOrganization::Name,
            DatabaseOrganization::DefaultLocale,
        ])
        .from(DatabaseOrganization::Table)
        .and_where(Expr::col(DatabaseOrganization::Id).eq(id))
        .build_sqlx(PostgresQueryBuilder);

    sqlx::query_as_with::<_, Organization, _>(&sql, values)
        .fetch_optional(&mut *database.acquire().await?)
        .await
        .map_err(Error::msg)
}
