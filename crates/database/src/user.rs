use anyhow::{Error, Result};
use sea_query::{Expr, Iden, PostgresQueryBuilder, Query};
use sea_query_binder::SqlxBinder;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

#[derive(Iden)]
pub(crate) enum DatabaseUser {
    #[iden = "users"]
    Table,
    Id,
    OrganizationId,
    Name,
    Nickname,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub organization_id: i64,
    pub name: String,
    pub nickname: String,
}

/// Looks a user up by id, only within the given organization.
pub async fn fetch_in_organization(database: &PgPool, organization_id: i64, id: i64) -> Result<Option<User>> {
    let (sql, values) = Query::select()
        .columns([
            DatabaseUser::Id,
            DatabaseUser::OrganizationId,
            DatabaseUser::Name,
            DatabaseUser::Nickname,
        ])
        .from(DatabaseUser::Table)
        .and_where(Expr::col(DatabaseUser::Id).eq(id))
        .and_where(Expr::col(DatabaseUser::OrganizationId).eq(organization_id))
        .build_sqlx(PostgresQueryBuilder);

    sqlx::query_as_with::<_, User, _>(&sql, values)
        .fetch_optional(&mut *database.acquire().await?)
        .await
        .map_err(Error::msg)
}
