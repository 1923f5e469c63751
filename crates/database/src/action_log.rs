use anyhow::{Error, Result};
use futures::TryStreamExt;
use sea_query::{Expr, Iden, Order, PostgresQueryBuilder, Query};
use sea_query_binder::SqlxBinder;
use sqlx::{FromRow, PgConnection, PgPool, types::Json};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Iden)]
pub(crate) enum DatabaseActionLog {
    #[iden = "action_logs"]
    Table,
    Id,
    OrganizationId,
    UserId,
    Action,
    ResourceType,
    ResourceId,
    ParticipatorySpaceId,
    Changeset,
    CreatedAt,
}

#[derive(Debug, Clone, FromRow)]
pub struct ActionLog {
    pub id: Uuid,
    pub organization_id: i64,
    pub user_id: i64,
    pub action: String,
    pub resource_type: String,
    pub resource_id: i64,
    pub participatory_space_id: i64,
    pub changeset: Json<serde_json::Value>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewActionLog {
    pub organization_id: i64,
    pub user_id: i64,
    pub action: String,
    pub resource_type: String,
    pub resource_id: i64,
    pub participatory_space_id: i64,
    pub changeset: serde_json::Value,
}

pub async fn insert(connection: &mut PgConnection, log: &NewActionLog) -> Result<Uuid> {
    let (sql, values) = Query::insert()
        .into_table(DatabaseActionLog::Table)
        .columns([
            DatabaseActionLog::OrganizationId,
            DatabaseActionLog::UserId,
            DatabaseActionLog::Action,
            DatabaseActionLog::ResourceType,
            DatabaseActionLog::ResourceId,
            DatabaseActionLog::ParticipatorySpaceId,
            DatabaseActionLog::Changeset,
        ])
        .values_panic([
            log.organization_id.into(),
            log.user_id.into(),
            log.action.clone().into(),
            log.resource_type.clone().into(),
            log.resource_id.into(),
            log.participatory_space_id.into(),
            log.changeset.clone().into(),
        ])
        .returning_col(DatabaseActionLog::Id)
        .build_sqlx(PostgresQueryBuilder);

    sqlx::query_scalar_with::<_, Uuid, _>(&sql, values)
        .fetch_one(&mut *connection)
        .await
        .map_err(Error::msg)
}

/// History of a resource, oldest entry first.
pub async fn fetch_for_resource(database: &PgPool, resource_type: &str, resource_id: i64) -> Result<Vec<ActionLog>> {
    let (sql, values) = Query::select()
        .columns([
            DatabaseActionLog::Id,
            DatabaseActionLog::OrganizationId,
            DatabaseActionLog::UserId,
            DatabaseActionLog::Action,
            DatabaseActionLog::ResourceType,
            DatabaseActionLog::ResourceId,
            DatabaseActionLog::ParticipatorySpaceId,
            DatabaseActionLog::Changeset,
            DatabaseActionLog::CreatedAt,
        ])
        .from(DatabaseActionLog::Table)
        .and_where(Expr::col(DatabaseActionLog::ResourceType).eq(resource_type))
        .and_where(Expr::col(DatabaseActionLog::ResourceId).eq(resource_id))
        .order_by(DatabaseActionLog::CreatedAt, Order::Asc)
        .build_sqlx(PostgresQueryBuilder);

    sqlx::query_as_with::<_, ActionLog, _>(&sql, values)
        .fetch(&mut *database.acquire().await?)
        .try_collect()
        .await
        .map_err(Error::msg)
}
