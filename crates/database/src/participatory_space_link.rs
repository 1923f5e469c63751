use std::{fmt, str::FromStr};

use anyhow::{Error, Result, bail};
use futures::TryStreamExt;
use sea_query::{Expr, Iden, Order, PostgresQueryBuilder, Query};
use sea_query_binder::SqlxBinder;
use serde::Serialize;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

#[derive(Iden)]
pub(crate) enum DatabaseParticipatorySpaceLink {
    #[iden = "participatory_space_links"]
    Table,
    Id,
    Relation,
    FromId,
    ToId,
}

/// Kind of link between a participatory space resource and another resource.
///
/// The relation decides what both ends point at, so the table stores bare ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkRelation {
    /// A conference speaker (`from`) speaks at a meeting (`to`).
    SpeakingMeetings,
}

impl LinkRelation {
    pub const ALL: [LinkRelation; 1] = [LinkRelation::SpeakingMeetings];

    pub fn as_str(self) -> &'static str {
        match self {
            LinkRelation::SpeakingMeetings => "speaking_meetings",
        }
    }
}

impl fmt::Display for LinkRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkRelation {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match LinkRelation::ALL.into_iter().find(|relation| relation.as_str() == value) {
            Some(relation) => Ok(relation),
            None => bail!("unknown link relation: {value}"),
        }
    }
}

#[derive(Debug, FromRow)]
struct DatabaseParticipatorySpaceLinkRow {
    id: Uuid,
    relation: String,
    from_id: i64,
    to_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipatorySpaceLink {
    pub id: Uuid,
    pub relation: LinkRelation,
    pub from_id: i64,
    pub to_id: i64,
}

impl TryFrom<DatabaseParticipatorySpaceLinkRow> for ParticipatorySpaceLink {
    type Error = Error;

    fn try_from(value: DatabaseParticipatorySpaceLinkRow) -> Result<Self> {
        Ok(Self {
            id: value.id,
            relation: value.relation.parse()?,
            from_id: value.from_id,
            to_id: value.to_id,
        })
    }
}

pub async fn fetch_from(database: &PgPool, relation: LinkRelation, from_id: i64) -> Result<Vec<ParticipatorySpaceLink>> {
    let (sql, values) = Query::select()
        .columns([
            DatabaseParticipatorySpaceLink::Id,
            DatabaseParticipatorySpaceLink::Relation,
            DatabaseParticipatorySpaceLink::FromId,
            DatabaseParticipatorySpaceLink::ToId,
        ])
        .from(DatabaseParticipatorySpaceLink::Table)
        .and_where(Expr::col(DatabaseParticipatorySpaceLink::Relation).eq(relation.as_str()))
        .and_where(Expr::col(DatabaseParticipatorySpaceLink::FromId).eq(from_id))
        .order_by(DatabaseParticipatorySpaceLink::ToId, Order::Asc)
        .build_sqlx(PostgresQueryBuilder);

    let rows: Vec<_> = sqlx::query_as_with::<_, DatabaseParticipatorySpaceLinkRow, _>(&sql, values)
        .fetch(&mut *database.acquire().await?)
        .try_collect()
        .await
        .map_err(Error::msg)?;

    rows.into_iter().map(TryInto::try_into).collect()
}

/// Removes every link of `relation` starting at `from_id`.
pub async fn delete_from(connection: &mut PgConnection, relation: LinkRelation, from_id: i64) -> Result<u64> {
    let (sql, values) = Query::delete()
        .from_table(DatabaseParticipatorySpaceLink::Table)
        .and_where(Expr::col(DatabaseParticipatorySpaceLink::Relation).eq(relation.as_str()))
        .and_where(Expr::col(DatabaseParticipatorySpaceLink::FromId).eq(from_id))
        .build_sqlx(PostgresQueryBuilder);

    sqlx::query_with(&sql, values)
        .execute(&mut *connection)
        .await
        .map(|result| result.rows_affected())
        .map_err(Error::msg)
}

/// Makes `to_ids` the exact set of links of `relation` starting at `from_id`.
pub async fn replace(connection: &mut PgConnection, relation: LinkRelation, from_id: i64, to_ids: &[i64]) -> Result<()> {
    let removed = delete_from(connection, relation, from_id).await?;
    tracing::debug!(%relation, from_id, removed, added = to_ids.len(), "replacing participatory space links");

    if to_ids.is_empty() {
        return Ok(());
    }

    let mut query = Query::insert();
    query
        .into_table(DatabaseParticipatorySpaceLink::Table)
        .columns([
            DatabaseParticipatorySpaceLink::Relation,
            DatabaseParticipatorySpaceLink::FromId,
            DatabaseParticipatorySpaceLink::ToId,
        ]);
    for to_id in to_ids {
        query.values_panic([relation.as_str().into(), from_id.into(), (*to_id).into()]);
    }
    let (sql, values) = query.build_sqlx(PostgresQueryBuilder);

    sqlx::query_with(&sql, values)
        .execute(&mut *connection)
        .await
        .map_err(Error::msg)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::LinkRelation;

    #[test]
    fn parses_known_relation_names_only() {
        assert_eq!("speaking_meetings".parse::<LinkRelation>().unwrap(), LinkRelation::SpeakingMeetings);
        assert_eq!(LinkRelation::SpeakingMeetings.to_string(), "speaking_meetings");
        assert!("related_meetings".parse::<LinkRelation>().is_err());
    }
}
