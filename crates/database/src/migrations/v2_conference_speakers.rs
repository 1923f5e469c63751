use futures::future::BoxFuture;
use sea_query::{ColumnDef, Expr, ForeignKey, ForeignKeyAction, Index, PgFunc, PostgresQueryBuilder, Table};
use sqlx::{PgConnection, Postgres};
use sqlx_migrator::{operation::Operation, vec_box};

use super::v1_platform::V1Migration;
use crate::{
    action_log::DatabaseActionLog,
    conference::DatabaseConference,
    conference_speaker::DatabaseConferenceSpeaker,
    meeting::DatabaseMeeting,
    organization::DatabaseOrganization,
    participatory_space_link::{DatabaseParticipatorySpaceLink, LinkRelation},
    user::DatabaseUser,
};

pub(crate) struct CreateTableOperation;
pub(crate) struct CreateIndexOperation;

pub(crate) struct V2Migration;

/// Links of a speaker go away with the speaker or with the meeting they point at.
fn participatory_space_links_table() -> String {
    let relations = LinkRelation::ALL.map(LinkRelation::as_str);

    Table::create()
        .if_not_exists()
        .table(DatabaseParticipatorySpaceLink::Table)
        .col(ColumnDef::new(DatabaseParticipatorySpaceLink::Id).uuid().default(PgFunc::gen_random_uuid()).primary_key())
        .col(
            ColumnDef::new(DatabaseParticipatorySpaceLink::Relation)
                .text()
                .not_null()
                .check(Expr::col(DatabaseParticipatorySpaceLink::Relation).is_in(relations)),
        )
        .col(ColumnDef::new(DatabaseParticipatorySpaceLink::FromId).big_integer().not_null())
        .col(ColumnDef::new(DatabaseParticipatorySpaceLink::ToId).big_integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .from(DatabaseParticipatorySpaceLink::Table, DatabaseParticipatorySpaceLink::FromId)
                .to(DatabaseConferenceSpeaker::Table, DatabaseConferenceSpeaker::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .from(DatabaseParticipatorySpaceLink::Table, DatabaseParticipatorySpaceLink::ToId)
                .to(DatabaseMeeting::Table, DatabaseMeeting::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .build(PostgresQueryBuilder)
}

impl Operation<Postgres> for CreateTableOperation {
    fn up<'a, 'b, 'async_trait>(&'a self, connection: &'b mut PgConnection) -> BoxFuture<'async_trait, Result<(), sqlx_migrator::error::Error>>
    where
        Self: 'async_trait,
        'a: 'async_trait,
        'b: 'async_trait,
    {
        Box::pin(async {
            let sql = Table::create()
                .if_not_exists()
                .table(DatabaseConferenceSpeaker::Table)
                .col(ColumnDef::new(DatabaseConferenceSpeaker::Id).big_integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(DatabaseConferenceSpeaker::ConferenceId).big_integer().not_null())
                .col(ColumnDef::new(DatabaseConferenceSpeaker::UserId).big_integer())
                .col(ColumnDef::new(DatabaseConferenceSpeaker::FullName).text().not_null().default(""))
                .col(ColumnDef::new(DatabaseConferenceSpeaker::TwitterHandle).text())
                .col(ColumnDef::new(DatabaseConferenceSpeaker::PersonalUrl).text())
                .col(ColumnDef::new(DatabaseConferenceSpeaker::Position).json_binary().not_null())
                .col(ColumnDef::new(DatabaseConferenceSpeaker::Affiliation).json_binary().not_null())
                .col(ColumnDef::new(DatabaseConferenceSpeaker::ShortBio).json_binary().not_null())
                .col(ColumnDef::new(DatabaseConferenceSpeaker::Avatar).text())
                .col(
                    ColumnDef::new(DatabaseConferenceSpeaker::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp()),
                )
                .foreign_key(
                    ForeignKey::create()
                        .from(DatabaseConferenceSpeaker::Table, DatabaseConferenceSpeaker::ConferenceId)
                        .to(DatabaseConference::Table, DatabaseConference::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .from(DatabaseConferenceSpeaker::Table, DatabaseConferenceSpeaker::UserId)
                        .to(DatabaseUser::Table, DatabaseUser::Id)
                        .on_delete(ForeignKeyAction::SetNull),
                )
                .build(PostgresQueryBuilder);

            sqlx::query(&sql).execute(&mut *connection).await?;

            sqlx::query(&participatory_space_links_table()).execute(&mut *connection).await?;

            let sql = Table::create()
                .if_not_exists()
                .table(DatabaseActionLog::Table)
                .col(ColumnDef::new(DatabaseActionLog::Id).uuid().default(PgFunc::gen_random_uuid()).primary_key())
                .col(ColumnDef::new(DatabaseActionLog::OrganizationId).big_integer().not_null())
                .col(ColumnDef::new(DatabaseActionLog::UserId).big_integer().not_null())
                .col(ColumnDef::new(DatabaseActionLog::Action).text().not_null())
                .col(ColumnDef::new(DatabaseActionLog::ResourceType).text().not_null())
                .col(ColumnDef::new(DatabaseActionLog::ResourceId).big_integer().not_null())
                .col(ColumnDef::new(DatabaseActionLog::ParticipatorySpaceId).big_integer().not_null())
                .col(ColumnDef::new(DatabaseActionLog::Changeset).json_binary().not_null())
                .col(
                    ColumnDef::new(DatabaseActionLog::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp()),
                )
                .foreign_key(
                    ForeignKey::create()
                        .from(DatabaseActionLog::Table, DatabaseActionLog::OrganizationId)
                        .to(DatabaseOrganization::Table, DatabaseOrganization::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .build(PostgresQueryBuilder);

            sqlx::query(&sql).execute(&mut *connection).await?;

            Ok(())
        })
    }

    fn down<'a, 'b, 'async_trait>(&'a self, connection: &'b mut PgConnection) -> BoxFuture<'async_trait, Result<(), sqlx_migrator::error::Error>>
    where
        Self: 'async_trait,
        'a: 'async_trait,
        'b: 'async_trait,
    {
        Box::pin(async {
            let sql = Table::drop()
                .table(DatabaseActionLog::Table)
                .table(DatabaseParticipatorySpaceLink::Table)
                .table(DatabaseConferenceSpeaker::Table)
                .build(PostgresQueryBuilder);

            sqlx::query(&sql).execute(&mut *connection).await?;

            Ok(())
        })
    }
}

impl Operation<Postgres> for CreateIndexOperation {
    fn up<'a, 'b, 'async_trait>(&'a self, connection: &'b mut PgConnection) -> BoxFuture<'async_trait, Result<(), sqlx_migrator::error::Error>>
    where
        Self: 'async_trait,
        'a: 'async_trait,
        'b: 'async_trait,
    {
        Box::pin(async {
            let sql = Index::create()
                .if_not_exists()
                .name("conference_speakers_conference_id_idx")
                .table(DatabaseConferenceSpeaker::Table)
                .col(DatabaseConferenceSpeaker::ConferenceId)
                .build(PostgresQueryBuilder);

            sqlx::query(&sql).execute(&mut *connection).await?;

            let sql = Index::create()
                .if_not_exists()
                .unique()
                .name("participatory_space_links_relation_from_to_idx")
                .table(DatabaseParticipatorySpaceLink::Table)
                .col(DatabaseParticipatorySpaceLink::Relation)
                .col(DatabaseParticipatorySpaceLink::FromId)
                .col(DatabaseParticipatorySpaceLink::ToId)
                .build(PostgresQueryBuilder);

            sqlx::query(&sql).execute(&mut *connection).await?;

            let sql = Index::create()
                .if_not_exists()
                .name("action_logs_resource_idx")
                .table(DatabaseActionLog::Table)
                .col(DatabaseActionLog::ResourceType)
                .col(DatabaseActionLog::ResourceId)
                .build(PostgresQueryBuilder);

            sqlx::query(&sql).execute(&mut *connection).await?;

            Ok(())
        })
    }

    fn down<'a, 'b, 'async_trait>(&'a self, connection: &'b mut PgConnection) -> BoxFuture<'async_trait, Result<(), sqlx_migrator::error::Error>>
    where
        Self: 'async_trait,
        'a: 'async_trait,
        'b: 'async_trait,
    {
        Box::pin(async {
            for name in [
                "conference_speakers_conference_id_idx",
                "participatory_space_links_relation_from_to_idx",
                "action_logs_resource_idx",
            ] {
                let sql = Index::drop()
                    .if_exists()
                    .name(name)
                    .build(PostgresQueryBuilder);

                sqlx::query(&sql).execute(&mut *connection).await?;
            }

            Ok(())
        })
    }
}

sqlx_migrator::migration!(
    sqlx::Postgres,
    V2Migration,
    "conferences",
    "create conference speakers",
    vec_box![V1Migration],
    vec_box![
        CreateTableOperation,
        CreateIndexOperation,
    ]
);

#[cfg(test)]
mod tests {
    use super::participatory_space_links_table;

    #[test]
    fn links_cascade_from_speakers_and_meetings() {
        let sql = participatory_space_links_table();

        assert!(sql.contains(r#"FOREIGN KEY ("from_id") REFERENCES "conference_speakers" ("id") ON DELETE CASCADE"#), "{sql}");
        assert!(sql.contains(r#"FOREIGN KEY ("to_id") REFERENCES "meetings" ("id") ON DELETE CASCADE"#), "{sql}");
        assert!(sql.contains("'speaking_meetings'"), "{sql}");
    }
}
