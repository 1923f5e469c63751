use futures::future::BoxFuture;
use sea_query::{ColumnDef, ForeignKey, ForeignKeyAction, Index, PostgresQueryBuilder, Table};
use sqlx::{PgConnection, Postgres};
use sqlx_migrator::{operation::Operation, vec_box};

use crate::{
    conference::DatabaseConference,
    meeting::{DatabaseComponent, DatabaseMeeting},
    organization::DatabaseOrganization,
    user::DatabaseUser,
};

pub(crate) struct CreateTableOperation;
pub(crate) struct CreateIndexOperation;

pub(crate) struct V1Migration;

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
                .table(DatabaseOrganization::Table)
                .col(ColumnDef::new(DatabaseOrganization::Id).big_integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(DatabaseOrganization::Name).text().not_null())
                .col(ColumnDef::new(DatabaseOrganization::DefaultLocale).text().not_null().default("en"))
                .build(PostgresQueryBuilder);

            sqlx::query(&sql).execute(&mut *connection).await?;

            let sql = Table::create()
                .if_not_exists()
                .table(DatabaseUser::Table)
                .col(ColumnDef::new(DatabaseUser::Id).big_integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(DatabaseUser::OrganizationId).big_integer().not_null())
                .col(ColumnDef::new(DatabaseUser::Name).text().not_null())
                .col(ColumnDef::new(DatabaseUser::Nickname).text().not_null())
                .foreign_key(
                    ForeignKey::create()
                        .from(DatabaseUser::Table, DatabaseUser::OrganizationId)
                        .to(DatabaseOrganization::Table, DatabaseOrganization::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .build(PostgresQueryBuilder);

            sqlx::query(&sql).execute(&mut *connection).await?;

            let sql = Table::create()
                .if_not_exists()
                .table(DatabaseConference::Table)
                .col(ColumnDef::new(DatabaseConference::Id).big_integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(DatabaseConference::OrganizationId).big_integer().not_null())
                .col(ColumnDef::new(DatabaseConference::Title).json_binary().not_null())
                .foreign_key(
                    ForeignKey::create()
                        .from(DatabaseConference::Table, DatabaseConference::OrganizationId)
                        .to(DatabaseOrganization::Table, DatabaseOrganization::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .build(PostgresQueryBuilder);

            sqlx::query(&sql).execute(&mut *connection).await?;

            let sql = Table::create()
                .if_not_exists()
                .table(DatabaseComponent::Table)
                .col(ColumnDef::new(DatabaseComponent::Id).big_integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(DatabaseComponent::ParticipatorySpaceId).big_integer().not_null())
                .col(ColumnDef::new(DatabaseComponent::ManifestName).text().not_null())
                .foreign_key(
                    ForeignKey::create()
                        .from(DatabaseComponent::Table, DatabaseComponent::ParticipatorySpaceId)
                        .to(DatabaseConference::Table, DatabaseConference::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .build(PostgresQueryBuilder);

            sqlx::query(&sql).execute(&mut *connection).await?;

            let sql = Table::create()
                .if_not_exists()
                .table(DatabaseMeeting::Table)
                .col(ColumnDef::new(DatabaseMeeting::Id).big_integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(DatabaseMeeting::ComponentId).big_integer().not_null())
                .col(ColumnDef::new(DatabaseMeeting::Title).json_binary().not_null())
                .foreign_key(
                    ForeignKey::create()
                        .from(DatabaseMeeting::Table, DatabaseMeeting::ComponentId)
                        .to(DatabaseComponent::Table, DatabaseComponent::Id)
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
                .table(DatabaseMeeting::Table)
                .table(DatabaseComponent::Table)
                .table(DatabaseConference::Table)
                .table(DatabaseUser::Table)
                .table(DatabaseOrganization::Table)
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
                .name("users_organization_id_idx")
                .table(DatabaseUser::Table)
                .col(DatabaseUser::OrganizationId)
                .build(PostgresQueryBuilder);

            sqlx::query(&sql).execute(&mut *connection).await?;

            let sql = Index::create()
                .if_not_exists()
                .name("components_participatory_space_id_idx")
                .table(DatabaseComponent::Table)
                .col(DatabaseComponent::ParticipatorySpaceId)
                .build(PostgresQueryBuilder);

            sqlx::query(&sql).execute(&mut *connection).await?;

            let sql = Index::create()
                .if_not_exists()
                .name("meetings_component_id_idx")
                .table(DatabaseMeeting::Table)
                .col(DatabaseMeeting::ComponentId)
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
            for name in ["users_organization_id_idx", "components_participatory_space_id_idx", "meetings_component_id_idx"] {
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
    V1Migration,
    "conferences",
    "create platform tables",
    vec_box![],
    vec_box![
        CreateTableOperation,
        CreateIndexOperation,
    ]
);
