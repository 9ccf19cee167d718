use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NotificationTokens::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NotificationTokens::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NotificationTokens::ApplicationId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationTokens::NotificationTokenType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationTokens::NotificationTokenStatus)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationTokens::Token)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationTokens::Source)
                            .string_len(32)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(NotificationTokens::CreateDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationTokens::ExpirationDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // No uniqueness here: legacy rows may hold two ACTIVE tokens for one pair.
        manager
            .create_index(
                Index::create()
                    .name("idx_notification_tokens_application_id_type")
                    .table(NotificationTokens::Table)
                    .col(NotificationTokens::ApplicationId)
                    .col(NotificationTokens::NotificationTokenType)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NotificationTokens::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum NotificationTokens {
    Table,
    Id,
    ApplicationId,
    NotificationTokenType,
    NotificationTokenStatus,
    Token,
    Source,
    CreateDate,
    ExpirationDate,
}
