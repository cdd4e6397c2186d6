use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Streamer::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Streamer::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Streamer::Name).string().not_null())
                    .col(ColumnDef::new(Streamer::Platform).string().not_null())
                    .col(
                        ColumnDef::new(Streamer::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SubscriberHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubscriberHistory::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SubscriberHistory::StreamerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriberHistory::Count)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriberHistory::Timestamp)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriberHistory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscriber_history_streamer_id")
                            .from(SubscriberHistory::Table, SubscriberHistory::StreamerId)
                            .to(Streamer::Table, Streamer::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // History is always read per streamer in timestamp order
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_subscriber_history_streamer_ts")
                    .table(SubscriberHistory::Table)
                    .col(SubscriberHistory::StreamerId)
                    .col(SubscriberHistory::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_streamers_created_at")
                    .table(Streamer::Table)
                    .col(Streamer::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_streamers_created_at").to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_subscriber_history_streamer_ts")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(SubscriberHistory::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Streamer::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Streamer {
    #[sea_orm(iden = "streamers")]
    Table,
    Id,
    Name,
    Platform,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SubscriberHistory {
    #[sea_orm(iden = "subscriber_history")]
    Table,
    Id,
    StreamerId,
    Count,
    Timestamp,
    CreatedAt,
}
