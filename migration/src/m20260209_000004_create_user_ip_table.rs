use sea_orm_migration::prelude::*;

/// Creates the `user_ip` ledger. The unique `(user_id, ip_address)` index is the only
/// coordination between concurrent observations of the same pair.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum UserIp {
    Table,
    Id,
    UserId,
    IpAddress,
    Created,
    Updated,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserIp::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserIp::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserIp::UserId).integer().not_null())
                    .col(ColumnDef::new(UserIp::IpAddress).string_len(45).not_null())
                    .col(
                        ColumnDef::new(UserIp::Created)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserIp::Updated)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_ip_user_id")
                            .from(UserIp::Table, UserIp::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_ip_user_id_ip_address")
                    .table(UserIp::Table)
                    .col(UserIp::UserId)
                    .col(UserIp::IpAddress)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserIp::Table).to_owned())
            .await
    }
}
