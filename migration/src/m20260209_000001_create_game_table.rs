use sea_orm_migration::prelude::*;

/// Creates the `game` table. Player and duration bounds are also guarded by CHECK
/// constraints so that writes bypassing the application still keep `min <= max`.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[allow(clippy::enum_variant_names)]
#[derive(DeriveIden)]
enum Game {
    Table,
    Id,
    Title,
    Slug,
    Description,
    MinPlayers,
    MaxPlayers,
    MinDuration,
    MaxDuration,
    Environment,
    CategoryId,
    IsActive,
    Attachments,
    Created,
    Modified,
}

#[derive(DeriveIden)]
enum Category {
    Table,
    Id,
}

#[async_trait::async_trait]
#[allow(clippy::too_many_lines)]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Game::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Game::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Game::Title).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Game::Slug)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Game::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Game::MinPlayers)
                            .small_integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Game::MaxPlayers)
                            .small_integer()
                            .not_null()
                            .default(10),
                    )
                    .col(
                        ColumnDef::new(Game::MinDuration)
                            .small_integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Game::MaxDuration)
                            .small_integer()
                            .not_null()
                            .default(30),
                    )
                    .col(
                        ColumnDef::new(Game::Environment)
                            .string_len(4)
                            .not_null()
                            .default("OUT"),
                    )
                    .col(ColumnDef::new(Game::CategoryId).integer().null())
                    .col(
                        ColumnDef::new(Game::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Game::Attachments).string_len(500).null())
                    .col(
                        ColumnDef::new(Game::Created)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Game::Modified)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .check(Expr::col(Game::MinPlayers).lte(Expr::col(Game::MaxPlayers)))
                    .check(Expr::col(Game::MinDuration).lte(Expr::col(Game::MaxDuration)))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_category_id")
                            .from(Game::Table, Game::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_game_category_id")
                    .table(Game::Table)
                    .col(Game::CategoryId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Game::Table).to_owned())
            .await
    }
}
