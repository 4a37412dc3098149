use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GameEquipment::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GameEquipment::GameId).integer().not_null())
                    .col(
                        ColumnDef::new(GameEquipment::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(GameEquipment::GameId)
                            .col(GameEquipment::Name),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_equipment_game_id")
                            .from(GameEquipment::Table, GameEquipment::GameId)
                            .to(Game::Table, Game::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Reverse lookup: which games need a given piece of equipment
        manager
            .create_index(
                Index::create()
                    .name("idx_game_equipment_name")
                    .table(GameEquipment::Table)
                    .col(GameEquipment::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GameEquipment::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GameEquipment {
    Table,
    GameId,
    Name,
}

#[derive(DeriveIden)]
enum Game {
    Table,
    Id,
}
