pub use sea_orm_migration::prelude::*;

mod m20260208_000001_create_user_table;
mod m20260208_000002_create_category_table;
mod m20260209_000001_create_game_table;
mod m20260209_000002_create_game_equipment_table;
mod m20260209_000003_create_comment_table;
mod m20260209_000004_create_user_ip_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260208_000001_create_user_table::Migration),
            Box::new(m20260208_000002_create_category_table::Migration),
            Box::new(m20260209_000001_create_game_table::Migration),
            Box::new(m20260209_000002_create_game_equipment_table::Migration),
            Box::new(m20260209_000003_create_comment_table::Migration),
            Box::new(m20260209_000004_create_user_ip_table::Migration),
        ]
    }
}
