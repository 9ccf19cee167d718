pub use sea_orm_migration::prelude::*;

mod m20190401_105554_create_reservations_table;
mod m20190402_093012_create_notification_tokens_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20190401_105554_create_reservations_table::Migration),
            Box::new(m20190402_093012_create_notification_tokens_table::Migration),
        ]
    }
}
