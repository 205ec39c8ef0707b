pub use sea_orm_migration::prelude::*;

mod m20260810_090000_members;
mod m20260810_120000_group_memberships;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260810_090000_members::Migration),
            Box::new(m20260810_120000_group_memberships::Migration),
        ]
    }
}
