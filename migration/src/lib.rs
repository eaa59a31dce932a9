pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_invites;
mod m20250301_000002_create_profiles;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_invites::Migration),
            Box::new(m20250301_000002_create_profiles::Migration),
        ]
    }
}
