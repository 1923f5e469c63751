use std::ops::Deref;

use sqlx::Postgres;
pub use sqlx_migrator::cli::MigrationCommand;
pub use sqlx_migrator::migrator::{Migrate, Plan};
use sqlx_migrator::{Info, migrator, vec_box};

pub mod v1_platform;
pub mod v2_conference_speakers;

pub struct Migrator {
    inner: migrator::Migrator<Postgres>,
}

impl Default for Migrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Migrator {
    type Target = migrator::Migrator<Postgres>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Migrator {
    pub fn new() -> Self {
        let mut migrator = migrator::Migrator::new();
        migrator.add_migrations(vec_box!(
            v1_platform::V1Migration,
            v2_conference_speakers::V2Migration,
        ));

        Self { inner: migrator }
    }

    pub fn into_boxed_inner(self) -> Box<migrator::Migrator<Postgres>> {
        Box::new(self.inner)
    }
}
