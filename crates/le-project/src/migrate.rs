//! Configuration version migration.

use crate::ProjectError;
use crate::schema::RunConfig;

/// Version 1 introduced the recovery period; version 0 files run without one.
pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut config: RunConfig) -> Result<RunConfig, ProjectError> {
    while config.version < LATEST_VERSION {
        config = migrate_one_version(config)?;
    }
    Ok(config)
}

fn migrate_one_version(config: RunConfig) -> Result<RunConfig, ProjectError> {
    match config.version {
        0 => migrate_v0_to_v1(config),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

fn migrate_v0_to_v1(mut config: RunConfig) -> Result<RunConfig, ProjectError> {
    config.recovery_years = 0;
    config.version = 1;
    Ok(config)
}
