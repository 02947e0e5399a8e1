use crate::activity::Activity;
use crate::activity_validation::find_duplicate_id;
use crate::error::StoreError;
use std::io;
use thiserror::Error;

pub mod file;

pub use file::{
    ActivityCsvRecord, ProjectFile, export_activities_to_csv, export_schedule_to_csv,
    import_activities_from_csv, load_config_from_json, load_project_from_json,
    read_activities_csv, save_project_to_json, write_schedule_csv,
};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Checks that hold for any activity set read from outside, independent of
/// whether the schedule can be computed.
pub fn validate_activities(activities: &[Activity]) -> PersistenceResult<()> {
    if let Some(id) = find_duplicate_id(activities) {
        return Err(PersistenceError::InvalidData(format!(
            "duplicate activity id {id}"
        )));
    }
    for activity in activities {
        let estimates = [
            activity.optimistic,
            activity.most_likely,
            activity.pessimistic,
        ];
        if estimates.iter().any(|value| !value.is_finite()) {
            return Err(PersistenceError::InvalidData(format!(
                "activity {} has a non-finite estimate",
                activity.id
            )));
        }
    }
    Ok(())
}
