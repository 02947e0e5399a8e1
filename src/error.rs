use crate::activity_validation::FieldIssue;
use thiserror::Error;

/// Structural failures that abort a schedule computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    #[error("activity name '{name}' is used by more than one activity")]
    DuplicateActivityName { name: String },

    #[error("activity '{activity}' depends on itself")]
    SelfDependency { activity: String },

    #[error("activity '{activity}' depends on unknown activity '{dependency}'")]
    UnresolvedDependency { activity: String, dependency: String },

    #[error("circular dependency detected: {}", format_cycle(.cycle))]
    CycleDetected { cycle: Vec<String> },

    #[error("activity {id} failed field validation ({} issue(s))", .issues.len())]
    InvalidActivity { id: i32, issues: Vec<FieldIssue> },

    /// Offsets or dates for the activity exceed what can be represented.
    #[error("activity '{activity}' is scheduled beyond the supported date range")]
    DateOutOfRange { activity: String },

    #[error(transparent)]
    Pert(#[from] PertError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PertError {
    /// Confidence levels are percentages in the open interval (0, 100).
    #[error("probability must be between 0 and 100 (exclusive), got {0}")]
    InvalidProbability(f64),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("activity {0} not found")]
    ActivityNotFound(i32),

    #[error("activity id {0} is already in use")]
    DuplicateId(i32),

    /// The highest id is taken, so no fresh id can be assigned.
    #[error("no activity ids left after {0}")]
    IdSpaceExhausted(i32),
}

fn format_cycle(cycle: &[String]) -> String {
    match cycle.first() {
        Some(first) => format!("{} -> {}", cycle.join(" -> "), first),
        None => String::new(),
    }
}
