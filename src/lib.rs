pub mod activity;
pub mod activity_validation;
pub mod calculations;
pub mod calendar;
pub mod config;
pub mod cpm;
pub mod error;
pub mod graph;
pub mod persistence;
pub mod pert;
pub mod store;

pub use activity::{Activity, ActivityPatch};
pub use activity_validation::{ActivityField, FieldIssue, validate_activity};
pub use calendar::{BusinessCalendar, add_business_days};
pub use config::{EngineConfig, UnresolvedDependencyPolicy};
pub use cpm::{ProjectSchedule, ScheduleNode, ScheduleSummary, compute_schedule};
pub use error::{PertError, ScheduleError, StoreError};
pub use pert::{PertStatistics, ProbabilityEstimate, compute_pert_statistics, z_score};
pub use store::{NotComputableReason, ScheduleSnapshot, ScheduleView, SchedulingStore};
