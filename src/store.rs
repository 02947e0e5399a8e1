//! Owner of the activity set and project start date.
//!
//! Every mutation drops the cached result; queries recompute from scratch when
//! nothing is cached. A failed computation never replaces the last valid snapshot.

use crate::activity::{Activity, ActivityPatch};
use crate::activity_validation::{FieldIssue, find_duplicate_id, validate_activity};
use crate::config::EngineConfig;
use crate::cpm::{ProjectSchedule, compute_schedule};
use crate::error::{ScheduleError, StoreError};
use crate::pert::{PertStatistics, compute_pert_statistics};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Immutable result of one computation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSnapshot {
    pub schedule: ProjectSchedule,
    pub pert: PertStatistics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotComputableReason {
    MissingStartDate,
    NoActivities,
}

/// What a query yields when no structural error occurred.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleView {
    NotComputable(NotComputableReason),
    Computed(Arc<ScheduleSnapshot>),
}

impl ScheduleView {
    pub fn snapshot(&self) -> Option<&Arc<ScheduleSnapshot>> {
        match self {
            ScheduleView::Computed(snapshot) => Some(snapshot),
            ScheduleView::NotComputable(_) => None,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, ScheduleView::Computed(_))
    }
}

#[derive(Debug, Default)]
pub struct SchedulingStore {
    activities: Vec<Activity>,
    start_date: Option<NaiveDate>,
    config: EngineConfig,
    /// Highest id ever handed out; ids are never reused.
    last_id: i32,
    cached: Option<Result<ScheduleView, ScheduleError>>,
    last_valid: Option<Arc<ScheduleSnapshot>>,
}

impl SchedulingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    fn invalidate(&mut self) {
        self.cached = None;
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn activity(&self, id: i32) -> Option<&Activity> {
        self.activities.iter().find(|activity| activity.id == id)
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
        self.invalidate();
    }

    pub fn set_start_date(&mut self, date: Option<NaiveDate>) {
        self.start_date = date;
        self.invalidate();
    }

    /// Appends a blank activity and returns its id.
    ///
    /// # Errors
    /// `StoreError::IdSpaceExhausted` once `i32::MAX` has been handed out or
    /// inserted; ids are never wrapped or reused.
    pub fn add_activity(&mut self) -> Result<i32, StoreError> {
        let id = self
            .last_id
            .checked_add(1)
            .ok_or(StoreError::IdSpaceExhausted(self.last_id))?;
        self.last_id = id;
        self.activities.push(Activity::new(id));
        self.invalidate();
        Ok(id)
    }

    /// Appends a fully specified activity, keeping its id.
    pub fn insert_activity(&mut self, activity: Activity) -> Result<i32, StoreError> {
        if self.activity(activity.id).is_some() {
            return Err(StoreError::DuplicateId(activity.id));
        }
        let id = activity.id;
        self.last_id = self.last_id.max(id);
        self.activities.push(activity);
        self.invalidate();
        Ok(id)
    }

    /// Replaces the whole activity set, e.g. when a saved project is loaded.
    pub fn set_activities(&mut self, activities: Vec<Activity>) -> Result<(), StoreError> {
        if let Some(id) = find_duplicate_id(&activities) {
            return Err(StoreError::DuplicateId(id));
        }
        let highest = activities.iter().map(|a| a.id).max().unwrap_or(0);
        self.last_id = self.last_id.max(highest);
        self.activities = activities;
        self.invalidate();
        Ok(())
    }

    pub fn update_activity(&mut self, id: i32, patch: ActivityPatch) -> Result<(), StoreError> {
        let activity = self
            .activities
            .iter_mut()
            .find(|activity| activity.id == id)
            .ok_or(StoreError::ActivityNotFound(id))?;
        activity.apply(patch);
        self.invalidate();
        Ok(())
    }

    /// Renames an activity and rewrites every dependency that referenced the old name.
    pub fn rename_activity(&mut self, id: i32, new_name: impl Into<String>) -> Result<(), StoreError> {
        let new_name = new_name.into();
        let old_name = self
            .activity(id)
            .map(|activity| activity.name.clone())
            .ok_or(StoreError::ActivityNotFound(id))?;

        for activity in &mut self.activities {
            if activity.id == id {
                activity.name = new_name.clone();
            } else {
                for dependency in &mut activity.dependencies {
                    if *dependency == old_name {
                        *dependency = new_name.clone();
                    }
                }
            }
        }
        debug!(id, from = %old_name, to = %new_name, "renamed activity");
        self.invalidate();
        Ok(())
    }

    /// Removes an activity. References to it in other activities are left in
    /// place and will fail the next computation as unresolved.
    pub fn delete_activity(&mut self, id: i32) -> bool {
        let before = self.activities.len();
        self.activities.retain(|activity| activity.id != id);
        let removed = self.activities.len() != before;
        if removed {
            self.invalidate();
        }
        removed
    }

    /// Removes an activity and strips its name from every dependency list.
    pub fn delete_activity_and_references(&mut self, id: i32) -> bool {
        let Some(name) = self.activity(id).map(|activity| activity.name.clone()) else {
            return false;
        };
        self.activities.retain(|activity| activity.id != id);
        for activity in &mut self.activities {
            activity.dependencies.retain(|dependency| *dependency != name);
        }
        self.invalidate();
        true
    }

    /// Field issues for every activity that has any, in activity order.
    pub fn field_issues(&self) -> Vec<(i32, Vec<FieldIssue>)> {
        self.activities
            .iter()
            .map(|activity| (activity.id, validate_activity(activity)))
            .filter(|(_, issues)| !issues.is_empty())
            .collect()
    }

    /// The most recent successful snapshot, kept across later failures.
    pub fn last_valid_snapshot(&self) -> Option<Arc<ScheduleSnapshot>> {
        self.last_valid.clone()
    }

    /// Returns the schedule for the current state, recomputing if anything changed.
    pub fn get_schedule(&mut self) -> Result<ScheduleView, ScheduleError> {
        if let Some(cached) = &self.cached {
            return cached.clone();
        }
        let result = self.recompute();
        self.cached = Some(result.clone());
        result
    }

    pub fn get_pert_statistics(&mut self) -> Result<Option<PertStatistics>, ScheduleError> {
        let view = self.get_schedule()?;
        Ok(view.snapshot().map(|snapshot| snapshot.pert.clone()))
    }

    fn recompute(&mut self) -> Result<ScheduleView, ScheduleError> {
        let Some(start_date) = self.start_date else {
            return Ok(ScheduleView::NotComputable(NotComputableReason::MissingStartDate));
        };
        if self.activities.is_empty() {
            return Ok(ScheduleView::NotComputable(NotComputableReason::NoActivities));
        }

        let computed = compute_schedule(&self.activities, start_date, &self.config).and_then(
            |schedule| {
                let pert = compute_pert_statistics(
                    &self.activities,
                    &schedule,
                    &self.config.confidence_levels,
                )?;
                Ok(ScheduleSnapshot { schedule, pert })
            },
        );

        match computed {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                info!(
                    activities = self.activities.len(),
                    project_duration = snapshot.schedule.project_duration,
                    "schedule recomputed"
                );
                self.last_valid = Some(Arc::clone(&snapshot));
                Ok(ScheduleView::Computed(snapshot))
            }
            Err(err) => {
                warn!(error = %err, "schedule computation failed");
                Err(err)
            }
        }
    }
}
