use crate::activity::Activity;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityField {
    Name,
    Optimistic,
    MostLikely,
    Pessimistic,
    /// The ordering constraint spanning all three estimates.
    Times,
}

impl ActivityField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityField::Name => "name",
            ActivityField::Optimistic => "optimistic",
            ActivityField::MostLikely => "mostLikely",
            ActivityField::Pessimistic => "pessimistic",
            ActivityField::Times => "times",
        }
    }
}

impl fmt::Display for ActivityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advisory, per-field problem with an activity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: ActivityField,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: ActivityField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn check_estimate(field: ActivityField, value: f64, issues: &mut Vec<FieldIssue>) {
    if !value.is_finite() {
        issues.push(FieldIssue::new(field, format!("must be a finite number (got {value})")));
    } else if value < 0.0 {
        issues.push(FieldIssue::new(field, format!("must not be negative (got {value})")));
    }
}

/// Returns every field-level problem with `activity`; empty means valid.
pub fn validate_activity(activity: &Activity) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    if activity.name.trim().is_empty() {
        issues.push(FieldIssue::new(ActivityField::Name, "activity name is required"));
    }

    check_estimate(ActivityField::Optimistic, activity.optimistic, &mut issues);
    check_estimate(ActivityField::MostLikely, activity.most_likely, &mut issues);
    check_estimate(ActivityField::Pessimistic, activity.pessimistic, &mut issues);

    if !(activity.optimistic <= activity.most_likely && activity.most_likely <= activity.pessimistic) {
        issues.push(FieldIssue::new(
            ActivityField::Times,
            format!(
                "times must be in order: optimistic <= most likely <= pessimistic (got {} / {} / {})",
                activity.optimistic, activity.most_likely, activity.pessimistic
            ),
        ));
    }

    issues
}

/// Checks that ids are unique; returns the first duplicate.
pub fn find_duplicate_id(activities: &[Activity]) -> Option<i32> {
    let mut seen = HashSet::with_capacity(activities.len());
    activities
        .iter()
        .find(|activity| !seen.insert(activity.id))
        .map(|activity| activity.id)
}
