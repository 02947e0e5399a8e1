//! Critical Path Method: ties graph construction, ordering and both passes
//! into a single deterministic computation.

use crate::activity::Activity;
use crate::activity_validation::validate_activity;
use crate::calculations::{BackwardPass, ForwardPass};
use crate::calendar::BusinessCalendar;
use crate::config::EngineConfig;
use crate::error::ScheduleError;
use crate::graph::{DependencyGraph, topological_order};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Derived timing for one activity. Offsets are whole days from project start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleNode {
    pub id: i32,
    pub name: String,
    pub duration: i64,
    pub early_start: i64,
    pub early_finish: i64,
    pub late_start: i64,
    pub late_finish: i64,
    pub slack: i64,
    pub is_on_critical_path: bool,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSchedule {
    pub start_date: NaiveDate,
    pub project_duration: i64,
    /// One node per activity, in input order.
    pub nodes: Vec<ScheduleNode>,
    /// Ids of zero-slack activities ordered by early start, then topological position.
    pub critical_path: Vec<i32>,
    /// Ids in the order the passes processed them.
    pub topological_order: Vec<i32>,
    /// Calendar date on which the last activity finishes.
    pub finish_date: NaiveDate,
}

impl ProjectSchedule {
    pub fn node(&self, id: i32) -> Option<&ScheduleNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn node_by_name(&self, name: &str) -> Option<&ScheduleNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    /// Critical nodes in critical-path order.
    pub fn critical_nodes(&self) -> Vec<&ScheduleNode> {
        self.critical_path
            .iter()
            .filter_map(|id| self.node(*id))
            .collect()
    }

    pub fn critical_path_names(&self) -> Vec<String> {
        self.critical_nodes()
            .into_iter()
            .map(|node| node.name.clone())
            .collect()
    }

    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary {
            activity_count: self.nodes.len(),
            critical_count: self.critical_path.len(),
            critical_path: self.critical_path.clone(),
            project_duration: self.project_duration,
            finish_date: self.finish_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub activity_count: usize,
    pub critical_count: usize,
    pub critical_path: Vec<i32>,
    pub project_duration: i64,
    pub finish_date: NaiveDate,
}

impl ScheduleSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.activity_count));
        parts.push(format!("critical={}", self.critical_count));
        parts.push(format!("duration={}", self.project_duration));
        parts.push(format!("finish={}", self.finish_date));
        if !self.critical_path.is_empty() {
            let chain = self
                .critical_path
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("->");
            parts.push(format!("crit_path={}", chain));
        }
        parts.join(", ")
    }
}

/// Computes ES/EF/LS/LF, slack and the critical path for `activities`.
///
/// # Errors
/// Any structural problem (duplicate names, self or unresolved references,
/// cycles) fails the whole computation; no partial schedule is returned.
/// Durations that push offsets or dates out of range fail with
/// `DateOutOfRange` instead of panicking.
/// With `enforce_field_validation` set, field issues fail it as well.
pub fn compute_schedule(
    activities: &[Activity],
    project_start: NaiveDate,
    config: &EngineConfig,
) -> Result<ProjectSchedule, ScheduleError> {
    if config.enforce_field_validation {
        for activity in activities {
            let issues = validate_activity(activity);
            if !issues.is_empty() {
                return Err(ScheduleError::InvalidActivity {
                    id: activity.id,
                    issues,
                });
            }
        }
    }

    let graph = DependencyGraph::build(activities, config.unresolved_dependencies)?;
    let order = topological_order(&graph)?;

    let calendar = BusinessCalendar::new();
    let early = ForwardPass::new(&graph, &calendar).execute(&order, project_start)?;
    let project_duration = early.iter().map(|t| t.early_finish).max().unwrap_or(0);
    let late = BackwardPass::new(&graph).execute(&order, &early, project_duration)?;

    let finish_date = calendar
        .add_business_days(project_start, project_duration)
        .ok_or_else(|| ScheduleError::DateOutOfRange {
            activity: graph
                .node_indices()
                .find(|ix| early[ix.index()].early_finish == project_duration)
                .map(|ix| graph.activity(ix).name.clone())
                .unwrap_or_default(),
        })?;

    let nodes: Vec<ScheduleNode> = graph
        .node_indices()
        .map(|node_ix| {
            let activity = graph.activity(node_ix);
            let e = early[node_ix.index()];
            let l = late[node_ix.index()];
            let slack = l.late_start.checked_sub(e.early_start).ok_or_else(|| {
                ScheduleError::DateOutOfRange {
                    activity: activity.name.clone(),
                }
            })?;
            Ok(ScheduleNode {
                id: activity.id,
                name: activity.name.clone(),
                duration: e.duration,
                early_start: e.early_start,
                early_finish: e.early_finish,
                late_start: l.late_start,
                late_finish: l.late_finish,
                slack,
                is_on_critical_path: slack == 0,
                start_date: e.start_date,
                end_date: e.end_date,
            })
        })
        .collect::<Result<_, ScheduleError>>()?;

    let mut critical: Vec<(i64, usize, i32)> = order
        .iter()
        .enumerate()
        .map(|(position, node_ix)| (position, &nodes[node_ix.index()]))
        .filter(|(_, node)| node.is_on_critical_path)
        .map(|(position, node)| (node.early_start, position, node.id))
        .collect();
    critical.sort();
    let critical_path: Vec<i32> = critical.into_iter().map(|(_, _, id)| id).collect();

    let topological_order = order
        .iter()
        .map(|node_ix| graph.activity(*node_ix).id)
        .collect();

    debug!(
        project_duration,
        critical = critical_path.len(),
        "schedule computed"
    );

    Ok(ProjectSchedule {
        start_date: project_start,
        project_duration,
        nodes,
        critical_path,
        topological_order,
        finish_date,
    })
}
