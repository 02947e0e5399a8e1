use super::forward_pass::EarlyTimes;
use crate::error::ScheduleError;
use crate::graph::DependencyGraph;
use petgraph::graph::NodeIndex;
use tracing::debug;

/// Latest times for one activity as day offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LateTimes {
    pub late_start: i64,
    pub late_finish: i64,
}

pub struct BackwardPass<'g, 'a> {
    graph: &'g DependencyGraph<'a>,
}

impl<'g, 'a> BackwardPass<'g, 'a> {
    pub fn new(graph: &'g DependencyGraph<'a>) -> Self {
        Self { graph }
    }

    /// Runs the pass in reverse `order`, anchoring sinks at `project_duration`.
    ///
    /// `early` is the forward-pass result indexed by node index.
    ///
    /// # Errors
    /// `ScheduleError::DateOutOfRange` when `LF - duration` overflows, which
    /// only happens with extreme negative durations.
    pub fn execute(
        &self,
        order: &[NodeIndex],
        early: &[EarlyTimes],
        project_duration: i64,
    ) -> Result<Vec<LateTimes>, ScheduleError> {
        let mut late: Vec<Option<LateTimes>> = vec![None; self.graph.len()];

        for &node_ix in order.iter().rev() {
            // LF is the earliest LS among dependents; sinks finish with the project
            let late_finish = self
                .graph
                .dependents(node_ix)
                .filter_map(|succ_ix| late[succ_ix.index()].map(|times| times.late_start))
                .min()
                .unwrap_or(project_duration);
            let late_start = late_finish
                .checked_sub(early[node_ix.index()].duration)
                .ok_or_else(|| ScheduleError::DateOutOfRange {
                    activity: self.graph.activity(node_ix).name.clone(),
                })?;

            late[node_ix.index()] = Some(LateTimes {
                late_start,
                late_finish,
            });
        }

        debug!(project_duration, "backward pass complete");
        Ok(late.into_iter().flatten().collect())
    }
}
