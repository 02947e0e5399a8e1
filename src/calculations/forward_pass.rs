use crate::calendar::BusinessCalendar;
use crate::error::ScheduleError;
use crate::graph::DependencyGraph;
use chrono::NaiveDate;
use petgraph::graph::NodeIndex;
use tracing::debug;

/// Earliest times for one activity, as day offsets plus projected dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EarlyTimes {
    pub duration: i64,
    pub early_start: i64,
    pub early_finish: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

pub struct ForwardPass<'g, 'a> {
    graph: &'g DependencyGraph<'a>,
    calendar: &'g BusinessCalendar,
}

impl<'g, 'a> ForwardPass<'g, 'a> {
    pub fn new(graph: &'g DependencyGraph<'a>, calendar: &'g BusinessCalendar) -> Self {
        Self { graph, calendar }
    }

    /// Runs the pass over `order`, which must be a topological order of the graph.
    ///
    /// The result is indexed by node index.
    ///
    /// # Errors
    /// `ScheduleError::DateOutOfRange` when an offset overflows or a date
    /// falls outside the representable range.
    pub fn execute(
        &self,
        order: &[NodeIndex],
        project_start: NaiveDate,
    ) -> Result<Vec<EarlyTimes>, ScheduleError> {
        let mut early: Vec<Option<EarlyTimes>> = vec![None; self.graph.len()];

        for &node_ix in order {
            let activity = self.graph.activity(node_ix);
            let out_of_range = || ScheduleError::DateOutOfRange {
                activity: activity.name.clone(),
            };
            let duration = activity.expected_duration();

            // ES is the latest EF among dependencies; already computed thanks to the order
            let early_start = self
                .graph
                .dependencies(node_ix)
                .filter_map(|dep_ix| early[dep_ix.index()].map(|times| times.early_finish))
                .max()
                .unwrap_or(0);
            let early_finish = early_start.checked_add(duration).ok_or_else(out_of_range)?;

            let start_date = self
                .calendar
                .add_business_days(project_start, early_start)
                .ok_or_else(out_of_range)?;
            let end_date = self
                .calendar
                .add_business_days(start_date, duration)
                .ok_or_else(out_of_range)?;

            early[node_ix.index()] = Some(EarlyTimes {
                duration,
                early_start,
                early_finish,
                start_date,
                end_date,
            });
        }

        let results: Vec<EarlyTimes> = early.into_iter().flatten().collect();
        debug!(
            activities = results.len(),
            finish = results.iter().map(|t| t.early_finish).max().unwrap_or(0),
            "forward pass complete"
        );
        Ok(results)
    }
}
