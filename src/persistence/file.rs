use super::{PersistenceError, PersistenceResult};
use crate::activity::Activity;
use crate::config::EngineConfig;
use crate::cpm::ProjectSchedule;
use crate::store::SchedulingStore;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::debug;

/// Saved project: the inputs of a schedule, never its derived values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    pub activities: Vec<Activity>,
}

impl ProjectFile {
    pub fn from_store(store: &SchedulingStore) -> Self {
        Self {
            start_date: store.start_date(),
            activities: store.activities().to_vec(),
        }
    }

    /// Replaces the store's activities and start date with this project.
    pub fn apply_to(self, store: &mut SchedulingStore) -> PersistenceResult<()> {
        super::validate_activities(&self.activities)?;
        store.set_activities(self.activities)?;
        store.set_start_date(self.start_date);
        Ok(())
    }
}

pub fn save_project_to_json<P: AsRef<Path>>(
    store: &SchedulingStore,
    path: P,
) -> PersistenceResult<()> {
    let project = ProjectFile::from_store(store);
    super::validate_activities(&project.activities)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &project)?;
    Ok(())
}

pub fn load_project_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<ProjectFile> {
    let file = File::open(path)?;
    let project: ProjectFile = serde_json::from_reader(file)?;
    super::validate_activities(&project.activities)?;
    debug!(activities = project.activities.len(), "loaded project file");
    Ok(project)
}

pub fn load_config_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<EngineConfig> {
    let file = File::open(path)?;
    let config = serde_json::from_reader(file)?;
    Ok(config)
}

/// One activity per row; dependencies are comma-joined inside a single field.
///
/// Names containing a comma or surrounding whitespace cannot survive that
/// field, so both import and export reject them. JSON has no such limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityCsvRecord {
    pub id: i32,
    pub name: String,
    pub optimistic: f64,
    pub most_likely: f64,
    pub pessimistic: f64,
    #[serde(default)]
    pub dependencies: String,
}

impl From<&Activity> for ActivityCsvRecord {
    fn from(activity: &Activity) -> Self {
        Self {
            id: activity.id,
            name: activity.name.clone(),
            optimistic: activity.optimistic,
            most_likely: activity.most_likely,
            pessimistic: activity.pessimistic,
            dependencies: activity.dependencies.join(","),
        }
    }
}

impl From<ActivityCsvRecord> for Activity {
    fn from(record: ActivityCsvRecord) -> Self {
        Activity::with_estimates(
            record.id,
            record.name,
            record.optimistic,
            record.most_likely,
            record.pessimistic,
        )
        .depends_on(split_names(&record.dependencies))
    }
}

pub fn read_activities_csv<R: io::Read>(reader: R) -> PersistenceResult<Vec<Activity>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut activities = Vec::new();
    for record in reader.deserialize::<ActivityCsvRecord>() {
        activities.push(Activity::from(record?));
    }

    if activities.is_empty() {
        return Err(PersistenceError::InvalidData(
            "CSV file contained no activities".into(),
        ));
    }
    super::validate_activities(&activities)?;
    check_csv_names(&activities)?;
    Ok(activities)
}

pub fn import_activities_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<Activity>> {
    let file = File::open(path)?;
    read_activities_csv(file)
}

pub fn export_activities_to_csv<P: AsRef<Path>>(
    activities: &[Activity],
    path: P,
) -> PersistenceResult<()> {
    super::validate_activities(activities)?;
    check_csv_names(activities)?;
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for activity in activities {
        writer.serialize(ActivityCsvRecord::from(activity))?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct ScheduleCsvRecord<'a> {
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Optimistic")]
    optimistic: f64,
    #[serde(rename = "Most Likely")]
    most_likely: f64,
    #[serde(rename = "Pessimistic")]
    pessimistic: f64,
    #[serde(rename = "Expected Duration")]
    expected_duration: i64,
    #[serde(rename = "ES")]
    early_start: i64,
    #[serde(rename = "EF")]
    early_finish: i64,
    #[serde(rename = "LS")]
    late_start: i64,
    #[serde(rename = "LF")]
    late_finish: i64,
    #[serde(rename = "Slack")]
    slack: i64,
    #[serde(rename = "Dependencies")]
    dependencies: String,
    #[serde(rename = "On Critical Path")]
    on_critical_path: &'static str,
    #[serde(rename = "Start Date")]
    start_date: String,
    #[serde(rename = "End Date")]
    end_date: String,
}

/// Writes one row per activity, in input order, joined with its computed node.
pub fn write_schedule_csv<W: io::Write>(
    activities: &[Activity],
    schedule: &ProjectSchedule,
    writer: W,
) -> PersistenceResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for activity in activities {
        let node = schedule.node(activity.id).ok_or_else(|| {
            PersistenceError::InvalidData(format!(
                "activity {} is missing from the computed schedule",
                activity.id
            ))
        })?;
        writer.serialize(ScheduleCsvRecord {
            name: &activity.name,
            optimistic: activity.optimistic,
            most_likely: activity.most_likely,
            pessimistic: activity.pessimistic,
            expected_duration: node.duration,
            early_start: node.early_start,
            early_finish: node.early_finish,
            late_start: node.late_start,
            late_finish: node.late_finish,
            slack: node.slack,
            dependencies: activity.dependencies.join(", "),
            on_critical_path: if node.is_on_critical_path { "Yes" } else { "No" },
            start_date: format_date(node.start_date),
            end_date: format_date(node.end_date),
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn export_schedule_to_csv<P: AsRef<Path>>(
    activities: &[Activity],
    schedule: &ProjectSchedule,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    write_schedule_csv(activities, schedule, file)
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Rejects names that `split_names` would not hand back unchanged.
fn check_csv_names(activities: &[Activity]) -> PersistenceResult<()> {
    let names = activities.iter().flat_map(|activity| {
        std::iter::once(&activity.name).chain(&activity.dependencies)
    });
    for name in names {
        if name.contains(',') || name.trim() != name.as_str() {
            return Err(PersistenceError::InvalidData(format!(
                "name '{name}' cannot be stored in CSV: commas and surrounding whitespace are not allowed"
            )));
        }
    }
    Ok(())
}

fn split_names(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
