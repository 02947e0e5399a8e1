use chrono::NaiveDate;
use pert_schedule::persistence::{
    ProjectFile, export_schedule_to_csv, import_activities_from_csv, load_config_from_json,
    load_project_from_json, save_project_to_json,
};
use pert_schedule::{
    ActivityPatch, NotComputableReason, PertStatistics, ProjectSchedule, ScheduleView,
    SchedulingStore,
};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "PERT_SCHEDULE_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn parse_name_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn render_row<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    let mut line = String::from("|");
    for (ci, cell) in cells.enumerate() {
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(widths[ci].saturating_sub(cell.len())));
        line.push_str(" |");
    }
    line
}

fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            if cell.len() > widths[ci] {
                widths[ci] = cell.len();
            }
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&widths, headers.iter().copied()));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(&widths, row.iter().map(String::as_str)));
        out.push('\n');
    }
    out.push_str(&sep);
    out
}

fn render_activities(store: &SchedulingStore) -> String {
    let rows: Vec<Vec<String>> = store
        .activities()
        .iter()
        .map(|a| {
            vec![
                a.id.to_string(),
                a.name.clone(),
                a.optimistic.to_string(),
                a.most_likely.to_string(),
                a.pessimistic.to_string(),
                a.dependencies.join(","),
            ]
        })
        .collect();
    let mut out = render_text_table(
        &["id", "name", "optimistic", "most_likely", "pessimistic", "dependencies"],
        &rows,
    );
    for (id, issues) in store.field_issues() {
        for issue in issues {
            out.push_str(&format!("\n  activity {id}: {issue}"));
        }
    }
    out
}

fn render_schedule(schedule: &ProjectSchedule) -> String {
    let rows: Vec<Vec<String>> = schedule
        .nodes
        .iter()
        .map(|n| {
            vec![
                n.id.to_string(),
                n.name.clone(),
                n.duration.to_string(),
                n.early_start.to_string(),
                n.early_finish.to_string(),
                n.late_start.to_string(),
                n.late_finish.to_string(),
                n.slack.to_string(),
                if n.is_on_critical_path { "yes" } else { "no" }.to_string(),
                n.start_date.to_string(),
                n.end_date.to_string(),
            ]
        })
        .collect();
    render_text_table(
        &[
            "id", "name", "duration", "es", "ef", "ls", "lf", "slack", "critical", "start", "end",
        ],
        &rows,
    )
}

fn render_pert(stats: &PertStatistics) -> String {
    let mut lines = vec![
        format!("Expected duration: {} days", stats.project_duration),
        format!("Total variance: {:.3}", stats.total_variance),
        format!("Standard deviation: {:.3}", stats.standard_deviation),
        format!("95% interval: +/- {:.2} days", stats.confidence_interval_95),
    ];
    if let Some((min, max)) = stats.duration_range {
        lines.push(format!("Duration range: {min} - {max} days"));
    }
    for entry in &stats.probability_table {
        lines.push(format!(
            "P{}: {:.2} days",
            entry.confidence_level, entry.estimated_duration
        ));
    }
    lines.join("\n")
}

fn not_computable_message(reason: NotComputableReason) -> &'static str {
    match reason {
        NotComputableReason::MissingStartDate => "Not computable: set a project start date",
        NotComputableReason::NoActivities => "Not computable: add at least one activity",
    }
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show activities and field issues\n  new                                Append empty activity with next id\n  name    <id> <text...>             Set name (dependency references unchanged)\n  rename  <id> <text...>             Rename and rewrite references to it\n  est     <id> <o> <m> <p>           Set three-point estimates\n  deps    <id> [csv]                 Set dependencies by name (e.g. A,B)\n  delete  <id>                       Delete activity, keep references to it\n  purge   <id>                       Delete activity and references to it\n  start   <YYYY-MM-DD|none>          Set or clear project start date\n  compute                            Compute the critical path schedule\n  pert                               Show PERT statistics\n  summary                            One-line schedule summary\n  save json <path>                   Save project to JSON\n  load json <path>                   Load project from JSON\n  import csv <path>                  Replace activities from CSV\n  export csv <path>                  Export computed schedule to CSV\n  config  <json_path>                Load engine configuration\n  quit|exit                          Exit"
    );
}

fn parse_id(s: Option<&str>) -> Option<i32> {
    s.and_then(|v| v.parse().ok())
}

fn computed(store: &mut SchedulingStore) -> Option<ScheduleView> {
    match store.get_schedule() {
        Ok(ScheduleView::NotComputable(reason)) => {
            println!("{}", not_computable_message(reason));
            None
        }
        Ok(view) => Some(view),
        Err(e) => {
            println!("Error: {}", e);
            None
        }
    }
}

fn main() {
    init_tracing();
    let mut store = SchedulingStore::new();

    println!("PERT Scheduler (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => println!("{}", render_activities(&store)),
            "new" => match store.add_activity() {
                Ok(id) => {
                    println!("Added activity id={}", id);
                    println!("{}", render_activities(&store));
                }
                Err(e) => println!("Error: {}", e),
            },
            "name" | "rename" => {
                let id = parse_id(parts.next());
                let text = parts.collect::<Vec<_>>().join(" ");
                let Some(id) = id else {
                    println!("Usage: {} <id> <text...>", cmd);
                    continue;
                };
                let res = if cmd == "name" {
                    store.update_activity(id, ActivityPatch::name(text))
                } else {
                    store.rename_activity(id, text)
                };
                match res {
                    Ok(()) => println!("Activity {} renamed.\n{}", id, render_activities(&store)),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "est" => {
                let id = parse_id(parts.next());
                let values: Vec<f64> = parts.filter_map(|v| v.parse().ok()).collect();
                match (id, values.as_slice()) {
                    (Some(id), &[o, m, p]) => {
                        match store.update_activity(id, ActivityPatch::estimates(o, m, p)) {
                            Ok(()) => {
                                println!("Estimates set.\n{}", render_activities(&store))
                            }
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => println!("Usage: est <id> <o> <m> <p>"),
                }
            }
            "deps" => {
                let Some(id) = parse_id(parts.next()) else {
                    println!("Usage: deps <id> [csv]");
                    continue;
                };
                let names = parse_name_list(&parts.collect::<Vec<_>>().join(" "));
                match store.update_activity(id, ActivityPatch::dependencies(names)) {
                    Ok(()) => println!("Dependencies set.\n{}", render_activities(&store)),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "delete" | "purge" => {
                let Some(id) = parse_id(parts.next()) else {
                    println!("Usage: {} <id>", cmd);
                    continue;
                };
                let removed = if cmd == "delete" {
                    store.delete_activity(id)
                } else {
                    store.delete_activity_and_references(id)
                };
                if removed {
                    println!("Deleted activity {}.", id);
                } else {
                    println!("Activity {} not found.", id);
                }
            }
            "start" => match parts.next() {
                Some("none") => {
                    store.set_start_date(None);
                    println!("Start date cleared.");
                }
                Some(s) => match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                    Ok(date) => {
                        store.set_start_date(Some(date));
                        println!("Start date set to {}.", date);
                    }
                    Err(_) => println!("Invalid date (YYYY-MM-DD)"),
                },
                None => println!("Usage: start <YYYY-MM-DD|none>"),
            },
            "compute" => {
                if let Some(snapshot) = computed(&mut store).as_ref().and_then(|v| v.snapshot()) {
                    println!(
                        "Computed ({})\n{}",
                        snapshot.schedule.summary().to_cli_summary(),
                        render_schedule(&snapshot.schedule)
                    );
                    println!(
                        "Critical path: {}",
                        snapshot.schedule.critical_path_names().join(" -> ")
                    );
                }
            }
            "pert" => {
                if let Some(snapshot) = computed(&mut store).as_ref().and_then(|v| v.snapshot()) {
                    println!("{}", render_pert(&snapshot.pert));
                }
            }
            "summary" => {
                if let Some(snapshot) = computed(&mut store).as_ref().and_then(|v| v.snapshot()) {
                    println!("{}", snapshot.schedule.summary().to_cli_summary());
                }
            }
            "save" | "load" | "import" | "export" => {
                let format = parts.next();
                let path = parts.collect::<Vec<_>>().join(" ");
                if path.is_empty() {
                    println!("Usage: {} <json|csv> <path>", cmd);
                    continue;
                }
                match (cmd, format) {
                    ("save", Some("json")) => match save_project_to_json(&store, &path) {
                        Ok(()) => println!("Project saved to {}", path),
                        Err(e) => println!("Error: {}", e),
                    },
                    ("load", Some("json")) => {
                        let res = load_project_from_json(&path)
                            .and_then(|project: ProjectFile| project.apply_to(&mut store));
                        match res {
                            Ok(()) => {
                                println!("Project loaded from {}\n{}", path, render_activities(&store))
                            }
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    ("import", Some("csv")) => {
                        let res = import_activities_from_csv(&path).and_then(|activities| {
                            store.set_activities(activities).map_err(Into::into)
                        });
                        match res {
                            Ok(()) => println!(
                                "Imported {} activities from {}\n{}",
                                store.activities().len(),
                                path,
                                render_activities(&store)
                            ),
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    ("export", Some("csv")) => {
                        if let Some(view) = computed(&mut store) {
                            if let Some(snapshot) = view.snapshot() {
                                match export_schedule_to_csv(
                                    store.activities(),
                                    &snapshot.schedule,
                                    &path,
                                ) {
                                    Ok(()) => println!("Schedule exported to {}", path),
                                    Err(e) => println!("Error: {}", e),
                                }
                            }
                        }
                    }
                    _ => println!("Unsupported format. Use: save|load json, import|export csv"),
                }
            }
            "config" => {
                let path = parts.collect::<Vec<_>>().join(" ");
                if path.is_empty() {
                    println!("Usage: config <json_path>");
                    continue;
                }
                match load_config_from_json(&path) {
                    Ok(config) => {
                        store.set_config(config);
                        println!("Configuration loaded from {}", path);
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
