use pert_cpm::{ActivityNetwork, ActivityReport, PertEstimator, ScheduleError};
use std::io::{self, Write};
use tracing_subscriber::{EnvFilter, fmt};

fn parse_dep_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|dep| !dep.is_empty())
        .map(str::to_string)
        .collect()
}

/// Two decimals, trailing zeros dropped.
fn fmt_num(value: f64) -> String {
    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(fmt_num).unwrap_or_default()
}

fn report_cells(report: &ActivityReport) -> Vec<String> {
    vec![
        report.name.clone(),
        fmt_num(report.duration),
        report.dependencies.join(","),
        fmt_opt(report.earliest_start),
        fmt_opt(report.earliest_finish),
        fmt_opt(report.latest_start),
        fmt_opt(report.latest_finish),
        fmt_opt(report.slack),
        if report.is_critical { "yes".into() } else { String::new() },
    ]
}

fn render_row(widths: &[usize], cells: &[&str]) -> String {
    let mut line = String::from("|");
    for (ci, cell) in cells.iter().enumerate() {
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(widths[ci].saturating_sub(cell.len())));
        line.push_str(" |");
    }
    line
}

fn render_network_as_text_table(network: &ActivityNetwork) -> String {
    let headers = [
        "name",
        "duration",
        "dependencies",
        "earliest_start",
        "earliest_finish",
        "latest_start",
        "latest_finish",
        "slack",
        "critical",
    ];
    let rows: Vec<Vec<String>> = network.reports().iter().map(report_cells).collect();

    // Compute column widths
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.len());
        }
    }

    // Build horizontal separator
    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&widths, &headers));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&render_row(&widths, &cells));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show the activity network\n  add <name> <duration> [deps_csv]   Add an activity (deps like A,B)\n  dep <name> <dependency>            Make <name> depend on <dependency>\n  delete <name>                      Delete an activity and clean up dependencies\n  compute                            Compute the critical path (CPM)\n  clear                              Remove every activity\n  pert add <name> <o> <m> <p>        Add a PERT task with three-point estimates\n  pert show                          Show PERT aggregates and completion probabilities\n  pert target <time|default>         Evaluate probabilities against a target time\n  pert clear                         Remove every PERT task\n  quit|exit                          Exit"
    );
}

fn print_error(context: &str, err: &ScheduleError) {
    println!("{context} [{}] ({}): {err}", err.kind(), err.subject());
}

fn print_pert(estimator: &PertEstimator, target: Option<f64>) {
    if estimator.is_empty() {
        println!("No PERT tasks.");
        return;
    }
    let summary = match target {
        Some(target) => estimator.summary_against(target),
        None => estimator.summary(),
    };
    match summary {
        Ok(summary) => {
            println!("PERT Project Time: {}", fmt_num(summary.project_expected));
            println!(
                "Variance of Total Project: {}",
                fmt_num(summary.project_variance)
            );
            println!(
                "Standard Deviation: {}",
                fmt_num(summary.project_standard_deviation)
            );
            println!(
                "Probability of Completion (target {}):",
                fmt_num(summary.target_time)
            );
            for entry in &summary.per_task_probability {
                println!("  {}: {}", entry.name, fmt_num(entry.probability));
            }
        }
        Err(e) => print_error("PERT error", &e),
    }
}

fn handle_pert<'a>(
    estimator: &mut PertEstimator,
    target: &mut Option<f64>,
    mut parts: impl Iterator<Item = &'a str>,
) {
    match parts.next() {
        Some("add") => {
            let name = parts.next();
            let estimates: Vec<Option<f64>> =
                (0..3).map(|_| parts.next().and_then(|v| v.parse().ok())).collect();
            match (name, estimates.as_slice()) {
                (Some(name), [Some(o), Some(m), Some(p)]) => {
                    match estimator.add_task(name, *o, *m, *p) {
                        Ok(task) => println!(
                            "Task '{}' added (expected={}, variance={}).",
                            task.name(),
                            fmt_num(task.expected()),
                            fmt_num(task.variance())
                        ),
                        Err(e) => print_error("Error", &e),
                    }
                }
                _ => println!("Usage: pert add <name> <optimistic> <most_likely> <pessimistic>"),
            }
        }
        Some("show") => print_pert(estimator, *target),
        Some("target") => match parts.next() {
            Some("default") => {
                *target = None;
                println!("Target reset to project expected time.");
            }
            Some(value) => match value.parse::<f64>() {
                Ok(value) => {
                    *target = Some(value);
                    println!("Target set to {}.", fmt_num(value));
                }
                Err(_) => println!("Invalid target time"),
            },
            None => println!("Usage: pert target <time|default>"),
        },
        Some("clear") => {
            estimator.clear();
            println!("PERT tasks cleared.");
        }
        _ => println!("Usage: pert <add|show|target|clear> ..."),
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let mut network = ActivityNetwork::new();
    let mut estimator = PertEstimator::new();
    let mut pert_target: Option<f64> = None;

    println!("CPM/PERT Calculator (CLI) - type 'help' for commands\n");

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
            "show" => println!("{}", render_network_as_text_table(&network)),
            "add" => {
                let name_s = parts.next();
                let dur_s = parts.next();
                let deps = parts.next().map(parse_dep_list).unwrap_or_default();
                match (name_s, dur_s) {
                    (Some(name), Some(dur_s)) => {
                        let duration: f64 = match dur_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid duration");
                                continue;
                            }
                        };
                        match network.add_named(name, duration, &deps) {
                            Ok(_) => {
                                println!("Activity '{name}' added.");
                                println!("{}", render_network_as_text_table(&network));
                            }
                            Err(e) => print_error("Error", &e),
                        }
                    }
                    _ => println!("Usage: add <name> <duration> [deps_csv]"),
                }
            }
            "dep" => match (parts.next(), parts.next()) {
                (Some(name), Some(dependency)) => {
                    match network.add_dependency_by_name(name, dependency) {
                        Ok(()) => println!("'{name}' now depends on '{dependency}'."),
                        Err(e) => print_error("Error", &e),
                    }
                }
                _ => println!("Usage: dep <name> <dependency>"),
            },
            "delete" => match parts.next() {
                Some(name) => {
                    if network.remove_activity(name) {
                        println!("Deleted activity {name}.");
                        println!("{}", render_network_as_text_table(&network));
                    } else {
                        println!("Activity {name} not found.");
                    }
                }
                None => println!("Usage: delete <name>"),
            },
            "compute" => {
                if network.is_empty() {
                    println!("Please add activities before calculating CPM.");
                    continue;
                }
                match network.compute() {
                    Ok(summary) => {
                        println!("Critical Path: {}", summary.critical_path.join(" -> "));
                        println!("CPM Time: {}", fmt_num(summary.total_duration));
                        println!(
                            "Computed ({})\n{}",
                            summary.to_cli_summary(),
                            render_network_as_text_table(&network)
                        );
                    }
                    Err(e) => print_error("CPM error", &e),
                }
            }
            "clear" => {
                network.clear();
                println!("Network cleared.");
            }
            "pert" => handle_pert(&mut estimator, &mut pert_target, parts),
            _ => println!("Unknown command '{cmd}'. Type 'help' for commands."),
        }
    }
}
