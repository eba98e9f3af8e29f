use std::path::Path;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use uartlog_capture::SessionStats;
use uartlog_port::PortSummary;

#[derive(Clone, Debug, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    #[default]
    Pretty,
    Raw,
}

#[derive(Serialize)]
struct PortOutput<'a> {
    name: &'a str,
    kind: &'a str,
    vid: Option<String>,
    pid: Option<String>,
    product: Option<&'a str>,
}

impl<'a> From<&'a PortSummary> for PortOutput<'a> {
    fn from(port: &'a PortSummary) -> Self {
        Self {
            name: &port.name,
            kind: port.kind,
            vid: port.vid.map(|vid| format!("{vid:04x}")),
            pid: port.pid.map(|pid| format!("{pid:04x}")),
            product: port.product.as_deref(),
        }
    }
}

pub fn print_ports(ports: &[PortSummary], format: OutputFormat) {
    let rows: Vec<PortOutput<'_>> = ports.iter().map(PortOutput::from).collect();
    match format {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Table => {
            let mut table = new_table(vec!["PORT", "TYPE", "VID", "PID", "PRODUCT"]);
            for row in &rows {
                table.add_row(vec![
                    row.name.to_string(),
                    row.kind.to_string(),
                    row.vid.clone().unwrap_or_default(),
                    row.pid.clone().unwrap_or_default(),
                    row.product.unwrap_or_default().to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            if rows.is_empty() {
                println!("no serial ports found");
            }
            for row in &rows {
                match (&row.vid, &row.pid) {
                    (Some(vid), Some(pid)) => println!(
                        "{} ({} {vid}:{pid}) {}",
                        row.name,
                        row.kind,
                        row.product.unwrap_or_default()
                    ),
                    _ => println!("{} ({})", row.name, row.kind),
                }
            }
        }
        OutputFormat::Raw => {
            for row in &rows {
                println!("{}", row.name);
            }
        }
    }
}

/// Result of processing one `pretty` argument.
#[derive(Serialize)]
pub struct PrettyOutcome {
    pub input: String,
    pub output: Option<String>,
    pub lines: Option<usize>,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PrettyOutcome {
    pub fn written(input: &Path, output: &Path, lines: usize) -> Self {
        Self {
            input: file_name(input),
            output: Some(file_name(output)),
            lines: Some(lines),
            status: "ok",
            error: None,
        }
    }

    pub fn skipped(arg: &str) -> Self {
        Self {
            input: arg.to_string(),
            output: None,
            lines: None,
            status: "skipped",
            error: None,
        }
    }

    pub fn failed(input: &Path, error: String) -> Self {
        Self {
            input: input.display().to_string(),
            output: None,
            lines: None,
            status: "error",
            error: Some(error),
        }
    }
}

/// Print one outcome as soon as it is known (line-oriented formats only).
pub fn print_pretty_outcome(outcome: &PrettyOutcome, format: OutputFormat) {
    match format {
        OutputFormat::Pretty | OutputFormat::Raw => match outcome.status {
            "ok" => println!(
                "{} -> {} ({} lines)",
                outcome.input,
                outcome.output.as_deref().unwrap_or_default(),
                outcome.lines.unwrap_or_default()
            ),
            "skipped" => println!("Skip: {}", outcome.input),
            _ => println!(
                "Error: {}: {}",
                outcome.input,
                outcome.error.as_deref().unwrap_or_default()
            ),
        },
        OutputFormat::Json => print_json(outcome),
        OutputFormat::Table => {}
    }
}

/// Print the collected outcomes (table format only).
pub fn print_pretty_summary(outcomes: &[PrettyOutcome], format: OutputFormat) {
    if !matches!(format, OutputFormat::Table) {
        return;
    }
    let mut table = new_table(vec!["INPUT", "OUTPUT", "LINES", "STATUS"]);
    for outcome in outcomes {
        table.add_row(vec![
            outcome.input.clone(),
            outcome.output.clone().unwrap_or_default(),
            outcome.lines.map(|n| n.to_string()).unwrap_or_default(),
            outcome
                .error
                .clone()
                .unwrap_or_else(|| outcome.status.to_string()),
        ]);
    }
    println!("{table}");
}

#[derive(Serialize)]
struct CaptureSummary<'a> {
    ports: &'a [String],
    log: String,
    records: u64,
    packets: u64,
    idle_flushes: u64,
}

/// Session totals; only structured formats print them, since stdout carries
/// the live capture lines otherwise.
pub fn print_capture_summary(ports: &[String], log: &Path, stats: &SessionStats, format: OutputFormat) {
    let summary = CaptureSummary {
        ports,
        log: log.display().to_string(),
        records: stats.records,
        packets: stats.packets,
        idle_flushes: stats.idle_flushes,
    };
    match format {
        OutputFormat::Json => print_json(&summary),
        OutputFormat::Table => {
            let mut table = new_table(vec!["PORTS", "LOG", "RECORDS", "PACKETS"]);
            table.add_row(vec![
                summary.ports.join(","),
                summary.log.clone(),
                summary.records.to_string(),
                summary.packets.to_string(),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {}
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
