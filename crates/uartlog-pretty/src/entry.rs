use std::sync::OnceLock;

use chrono::{NaiveTime, Timelike};
use regex::Regex;

/// One captured byte from a per-byte log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub channel: char,
    /// Timestamp exactly as written in the log.
    pub wall_time: String,
    /// Milliseconds since midnight.
    pub millis: u32,
    pub byte: u8,
}

fn line_regex() -> &'static Regex {
    static LINE: OnceLock<Regex> = OnceLock::new();
    LINE.get_or_init(|| {
        Regex::new(r"^([A-Za-z])\s+(\d\d:\d\d:\d\d\.\d+)\s+([0-9A-Fa-f]{2})$")
            .expect("log line pattern should compile")
    })
}

/// Parse a single log line. Returns `None` for anything that is not a
/// well-formed per-byte entry.
pub fn parse_line(line: &str) -> Option<LogEntry> {
    let caps = line_regex().captures(line.trim())?;
    let channel = caps[1].chars().next()?;
    let wall_time = caps[2].to_string();
    let millis = millis_of_day(&wall_time)?;
    let byte = u8::from_str_radix(&caps[3], 16).ok()?;

    Some(LogEntry {
        channel,
        wall_time,
        millis,
        byte,
    })
}

/// Parse every well-formed line of a log, in file order.
pub fn parse_entries(text: &str) -> Vec<LogEntry> {
    text.lines().filter_map(parse_line).collect()
}

fn millis_of_day(wall_time: &str) -> Option<u32> {
    let time = NaiveTime::parse_from_str(wall_time, "%H:%M:%S%.f").ok()?;
    Some(time.num_seconds_from_midnight() * 1000 + time.nanosecond() / 1_000_000)
}
