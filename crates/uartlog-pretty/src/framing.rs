//! Frame reassembly over per-channel byte sequences.

use std::fmt;
use std::str::FromStr;

use crate::entry::LogEntry;

/// Start-of-frame byte for the delimited scheme.
pub const STX: u8 = 0x02;
/// End-of-frame byte for the delimited scheme.
pub const ETX: u8 = 0x03;
/// Two-byte sync prefix of length-prefixed frames.
pub const SYNC: [u8; 2] = [0xEB, 0x90];
/// Accepted total lengths of a length-prefixed frame.
pub const LENGTH_RANGE: std::ops::RangeInclusive<usize> = 3..=64;

/// How application frames are delimited in a log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramingScheme {
    /// `0x02 ... 0x03` text frames.
    Delimited,
    /// `EB 90 LEN ...` binary frames where LEN counts the whole frame.
    LengthPrefixed,
}

impl FramingScheme {
    /// Pick a scheme from a log file name: `b115200` anywhere in the name
    /// (any case) means length-prefixed.
    pub fn from_file_name(name: &str) -> Self {
        if name.to_lowercase().contains("b115200") {
            FramingScheme::LengthPrefixed
        } else {
            FramingScheme::Delimited
        }
    }
}

impl fmt::Display for FramingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramingScheme::Delimited => f.write_str("delimited"),
            FramingScheme::LengthPrefixed => f.write_str("length-prefixed"),
        }
    }
}

impl FromStr for FramingScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "delimited" => Ok(FramingScheme::Delimited),
            "length-prefixed" => Ok(FramingScheme::LengthPrefixed),
            other => Err(format!("unknown framing scheme: {other}")),
        }
    }
}

/// A reassembled frame, stamped with the time of its first byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub channel: char,
    pub wall_time: String,
    pub millis: u32,
    pub bytes: Vec<u8>,
}

impl Frame {
    fn start(entry: &LogEntry, bytes: Vec<u8>) -> Self {
        Self {
            channel: entry.channel,
            wall_time: entry.wall_time.clone(),
            millis: entry.millis,
            bytes,
        }
    }
}

/// Reassemble frames from parsed entries.
///
/// Channels are processed independently in order of first appearance; the
/// result lists each channel's frames in arrival order and is not yet sorted
/// by time.
pub fn reassemble(entries: &[LogEntry], scheme: FramingScheme) -> Vec<Frame> {
    let mut frames = Vec::new();
    for (_, seq) in by_channel(entries) {
        match scheme {
            FramingScheme::Delimited => delimited(&seq, &mut frames),
            FramingScheme::LengthPrefixed => length_prefixed(&seq, &mut frames),
        }
    }
    frames
}

fn by_channel(entries: &[LogEntry]) -> Vec<(char, Vec<&LogEntry>)> {
    let mut channels: Vec<(char, Vec<&LogEntry>)> = Vec::new();
    for entry in entries {
        match channels.iter_mut().find(|(ch, _)| *ch == entry.channel) {
            Some((_, seq)) => seq.push(entry),
            None => channels.push((entry.channel, vec![entry])),
        }
    }
    channels
}

fn delimited(seq: &[&LogEntry], out: &mut Vec<Frame>) {
    let mut open: Option<(usize, Vec<u8>)> = None;

    for (i, entry) in seq.iter().enumerate() {
        if entry.byte == STX {
            open = Some((i, vec![STX]));
            continue;
        }
        if let Some((start, mut bytes)) = open.take() {
            bytes.push(entry.byte);
            if entry.byte == ETX {
                out.push(Frame::start(seq[start], bytes));
            } else {
                open = Some((start, bytes));
            }
        }
    }

    if let Some((start, bytes)) = open {
        out.push(Frame::start(seq[start], bytes));
    }
}

fn length_prefixed(seq: &[&LogEntry], out: &mut Vec<Frame>) {
    let bytes: Vec<u8> = seq.iter().map(|entry| entry.byte).collect();
    let n = bytes.len();
    let mut i = 0;

    while i + 2 < n {
        if bytes[i..i + 2] == SYNC {
            let len = usize::from(bytes[i + 2]);
            if LENGTH_RANGE.contains(&len) && i + len <= n {
                out.push(Frame::start(seq[i], bytes[i..i + len].to_vec()));
                i += len;
                continue;
            }
        }
        i += 1;
    }
}
