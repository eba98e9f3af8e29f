use std::path::{Path, PathBuf};

use tracing::debug;

use crate::compress::{compress, Row};
use crate::config::PrettyConfig;
use crate::entry::parse_entries;
use crate::error::{PrettyError, Result};
use crate::framing::reassemble;
use crate::render::render_frame;

/// Outcome of processing one log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrettyReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub lines: usize,
}

/// `{stem}_pretty.txt` in the input's directory.
pub fn output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}_pretty.txt"))
}

/// Turn log text into output rows. `file_name` selects the framing scheme
/// unless the config forces one.
pub fn prettify(text: &str, file_name: &str, config: &PrettyConfig) -> Vec<Row> {
    let scheme = config.scheme_for(file_name);
    let entries = parse_entries(text);
    let mut frames = reassemble(&entries, scheme);
    frames.sort_by_key(|frame| frame.millis);

    debug!(
        file = file_name,
        %scheme,
        entries = entries.len(),
        frames = frames.len(),
        "reassembled frames"
    );

    let rows: Vec<Row> = frames
        .iter()
        .map(|frame| {
            Row::frame(
                frame.channel,
                frame.wall_time.clone(),
                render_frame(frame, scheme, config.render),
            )
        })
        .collect();

    if config.compress {
        compress(&rows)
    } else {
        rows
    }
}

/// One row per line, with a trailing newline unless there are no rows.
pub fn render_rows(rows: &[Row]) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str(&row.to_string());
        out.push('\n');
    }
    out
}

/// Decode log bytes, dropping invalid UTF-8 sequences.
pub fn decode_text(raw: &[u8]) -> String {
    raw.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Read a capture log, write its pretty form beside it and report the result.
pub fn process_file(input: &Path, config: &PrettyConfig) -> Result<PrettyReport> {
    if !input.is_file() {
        return Err(PrettyError::NotAFile(input.to_path_buf()));
    }

    let raw = std::fs::read(input).map_err(|source| PrettyError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let text = decode_text(&raw);
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let rows = prettify(&text, &file_name, config);
    let output = output_path(input);
    std::fs::write(&output, render_rows(&rows)).map_err(|source| PrettyError::Write {
        path: output.clone(),
        source,
    })?;

    debug!(input = %input.display(), output = %output.display(), lines = rows.len(), "wrote pretty log");
    Ok(PrettyReport {
        input: input.to_path_buf(),
        output,
        lines: rows.len(),
    })
}
