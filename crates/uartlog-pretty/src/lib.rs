//! Offline pretty-printer for per-byte capture logs.
//!
//! Parses `{channel} {HH:MM:SS.fff} {XX}` lines, reassembles application
//! frames per channel, collapses repeated frame sequences and writes a
//! `{stem}_pretty.txt` file beside the input.

pub mod compress;
pub mod config;
pub mod entry;
pub mod error;
pub mod framing;
pub mod process;
pub mod render;

pub use compress::{compress, Row, MAX_PERIOD};
pub use config::PrettyConfig;
pub use entry::{parse_entries, parse_line, LogEntry};
pub use error::{PrettyError, Result};
pub use framing::{reassemble, FramingScheme, Frame};
pub use process::{decode_text, output_path, prettify, process_file, render_rows, PrettyReport};
pub use render::{render_frame, RenderOptions};
