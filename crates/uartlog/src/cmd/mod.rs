use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use uartlog_capture::{LineStyle, DEFAULT_MAX_BYTES};
use uartlog_port::Parity;
use uartlog_pretty::FramingScheme;
use uartlog_wire::WireFormat;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod capture;
pub mod ports;
pub mod pretty;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Capture traffic from one or two sniffer ports into a log file.
    Capture(CaptureArgs),
    /// Reassemble frames from per-byte capture logs.
    Pretty(PrettyArgs),
    /// List serial ports visible to the host.
    Ports(PortsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Capture(args) => capture::run(args, format),
        Command::Pretty(args) => pretty::run(args, format),
        Command::Ports(args) => ports::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum WireArg {
    /// 8-byte records with magic and XOR checksum.
    Checksummed,
    /// 6-byte records without integrity checks.
    Raw,
}

impl From<WireArg> for WireFormat {
    fn from(arg: WireArg) -> Self {
        match arg {
            WireArg::Checksummed => WireFormat::Checksummed,
            WireArg::Raw => WireFormat::Raw,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum StyleArg {
    /// One line per packet.
    Packet,
    /// One line per byte, tagged with the port.
    PerByte,
    /// Device-relative time with hex and ASCII columns.
    HexDump,
}

impl From<StyleArg> for LineStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Packet => LineStyle::Packet,
            StyleArg::PerByte => LineStyle::PerByte,
            StyleArg::HexDump => LineStyle::HexDump,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum SchemeArg {
    /// STX/ETX delimited text frames.
    Delimited,
    /// EB 90 sync with a length byte.
    LengthPrefixed,
}

impl From<SchemeArg> for FramingScheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Delimited => FramingScheme::Delimited,
            SchemeArg::LengthPrefixed => FramingScheme::LengthPrefixed,
        }
    }
}

#[derive(Args, Debug)]
pub struct CaptureArgs {
    /// Serial device of the sniffer. Repeat once for a second device.
    #[arg(long = "port", value_name = "PORT", required_unless_present = "replay", conflicts_with = "replay")]
    pub ports: Vec<String>,
    /// Read the wire stream from a file instead of a device.
    #[arg(long, value_name = "FILE")]
    pub replay: Option<PathBuf>,
    /// Baud rate of the sniffed link.
    #[arg(long, required_unless_present = "replay")]
    pub baud: Option<u32>,
    /// Parity of the sniffed link (N, E or O).
    #[arg(long, required_unless_present = "replay")]
    pub parity: Option<Parity>,
    /// Invert line polarity (0 or 1).
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=1), required_unless_present = "replay")]
    pub invert: Option<u8>,
    /// Log file to write (truncated).
    #[arg(long, value_name = "PATH")]
    pub log: PathBuf,
    /// Maximum bytes per packet (0 disables the size limit).
    #[arg(long, default_value_t = DEFAULT_MAX_BYTES)]
    pub max_bytes: usize,
    /// Inter-byte gap that closes a packet, in milliseconds (0 disables).
    #[arg(long, default_value_t = 0.0)]
    pub gap_ms: f64,
    /// Record layout sent by the sniffer.
    #[arg(long, value_enum, default_value = "checksummed")]
    pub wire: WireArg,
    /// Log line style.
    #[arg(long, value_enum, default_value = "packet")]
    pub style: StyleArg,
    /// Do not echo lines to stdout.
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Args, Debug)]
pub struct PrettyArgs {
    /// Capture logs to process.
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<String>,
    /// Force a framing scheme instead of deriving it from each file name.
    #[arg(long, value_enum)]
    pub scheme: Option<SchemeArg>,
    /// Drop the last comma-separated field of delimited frames.
    #[arg(long)]
    pub trim_last_field: bool,
    /// Drop the length byte and trailing byte of length-prefixed frames.
    #[arg(long)]
    pub strip_envelope: bool,
    /// Write every frame without collapsing repeats.
    #[arg(long)]
    pub no_compress: bool,
}

#[derive(Args, Debug, Default)]
pub struct PortsArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
