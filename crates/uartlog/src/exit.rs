use std::fmt;
use std::io;

use uartlog_capture::CaptureError;
use uartlog_port::PortError;
use uartlog_pretty::PrettyError;

// Process exit codes. 64 and up follow sysexits.h where one fits.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PROTOCOL_ERROR: i32 = 2;
pub const PORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::InvalidData => DATA_INVALID,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn port_error(context: &str, err: PortError) -> CliError {
    if err.is_permission_denied() {
        return CliError::new(PERMISSION_DENIED, format!("{context}: {err}"));
    }
    match err {
        PortError::Replay { .. } | PortError::Io(_) => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
        PortError::InvalidConfig(_) => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(PORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn capture_error(context: &str, err: CaptureError) -> CliError {
    match err {
        CaptureError::Port(err) => port_error(context, err),
        CaptureError::Protocol { .. } => CliError::new(PROTOCOL_ERROR, format!("{context}: {err}")),
        CaptureError::Emit(source) => io_error(&format!("{context}: log write failed"), source),
        CaptureError::InvalidConfig(_) => CliError::new(USAGE, format!("{context}: {err}")),
    }
}

pub fn pretty_error(err: &PrettyError) -> i32 {
    match err {
        PrettyError::NotAFile(_) => FAILURE,
        PrettyError::Read { source, .. } | PrettyError::Write { source, .. } => match source.kind() {
            io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
            _ => FAILURE,
        },
    }
}
