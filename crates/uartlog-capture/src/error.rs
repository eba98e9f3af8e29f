/// Errors that can end a capture session.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// A byte source could not be opened, configured or read.
    #[error("port error: {0}")]
    Port(#[from] uartlog_port::PortError),

    /// The device violated the wire protocol. Unrecoverable.
    #[error("protocol error on {port}: {source}")]
    Protocol {
        port: String,
        source: uartlog_wire::WireError,
    },

    /// Writing a log line failed.
    #[error("failed to emit log line: {0}")]
    Emit(#[source] std::io::Error),

    /// The session was set up with an unusable configuration.
    #[error("invalid capture configuration: {0}")]
    InvalidConfig(String),
}

impl CaptureError {
    /// Attribute a decoder error to the port it came from.
    pub fn from_wire(port: &str, err: uartlog_wire::WireError) -> Self {
        match err {
            uartlog_wire::WireError::Source(source) => CaptureError::Port(source),
            other => CaptureError::Protocol {
                port: port.to_string(),
                source: other,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, CaptureError>;
