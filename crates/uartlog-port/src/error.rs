/// Errors that can occur while opening or reading a byte source.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// Failed to open the serial device.
    #[error("failed to open {port}: {source}")]
    Open {
        port: String,
        source: serialport::Error,
    },

    /// Failed to send the link configuration command.
    #[error("failed to configure {port}: {source}")]
    Configure {
        port: String,
        source: std::io::Error,
    },

    /// Failed to open a replay file.
    #[error("failed to open replay {}: {source}", path.display())]
    Replay {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    /// Port enumeration failed.
    #[error("failed to enumerate serial ports: {0}")]
    Enumerate(serialport::Error),

    /// A configuration value is out of range.
    #[error("invalid link configuration: {0}")]
    InvalidConfig(String),

    /// An I/O error occurred while reading the source.
    #[error("port I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PortError {
    /// True when the OS refused access to the device or file.
    pub fn is_permission_denied(&self) -> bool {
        match self {
            PortError::Open { source, .. } | PortError::Enumerate(source) => {
                source.kind() == serialport::ErrorKind::Io(std::io::ErrorKind::PermissionDenied)
            }
            PortError::Configure { source, .. }
            | PortError::Replay { source, .. }
            | PortError::Io(source) => source.kind() == std::io::ErrorKind::PermissionDenied,
            PortError::InvalidConfig(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, PortError>;
