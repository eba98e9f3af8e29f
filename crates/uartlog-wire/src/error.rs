use crate::codec::format_bytes;

/// Errors raised while decoding wire records.
///
/// Every protocol variant is fatal: the checksummed layout carries no marker
/// to resynchronize on, so the session must stop.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The record does not start with the magic byte.
    #[error("bad magic 0x{found:02X} (record: {})", format_bytes(.record))]
    BadMagic { found: u8, record: Vec<u8> },

    /// The channel id is neither 0 nor 1.
    #[error("bad channel {found} (record: {})", format_bytes(.record))]
    BadChannel { found: u8, record: Vec<u8> },

    /// The XOR checksum does not match the record contents.
    #[error(
        "checksum mismatch: expected 0x{expected:02X}, got 0x{found:02X} (record: {})",
        format_bytes(.record)
    )]
    ChecksumMismatch {
        expected: u8,
        found: u8,
        record: Vec<u8>,
    },

    /// The byte source failed.
    #[error("source error: {0}")]
    Source(#[from] uartlog_port::PortError),
}

impl WireError {
    /// True for violations of the record layout, as opposed to source failures.
    pub fn is_protocol(&self) -> bool {
        !matches!(self, WireError::Source(_))
    }
}

pub type Result<T> = std::result::Result<T, WireError>;
