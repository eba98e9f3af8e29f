//! Fixed-size wire record decoding for uartlog capture devices.
//!
//! The capture device reports every sniffed byte as one record. Two layouts
//! exist and a session uses exactly one of them:
//! - Checksummed (8 bytes): magic, channel, 4-byte LE timestamp, data, XOR checksum
//! - Raw (6 bytes): channel, 4-byte LE timestamp, data
//!
//! Partial records stay buffered until the rest arrives.

pub mod channel;
pub mod codec;
pub mod error;
pub mod reader;

pub use channel::Channel;
pub use codec::{
    checksum, decode_record, encode_record, format_bytes, RawRecord, WireFormat, CHECKSUMMED_RECORD_SIZE, MAGIC,
    RAW_RECORD_SIZE,
};
pub use error::{Result, WireError};
pub use reader::{Polled, RecordReader};
