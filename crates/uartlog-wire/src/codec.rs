use bytes::{Buf, BufMut, BytesMut};
use tracing::debug;

use crate::channel::Channel;
use crate::error::{Result, WireError};

/// Leading byte of every checksummed record.
pub const MAGIC: u8 = 0xA5;

/// Checksummed record: magic (1) + channel (1) + timestamp (4) + data (1) + checksum (1).
pub const CHECKSUMMED_RECORD_SIZE: usize = 8;

/// Raw record: channel (1) + timestamp (4) + data (1).
pub const RAW_RECORD_SIZE: usize = 6;

/// Record layout spoken by the capture device for a whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireFormat {
    /// 8-byte records with magic and XOR checksum. Corruption is fatal.
    #[default]
    Checksummed,
    /// 6-byte records without integrity data. Bad channel ids are dropped.
    Raw,
}

impl WireFormat {
    /// Size of one record on the wire.
    pub fn record_size(self) -> usize {
        match self {
            WireFormat::Checksummed => CHECKSUMMED_RECORD_SIZE,
            WireFormat::Raw => RAW_RECORD_SIZE,
        }
    }
}

/// One sniffed byte as reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord {
    /// Line the byte was seen on.
    pub channel: Channel,
    /// Device-relative microseconds; wraps at 2^32.
    pub timestamp_us: u32,
    /// The sniffed byte.
    pub data: u8,
    /// True when the record carried a checksum and it verified.
    /// Raw-format records carry none and report false.
    pub checksum_valid: bool,
}

impl RawRecord {
    /// Build a record for `channel` at `timestamp_us`.
    pub fn new(channel: Channel, timestamp_us: u32, data: u8) -> Self {
        Self {
            channel,
            timestamp_us,
            data,
            checksum_valid: false,
        }
    }
}

/// XOR of the channel id, the four timestamp bytes and the data byte.
pub fn checksum(channel: u8, timestamp: [u8; 4], data: u8) -> u8 {
    timestamp.iter().fold(channel ^ data, |acc, b| acc ^ b)
}

/// Encode a record into the wire layout.
///
/// Wire format (checksummed):
/// ```text
/// ┌────────┬─────────┬─────────────────┬──────┬──────────┐
/// │ 0xA5   │ channel │ timestamp (LE)  │ data │ checksum │
/// │ (1B)   │ (1B)    │ (4B)            │ (1B) │ (1B)     │
/// └────────┴─────────┴─────────────────┴──────┴──────────┘
/// ```
/// The raw layout drops the magic and checksum bytes.
pub fn encode_record(record: &RawRecord, format: WireFormat, dst: &mut BytesMut) {
    let ts = record.timestamp_us.to_le_bytes();
    let channel = record.channel.id();
    dst.reserve(format.record_size());
    if format == WireFormat::Checksummed {
        dst.put_u8(MAGIC);
    }
    dst.put_u8(channel);
    dst.put_u32_le(record.timestamp_us);
    dst.put_u8(record.data);
    if format == WireFormat::Checksummed {
        dst.put_u8(checksum(channel, ts, record.data));
    }
}

/// Decode the next record from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't hold a complete record yet; the
/// partial bytes stay in place for the next call. Raw records with a channel
/// id above 1 are consumed and skipped.
pub fn decode_record(src: &mut BytesMut, format: WireFormat) -> Result<Option<RawRecord>> {
    match format {
        WireFormat::Checksummed => decode_checksummed(src),
        WireFormat::Raw => decode_raw(src),
    }
}

fn decode_checksummed(src: &mut BytesMut) -> Result<Option<RawRecord>> {
    if src.len() < CHECKSUMMED_RECORD_SIZE {
        return Ok(None); // Need more data
    }

    let record = src.split_to(CHECKSUMMED_RECORD_SIZE);
    let ts = [record[2], record[3], record[4], record[5]];
    let (magic, channel_id, data, found) = (record[0], record[1], record[6], record[7]);

    if magic != MAGIC {
        return Err(WireError::BadMagic {
            found: magic,
            record: record.to_vec(),
        });
    }
    let Some(channel) = Channel::from_id(channel_id) else {
        return Err(WireError::BadChannel {
            found: channel_id,
            record: record.to_vec(),
        });
    };
    let expected = checksum(channel_id, ts, data);
    if found != expected {
        return Err(WireError::ChecksumMismatch {
            expected,
            found,
            record: record.to_vec(),
        });
    }

    Ok(Some(RawRecord {
        channel,
        timestamp_us: u32::from_le_bytes(ts),
        data,
        checksum_valid: true,
    }))
}

fn decode_raw(src: &mut BytesMut) -> Result<Option<RawRecord>> {
    while src.len() >= RAW_RECORD_SIZE {
        let channel_id = src.get_u8();
        let timestamp_us = src.get_u32_le();
        let data = src.get_u8();

        match Channel::from_id(channel_id) {
            Some(channel) => return Ok(Some(RawRecord::new(channel, timestamp_us, data))),
            None => debug!(channel = channel_id, "dropping raw record with bad channel"),
        }
    }
    Ok(None)
}

/// Space-separated uppercase hex, as used in diagnostics and log lines.
pub fn format_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{b:02X}"));
    }
    out
}
