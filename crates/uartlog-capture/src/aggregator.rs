//! Per-channel packet aggregation.

use uartlog_wire::{Channel, RawRecord};

/// Default packet size limit.
pub const DEFAULT_MAX_BYTES: usize = 16;

/// When an in-progress packet is cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushPolicy {
    /// Flush once the buffer holds this many bytes. 0 disables the limit.
    pub max_bytes: usize,
    /// Flush when the device-time gap to the previous byte exceeds this. 0 disables.
    pub gap_timeout_us: u32,
}

impl Default for FlushPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            gap_timeout_us: 0,
        }
    }
}

impl FlushPolicy {
    /// Build a policy from a millisecond gap as given on the command line.
    pub fn from_gap_ms(max_bytes: usize, gap_ms: f64) -> Self {
        let gap_us = (gap_ms * 1000.0).clamp(0.0, f64::from(u32::MAX));
        Self {
            max_bytes,
            gap_timeout_us: gap_us as u32,
        }
    }
}

/// A flushed byte run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Logical channel the packet was aggregated on.
    pub channel: Channel,
    /// Index of the port that produced the first byte.
    pub source: usize,
    /// Channel id the first byte carried on the wire.
    pub wire_channel: Channel,
    /// Device timestamp of the first byte.
    pub start_timestamp_us: u32,
    pub bytes: Vec<u8>,
}

/// Bytes of the packet in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelBuffer {
    pub bytes: Vec<u8>,
    pub start_timestamp_us: u32,
    pub last_timestamp_us: u32,
}

impl ChannelBuffer {
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}

/// Groups consecutive bytes of one channel into packets.
///
/// A new byte first evaluates the size limit, then the idle gap; either one
/// flushes the buffer before the byte is appended, and the byte opens the
/// next packet.
#[derive(Debug, Clone)]
pub struct ChannelAggregator {
    channel: Channel,
    policy: FlushPolicy,
    buffer: ChannelBuffer,
    source: usize,
    wire_channel: Channel,
}

impl ChannelAggregator {
    pub fn new(channel: Channel, policy: FlushPolicy) -> Self {
        Self {
            channel,
            policy,
            buffer: ChannelBuffer::default(),
            source: 0,
            wire_channel: channel,
        }
    }

    /// Accept a byte from port `source`. Returns the packet this byte closed, if any.
    pub fn push(&mut self, record: &RawRecord, source: usize) -> Option<Packet> {
        let flushed = if self.should_flush(record.timestamp_us) {
            self.flush()
        } else {
            None
        };

        if self.buffer.is_empty() {
            self.buffer.start_timestamp_us = record.timestamp_us;
            self.source = source;
            self.wire_channel = record.channel;
        }
        self.buffer.bytes.push(record.data);
        self.buffer.last_timestamp_us = record.timestamp_us;

        flushed
    }

    /// Emit the packet in progress. No-op on an empty buffer.
    pub fn flush(&mut self) -> Option<Packet> {
        if self.buffer.is_empty() {
            return None;
        }
        let buffer = std::mem::take(&mut self.buffer);
        Some(Packet {
            channel: self.channel,
            source: self.source,
            wire_channel: self.wire_channel,
            start_timestamp_us: buffer.start_timestamp_us,
            bytes: buffer.bytes,
        })
    }

    fn should_flush(&self, timestamp_us: u32) -> bool {
        if self.buffer.is_empty() {
            return false;
        }
        if self.policy.max_bytes != 0 && self.buffer.len() >= self.policy.max_bytes {
            return true;
        }
        if self.policy.gap_timeout_us == 0 {
            return false;
        }
        // A forward distance past half the counter range is a step backwards, not a gap.
        let elapsed = timestamp_us.wrapping_sub(self.buffer.last_timestamp_us);
        elapsed <= u32::MAX / 2 && elapsed > self.policy.gap_timeout_us
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn policy(&self) -> FlushPolicy {
        self.policy
    }

    pub fn buffer(&self) -> &ChannelBuffer {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
