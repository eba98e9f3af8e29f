//! The online pipeline: decoder → aggregator → correlator → sink.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info, trace, warn};
use uartlog_port::ByteSource;
use uartlog_wire::{Channel, Polled, RecordReader, WireFormat};

use crate::aggregator::{ChannelAggregator, FlushPolicy, Packet};
use crate::clock::{ClockCorrelator, SystemClock, WallClock};
use crate::error::{CaptureError, Result};
use crate::render::{render_packet, LineStyle};
use crate::sink::LineSink;

/// Most ports a session can poll; each feeds one logical channel in dual mode.
pub const MAX_PORTS: usize = 2;

/// Settings for one capture session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureConfig {
    /// Record layout the device speaks.
    pub format: WireFormat,
    /// Packet cut policy.
    pub policy: FlushPolicy,
    /// Line shape.
    pub style: LineStyle,
    /// Pause after a loop iteration in which no port produced data.
    pub idle_sleep: Duration,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            format: WireFormat::Checksummed,
            policy: FlushPolicy::default(),
            style: LineStyle::Packet,
            idle_sleep: Duration::from_millis(1),
        }
    }
}

impl CaptureConfig {
    /// The policy actually applied; per-byte lines force single-byte packets.
    pub fn effective_policy(&self) -> FlushPolicy {
        match self.style {
            LineStyle::PerByte => FlushPolicy {
                max_bytes: 1,
                ..self.policy
            },
            _ => self.policy,
        }
    }
}

/// Counters reported when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub records: u64,
    pub packets: u64,
    pub idle_flushes: u64,
}

struct PortState<S> {
    name: String,
    reader: RecordReader<S>,
    clock: ClockCorrelator,
}

/// A capture session over one or two byte sources.
///
/// With one port, records are aggregated on the channel they carry. With two
/// ports, each port is one logical channel (first port `A`, second `B`).
/// Single-threaded: [`Session::poll_once`] makes one read per port, round-robin.
pub struct Session<S, K, C = SystemClock> {
    ports: Vec<PortState<S>>,
    aggregators: [ChannelAggregator; 2],
    sink: K,
    wall_clock: C,
    config: CaptureConfig,
    stats: SessionStats,
}

impl<S: ByteSource, K: LineSink> Session<S, K, SystemClock> {
    /// Create a session reading wall time from the system clock.
    pub fn new(sources: Vec<S>, config: CaptureConfig, sink: K) -> Result<Self> {
        Self::with_clock(sources, config, sink, SystemClock)
    }
}

impl<S: ByteSource, K: LineSink, C: WallClock> Session<S, K, C> {
    /// Create a session with an explicit wall clock.
    pub fn with_clock(sources: Vec<S>, config: CaptureConfig, sink: K, wall_clock: C) -> Result<Self> {
        if sources.is_empty() || sources.len() > MAX_PORTS {
            return Err(CaptureError::InvalidConfig(format!(
                "expected 1 to {MAX_PORTS} ports, got {}",
                sources.len()
            )));
        }

        let policy = config.effective_policy();
        let ports = sources
            .into_iter()
            .map(|source| PortState {
                name: source.name().to_string(),
                reader: RecordReader::new(source, config.format),
                clock: ClockCorrelator::new(),
            })
            .collect();

        Ok(Self {
            ports,
            aggregators: Channel::ALL.map(|channel| ChannelAggregator::new(channel, policy)),
            sink,
            wall_clock,
            config,
            stats: SessionStats::default(),
        })
    }

    /// One read per port. Returns true if any port produced bytes.
    ///
    /// A port with nothing to offer triggers an unconditional flush of every
    /// non-empty channel.
    pub fn poll_once(&mut self) -> Result<bool> {
        let mut active = false;

        for index in 0..self.ports.len() {
            if self.ports[index].reader.is_exhausted() {
                continue;
            }

            let polled = {
                let port = &mut self.ports[index];
                port.reader
                    .poll()
                    .map_err(|err| CaptureError::from_wire(&port.name, err))?
            };

            match polled {
                Polled::Idle => {
                    let flushed = self.flush_all()?;
                    if flushed > 0 {
                        self.stats.idle_flushes += 1;
                        trace!(port = %self.ports[index].name, flushed, "idle flush");
                    }
                }
                Polled::Records(records) => {
                    active = true;
                    for record in records {
                        self.stats.records += 1;
                        let now_us = self.wall_clock.now_us();
                        let port = &mut self.ports[index];
                        if port.clock.offset_us().is_none() {
                            let offset = port.clock.observe(record.timestamp_us, now_us);
                            debug!(port = %port.name, offset_us = offset, "device clock anchored");
                        }

                        let channel = self.logical_channel(index, record.channel);
                        if let Some(packet) = self.aggregators[channel.index()].push(&record, index)
                        {
                            self.emit(&packet)?;
                        }
                    }
                }
            }
        }

        Ok(active)
    }

    /// Poll until `running` clears or every source is exhausted, then drain.
    ///
    /// Pending packets are flushed before returning, including when a fatal
    /// protocol error ends the session.
    pub fn run(&mut self, running: &AtomicBool) -> Result<SessionStats> {
        while running.load(Ordering::SeqCst) && !self.is_finished() {
            match self.poll_once() {
                Ok(true) => {}
                Ok(false) => {
                    if !self.is_finished() {
                        std::thread::sleep(self.config.idle_sleep);
                    }
                }
                Err(err) => {
                    if let Err(drain_err) = self.drain() {
                        warn!(error = %drain_err, "failed to drain pending packets");
                    }
                    return Err(err);
                }
            }
        }

        self.drain()?;
        info!(
            records = self.stats.records,
            packets = self.stats.packets,
            idle_flushes = self.stats.idle_flushes,
            "capture session finished"
        );
        Ok(self.stats)
    }

    /// Flush every non-empty channel. Returns the number of packets emitted.
    pub fn drain(&mut self) -> Result<usize> {
        self.flush_all()
    }

    /// True once every source is exhausted.
    pub fn is_finished(&self) -> bool {
        self.ports.iter().all(|port| port.reader.is_exhausted())
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Names of the ports in polling order.
    pub fn port_names(&self) -> Vec<&str> {
        self.ports.iter().map(|port| port.name.as_str()).collect()
    }

    /// Consume the session and return the sink.
    pub fn into_sink(self) -> K {
        self.sink
    }

    fn logical_channel(&self, port_index: usize, wire_channel: Channel) -> Channel {
        if self.ports.len() == 1 {
            return wire_channel;
        }
        if port_index == 0 {
            Channel::A
        } else {
            Channel::B
        }
    }

    fn flush_all(&mut self) -> Result<usize> {
        let mut flushed = 0;
        for channel in Channel::ALL {
            if let Some(packet) = self.aggregators[channel.index()].flush() {
                self.emit(&packet)?;
                flushed += 1;
            }
        }
        Ok(flushed)
    }

    fn emit(&mut self, packet: &Packet) -> Result<()> {
        let port = &self.ports[packet.source];
        let line = render_packet(packet, self.config.style, &port.clock, &port.name);
        self.sink.emit(&line).map_err(CaptureError::Emit)?;
        self.stats.packets += 1;
        trace!(
            channel = %packet.channel,
            bytes = packet.bytes.len(),
            "packet emitted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bytes::BytesMut;
    use uartlog_port::ReplaySource;
    use uartlog_wire::{encode_record, RawRecord};

    use super::*;
    use crate::render::CaptureLine;

    fn wire(records: &[RawRecord], format: WireFormat) -> Vec<u8> {
        let mut buf = BytesMut::new();
        for record in records {
            encode_record(record, format, &mut buf);
        }
        buf.to_vec()
    }

    const NOW_US: i64 = 1_700_000_000_000_000;

    fn fixed_clock() -> impl WallClock {
        || NOW_US
    }

    fn replay(name: &str, bytes: Vec<u8>) -> ReplaySource<Cursor<Vec<u8>>> {
        ReplaySource::new(name, Cursor::new(bytes))
    }

    fn hex_of(line: &CaptureLine) -> String {
        line.file.splitn(3, ' ').nth(2).unwrap_or_default().to_string()
    }

    fn run_to_end(
        sources: Vec<ReplaySource<Cursor<Vec<u8>>>>,
        config: CaptureConfig,
    ) -> (Result<SessionStats>, Vec<CaptureLine>) {
        let mut session =
            Session::with_clock(sources, config, Vec::<CaptureLine>::new(), fixed_clock())
                .unwrap();
        let result = session.run(&AtomicBool::new(true));
        (result, session.into_sink())
    }

    #[test]
    fn packets_split_by_size_then_idle() {
        let records: Vec<_> = (0..5u32)
            .map(|i| RawRecord::new(Channel::A, i * 10, 0x30 + i as u8))
            .collect();
        let config = CaptureConfig {
            policy: FlushPolicy {
                max_bytes: 3,
                gap_timeout_us: 0,
            },
            ..CaptureConfig::default()
        };

        let (result, lines) = run_to_end(
            vec![replay("dev", wire(&records, WireFormat::Checksummed))],
            config,
        );

        let stats = result.unwrap();
        assert_eq!(stats.records, 5);
        assert_eq!(stats.packets, 2);
        let hex: Vec<_> = lines.iter().map(hex_of).collect();
        assert_eq!(hex, vec!["30 31 32", "33 34"]);
        assert!(lines.iter().all(|l| l.file.starts_with("A ")));
    }

    #[test]
    fn channels_aggregate_independently() {
        let records = [
            RawRecord::new(Channel::A, 0, 0x01),
            RawRecord::new(Channel::B, 1, 0x02),
            RawRecord::new(Channel::A, 2, 0x03),
            RawRecord::new(Channel::B, 3, 0x04),
        ];
        let (result, lines) = run_to_end(
            vec![replay("dev", wire(&records, WireFormat::Checksummed))],
            CaptureConfig::default(),
        );

        result.unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].file.starts_with("A "));
        assert_eq!(hex_of(&lines[0]), "01 03");
        assert!(lines[1].file.starts_with("B "));
        assert_eq!(hex_of(&lines[1]), "02 04");
    }

    #[test]
    fn start_time_comes_from_first_byte() {
        let records = [
            RawRecord::new(Channel::A, 1_000_000, 0x01),
            RawRecord::new(Channel::A, 1_300_000, 0x02),
        ];
        let mut session = Session::with_clock(
            vec![replay("dev", wire(&records, WireFormat::Checksummed))],
            CaptureConfig::default(),
            Vec::<CaptureLine>::new(),
            fixed_clock(),
        )
        .unwrap();
        session.run(&AtomicBool::new(true)).unwrap();

        let mut anchored = ClockCorrelator::new();
        anchored.observe(1_000_000, NOW_US);
        let lines = session.into_sink();
        assert_eq!(
            lines[0].file,
            format!("A {} 01 02", anchored.format(1_000_000))
        );
    }

    #[test]
    fn interrupt_drains_pending_packets_once() {
        let records = [
            RawRecord::new(Channel::A, 0, 0x0A),
            RawRecord::new(Channel::B, 0, 0x0B),
        ];
        let mut session = Session::with_clock(
            vec![replay("dev", wire(&records, WireFormat::Checksummed))],
            CaptureConfig::default(),
            Vec::<CaptureLine>::new(),
            fixed_clock(),
        )
        .unwrap();

        assert!(session.poll_once().unwrap());
        let stopped = AtomicBool::new(false);
        let stats = session.run(&stopped).unwrap();
        assert_eq!(stats.packets, 2);
        assert_eq!(session.drain().unwrap(), 0);

        let lines = session.into_sink();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn fatal_error_drains_then_propagates() {
        let mut bytes = wire(
            &[
                RawRecord::new(Channel::A, 0, 0x11),
                RawRecord::new(Channel::A, 1, 0x22),
            ],
            WireFormat::Checksummed,
        );
        bytes.extend_from_slice(&[0x00; 8]);

        let (result, lines) = run_to_end(vec![replay("ttyACM0", bytes)], CaptureConfig::default());

        let err = result.unwrap_err();
        assert!(matches!(err, CaptureError::Protocol { ref port, .. } if port == "ttyACM0"));
        assert!(err.to_string().contains("bad magic 0x00"));
        assert_eq!(lines.len(), 1);
        assert_eq!(hex_of(&lines[0]), "11 22");
    }

    #[test]
    fn raw_format_drops_bad_channels_and_continues() {
        let mut bytes = wire(&[RawRecord::new(Channel::B, 5, 0x61)], WireFormat::Raw);
        bytes.extend_from_slice(&[0x02, 0, 0, 0, 0, 0xFF]);
        bytes.extend(wire(&[RawRecord::new(Channel::B, 6, 0x62)], WireFormat::Raw));

        let config = CaptureConfig {
            format: WireFormat::Raw,
            style: LineStyle::HexDump,
            ..CaptureConfig::default()
        };
        let (result, lines) = run_to_end(vec![replay("raw", bytes)], config);

        assert_eq!(result.unwrap().records, 2);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].file.starts_with(">      0.000  61 62 "));
        assert!(lines[0].file.ends_with("  ab"));
    }

    #[test]
    fn dual_port_per_byte_maps_ports_to_channels() {
        let first = wire(
            &[
                RawRecord::new(Channel::A, 0, 0x41),
                RawRecord::new(Channel::A, 10, 0x42),
            ],
            WireFormat::Checksummed,
        );
        let second = wire(&[RawRecord::new(Channel::A, 0, 0x43)], WireFormat::Checksummed);
        let config = CaptureConfig {
            style: LineStyle::PerByte,
            ..CaptureConfig::default()
        };

        let (result, lines) = run_to_end(
            vec![replay("left", first), replay("right", second)],
            config,
        );
        result.unwrap();

        let files: Vec<_> = lines
            .iter()
            .map(|l| (l.file.chars().next().unwrap(), hex_of(l)))
            .collect();
        assert_eq!(
            files,
            vec![
                ('A', "41".to_string()),
                ('A', "42".to_string()),
                ('B', "43".to_string()),
            ]
        );
        assert!(lines[2].console.starts_with("B right:A "));
    }

    #[test]
    fn rejects_too_many_ports() {
        let sources = vec![
            replay("a", vec![]),
            replay("b", vec![]),
            replay("c", vec![]),
        ];
        let err = Session::with_clock(
            sources,
            CaptureConfig::default(),
            Vec::<CaptureLine>::new(),
            fixed_clock(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, CaptureError::InvalidConfig(_)));
    }

    #[test]
    fn per_byte_style_forces_single_byte_packets() {
        let config = CaptureConfig {
            style: LineStyle::PerByte,
            ..CaptureConfig::default()
        };
        assert_eq!(config.effective_policy().max_bytes, 1);
        assert_eq!(CaptureConfig::default().effective_policy().max_bytes, 16);
    }
}
