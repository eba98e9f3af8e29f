//! Log line rendering for flushed packets.

use uartlog_wire::format_bytes;

use crate::aggregator::Packet;
use crate::clock::ClockCorrelator;

/// Width of the hex column in dump lines (16 bytes at 3 columns each).
const HEX_COLUMN_WIDTH: usize = 48;

/// Shape of the lines a session emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    /// One line per packet: `A 12:00:00.000 01 02 03`.
    #[default]
    Packet,
    /// One line per byte, `A 12:00:00.000 01`; the console form adds the port tag.
    PerByte,
    /// Device-relative time plus an ASCII gutter: `<      1.234  01 02 ...  ..`.
    HexDump,
}

/// A rendered packet: what goes to the console and what goes to the log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureLine {
    pub console: String,
    pub file: String,
}

impl CaptureLine {
    fn same(line: String) -> Self {
        Self {
            console: line.clone(),
            file: line,
        }
    }
}

/// Render a flushed packet. `port` names the source for console tags.
pub fn render_packet(
    packet: &Packet,
    style: LineStyle,
    clock: &ClockCorrelator,
    port: &str,
) -> CaptureLine {
    match style {
        LineStyle::Packet => CaptureLine::same(format!(
            "{} {} {}",
            packet.channel,
            clock.format(packet.start_timestamp_us),
            format_bytes(&packet.bytes)
        )),
        LineStyle::PerByte => {
            let time = clock.format(packet.start_timestamp_us);
            let hex = format_bytes(&packet.bytes);
            CaptureLine {
                console: format!(
                    "{} {}:{} {} {}",
                    packet.channel, port, packet.wire_channel, time, hex
                ),
                file: format!("{} {} {}", packet.channel, time, hex),
            }
        }
        LineStyle::HexDump => CaptureLine::same(hex_dump_line(packet)),
    }
}

fn hex_dump_line(packet: &Packet) -> String {
    let ts = packet.start_timestamp_us;
    let seconds = ts / 1_000_000;
    let millis = (ts / 1000) % 1000;
    format!(
        "{} {:6}.{:03}  {:<width$}  {}",
        packet.channel.arrow(),
        seconds,
        millis,
        format_bytes(&packet.bytes),
        ascii_gutter(&packet.bytes),
        width = HEX_COLUMN_WIDTH
    )
}

fn ascii_gutter(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            if (0x20..0x7F).contains(&b) {
                char::from(b)
            } else {
                '.'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use uartlog_wire::Channel;

    use super::*;

    fn packet(channel: Channel, ts: u32, bytes: &[u8]) -> Packet {
        Packet {
            channel,
            source: 0,
            wire_channel: channel,
            start_timestamp_us: ts,
            bytes: bytes.to_vec(),
        }
    }

    fn anchored() -> ClockCorrelator {
        let mut clock = ClockCorrelator::new();
        clock.observe(0, 0);
        clock
    }

    #[test]
    fn packet_line_shape() {
        let clock = anchored();
        let line = render_packet(
            &packet(Channel::B, 1_500, &[0x01, 0xAB, 0x7F]),
            LineStyle::Packet,
            &clock,
            "ttyUSB0",
        );
        let time = clock.format(1_500);
        assert_eq!(line.file, format!("B {time} 01 AB 7F"));
        assert_eq!(line.console, line.file);
    }

    #[test]
    fn per_byte_console_carries_port_tag() {
        let clock = anchored();
        let mut p = packet(Channel::B, 0, &[0x3C]);
        p.wire_channel = Channel::A;
        let line = render_packet(&p, LineStyle::PerByte, &clock, "COM16");
        let time = clock.format(0);

        assert_eq!(line.console, format!("B COM16:A {time} 3C"));
        assert_eq!(line.file, format!("B {time} 3C"));
    }

    #[test]
    fn hex_dump_uses_device_time_and_gutter() {
        let clock = ClockCorrelator::new();
        let line = render_packet(
            &packet(Channel::A, 12_345_678, b"Hi\x00"),
            LineStyle::HexDump,
            &clock,
            "replay",
        );
        let expected = format!("<     12.345  {:<48}  Hi.", "48 69 00");
        assert_eq!(line.file, expected);
        assert_eq!(line.console, expected);
    }

    #[test]
    fn hex_dump_arrow_for_second_channel() {
        let line = render_packet(
            &packet(Channel::B, 0, &[0x41]),
            LineStyle::HexDump,
            &ClockCorrelator::new(),
            "x",
        );
        assert!(line.file.starts_with(">      0.000  41 "));
        assert!(line.file.ends_with("  A"));
    }
}
