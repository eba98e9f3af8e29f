//! Online capture pipeline.
//!
//! Decoded records from one or two ports are grouped into packets per
//! channel, stamped with local wall-clock time and written as log lines.

pub mod aggregator;
pub mod clock;
pub mod error;
pub mod handshake;
pub mod render;
pub mod session;
pub mod sink;

pub use aggregator::{ChannelAggregator, ChannelBuffer, FlushPolicy, Packet, DEFAULT_MAX_BYTES};
pub use clock::{ClockCorrelator, SystemClock, WallClock};
pub use error::{CaptureError, Result};
pub use handshake::configure_link;
pub use render::{render_packet, CaptureLine, LineStyle};
pub use session::{CaptureConfig, Session, SessionStats, MAX_PORTS};
pub use sink::{LineSink, LogSink};
