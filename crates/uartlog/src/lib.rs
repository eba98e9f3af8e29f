//! Dual-channel UART capture logging.
//!
//! uartlog records the two directions of a serial link through a sniffer
//! device, writes timestamped per-packet or per-byte logs, and turns those
//! logs into readable frame listings offline.
//!
//! # Crate Structure
//!
//! - [`port`]: Byte sources (serial links, replay files) and link configuration
//! - [`wire`]: Fixed-size record decoding for the sniffer's wire formats
//! - [`capture`]: Online packet aggregation and log emission (behind `capture` feature)
//! - [`pretty`]: Offline frame reassembly and compression (behind `pretty` feature)

/// Re-export port types.
pub mod port {
    pub use uartlog_port::*;
}

/// Re-export wire types.
pub mod wire {
    pub use uartlog_wire::*;
}

/// Re-export capture types (requires `capture` feature).
#[cfg(feature = "capture")]
pub mod capture {
    pub use uartlog_capture::*;
}

/// Re-export pretty-printer types (requires `pretty` feature).
#[cfg(feature = "pretty")]
pub mod pretty {
    pub use uartlog_pretty::*;
}
