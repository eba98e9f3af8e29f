//! Byte sources feeding the uartlog capture pipeline.
//!
//! Provides a small polling interface over the places wire bytes come from:
//! - Serial links to the capture device (via the `serialport` crate)
//! - Recorded wire dumps replayed from a file
//!
//! This is the lowest layer of uartlog. Everything else builds on top of
//! the [`ByteSource`] trait provided here.

pub mod config;
pub mod error;
pub mod replay;
pub mod serial;
pub mod traits;

pub use config::{LinkConfig, Parity, CONTROL_BAUD, DEFAULT_READ_TIMEOUT};
pub use error::{PortError, Result};
pub use replay::ReplaySource;
pub use serial::{available_ports, PortSummary, SerialLink};
pub use traits::ByteSource;
