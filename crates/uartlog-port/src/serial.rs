use std::io::{ErrorKind, Read, Write};

use serialport::{SerialPort, SerialPortType};
use tracing::{debug, info};

use crate::config::{CONTROL_BAUD, DEFAULT_READ_TIMEOUT};
use crate::error::{PortError, Result};
use crate::traits::ByteSource;

/// Serial link to a capture device.
///
/// Opened at [`CONTROL_BAUD`] with a short read timeout so that an empty read
/// surfaces quickly as the idle signal.
pub struct SerialLink {
    name: String,
    port: Box<dyn SerialPort>,
}

impl SerialLink {
    /// Open the named device (e.g. `/dev/ttyUSB0`, `COM16`).
    pub fn open(name: &str) -> Result<Self> {
        let port = serialport::new(name, CONTROL_BAUD)
            .timeout(DEFAULT_READ_TIMEOUT)
            .open()
            .map_err(|source| PortError::Open {
                port: name.to_string(),
                source,
            })?;
        info!(port = name, baud = CONTROL_BAUD, "serial link opened");
        Ok(Self {
            name: name.to_string(),
            port,
        })
    }

    /// Borrow the underlying port.
    pub fn get_ref(&self) -> &dyn SerialPort {
        self.port.as_ref()
    }
}

impl ByteSource for SerialLink {
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize> {
        // Ask for everything queued, or a single byte so the timeout applies.
        let queued = self.port.bytes_to_read().unwrap_or(0) as usize;
        let want = queued.clamp(1, buf.len().max(1));
        match self.port.read(&mut buf[..want]) {
            Ok(n) => Ok(n),
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                ) =>
            {
                Ok(0)
            }
            Err(err) => Err(PortError::Io(err)),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Write for SerialLink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.port.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.port.flush()
    }
}

impl std::fmt::Debug for SerialLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialLink")
            .field("name", &self.name)
            .finish()
    }
}

/// Short description of an available serial device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSummary {
    pub name: String,
    pub kind: &'static str,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
    pub product: Option<String>,
}

/// List serial devices visible to the host.
pub fn available_ports() -> Result<Vec<PortSummary>> {
    let ports = serialport::available_ports().map_err(PortError::Enumerate)?;
    debug!(count = ports.len(), "enumerated serial ports");
    Ok(ports
        .into_iter()
        .map(|info| match info.port_type {
            SerialPortType::UsbPort(usb) => PortSummary {
                name: info.port_name,
                kind: "usb",
                vid: Some(usb.vid),
                pid: Some(usb.pid),
                product: usb.product,
            },
            SerialPortType::PciPort => summary(info.port_name, "pci"),
            SerialPortType::BluetoothPort => summary(info.port_name, "bluetooth"),
            SerialPortType::Unknown => summary(info.port_name, "unknown"),
        })
        .collect())
}

fn summary(name: String, kind: &'static str) -> PortSummary {
    PortSummary {
        name,
        kind,
        vid: None,
        pid: None,
        product: None,
    }
}
