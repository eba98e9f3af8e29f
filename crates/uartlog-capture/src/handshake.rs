use std::io::Write;

use tracing::info;
use uartlog_port::{LinkConfig, PortError};

use crate::error::Result;

/// Send the one-shot line configuration command to a capture device.
///
/// There is no reply; the device starts streaming records once configured.
pub fn configure_link<W: Write>(link: &mut W, port: &str, config: &LinkConfig) -> Result<()> {
    config.validate()?;
    let command = config.command();

    link.write_all(command.as_bytes())
        .and_then(|()| link.flush())
        .map_err(|source| PortError::Configure {
            port: port.to_string(),
            source,
        })?;

    info!(
        port,
        baud = config.baud,
        parity = %config.parity,
        invert = config.invert,
        "capture device configured"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use uartlog_port::Parity;

    use super::*;
    use crate::error::CaptureError;

    #[test]
    fn writes_command_line() {
        let mut sent = Vec::new();
        let config = LinkConfig {
            baud: 19_200,
            parity: Parity::Odd,
            invert: true,
        };
        configure_link(&mut sent, "mem", &config).unwrap();
        assert_eq!(sent, b"s19200,O,1\n");
    }

    #[test]
    fn invalid_config_sends_nothing() {
        let mut sent = Vec::new();
        let config = LinkConfig {
            baud: 0,
            ..LinkConfig::default()
        };
        let err = configure_link(&mut sent, "mem", &config).unwrap_err();
        assert!(matches!(err, CaptureError::Port(PortError::InvalidConfig(_))));
        assert!(sent.is_empty());
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_names_the_port() {
        let err = configure_link(&mut Broken, "COM3", &LinkConfig::default()).unwrap_err();
        assert!(err.to_string().contains("COM3"));
    }
}
