use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{PortError, Result};

/// Baud rate of the host link to the capture device.
///
/// The sniffed line rate is sent to the device in the configuration command;
/// the host side always talks at this rate.
pub const CONTROL_BAUD: u32 = 115_200;

/// Read timeout applied to serial links. Short enough that an empty read
/// doubles as the idle signal.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Parity of the sniffed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parity {
    #[default]
    None,
    Even,
    Odd,
}

impl Parity {
    /// Single-letter wire form used in the configuration command.
    pub fn letter(self) -> char {
        match self {
            Parity::None => 'N',
            Parity::Even => 'E',
            Parity::Odd => 'O',
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Parity {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "N" | "NONE" => Ok(Parity::None),
            "E" | "EVEN" => Ok(Parity::Even),
            "O" | "ODD" => Ok(Parity::Odd),
            other => Err(PortError::InvalidConfig(format!(
                "parity must be one of N, E, O (got {other:?})"
            ))),
        }
    }
}

/// Line settings the capture device applies to the sniffed UART.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkConfig {
    /// Baud rate of the sniffed line.
    pub baud: u32,
    /// Parity of the sniffed line.
    pub parity: Parity,
    /// Whether the device should invert the line polarity.
    pub invert: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            baud: 9600,
            parity: Parity::None,
            invert: false,
        }
    }
}

impl LinkConfig {
    /// Reject settings the device cannot apply.
    pub fn validate(&self) -> Result<()> {
        if self.baud == 0 {
            return Err(PortError::InvalidConfig(
                "baud rate must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The one-line configuration command: `s{baud},{PARITY},{invert}\n`.
    pub fn command(&self) -> String {
        format!(
            "s{},{},{}\n",
            self.baud,
            self.parity.letter(),
            u8::from(self.invert)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_matches_device_syntax() {
        let config = LinkConfig {
            baud: 9600,
            parity: Parity::None,
            invert: true,
        };
        assert_eq!(config.command(), "s9600,N,1\n");

        let config = LinkConfig {
            baud: 115_200,
            parity: Parity::Even,
            invert: false,
        };
        assert_eq!(config.command(), "s115200,E,0\n");
    }

    #[test]
    fn parity_parses_either_case() {
        assert_eq!("n".parse::<Parity>().unwrap(), Parity::None);
        assert_eq!("E".parse::<Parity>().unwrap(), Parity::Even);
        assert_eq!("o".parse::<Parity>().unwrap(), Parity::Odd);
        assert_eq!("odd".parse::<Parity>().unwrap(), Parity::Odd);
        assert!(matches!(
            "x".parse::<Parity>(),
            Err(PortError::InvalidConfig(_))
        ));
    }

    #[test]
    fn zero_baud_is_rejected() {
        let config = LinkConfig {
            baud: 0,
            ..LinkConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(LinkConfig::default().validate().is_ok());
    }
}
