//! Logical channel identifiers.
//!
//! The device multiplexes two sniffed lines onto one stream. Channel 0 is
//! tagged `A` (or `<` in dump output), channel 1 is `B` (or `>`).

use std::fmt;

/// One of the two multiplexed lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    A,
    B,
}

impl Channel {
    /// Both channels in index order.
    pub const ALL: [Channel; 2] = [Channel::A, Channel::B];

    /// Map a wire channel id; ids above 1 are not channels.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Channel::A),
            1 => Some(Channel::B),
            _ => None,
        }
    }

    /// Wire id (0 or 1).
    pub fn id(self) -> u8 {
        match self {
            Channel::A => 0,
            Channel::B => 1,
        }
    }

    /// Index into per-channel arrays.
    pub fn index(self) -> usize {
        usize::from(self.id())
    }

    /// Letter tag used in log lines.
    pub fn letter(self) -> char {
        match self {
            Channel::A => 'A',
            Channel::B => 'B',
        }
    }

    /// Direction arrow used in hex dump lines.
    pub fn arrow(self) -> char {
        match self {
            Channel::A => '<',
            Channel::B => '>',
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_map_both_ways() {
        for channel in Channel::ALL {
            assert_eq!(Channel::from_id(channel.id()), Some(channel));
        }
        assert_eq!(Channel::from_id(2), None);
        assert_eq!(Channel::from_id(0xFF), None);
    }

    #[test]
    fn tags() {
        assert_eq!(Channel::A.letter(), 'A');
        assert_eq!(Channel::B.arrow(), '>');
        assert_eq!(Channel::B.index(), 1);
        assert_eq!(Channel::A.to_string(), "A");
    }
}
