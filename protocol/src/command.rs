use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

pub const POSITIONS: u8 = 8;
const WORD_LEN: usize = 8;

/// One of the eight relay channels, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position(u8);

impl Position {
    pub fn new(n: i64) -> Result<Position> {
        if (1..=POSITIONS as i64).contains(&n) {
            Ok(Position(n as u8))
        } else {
            Err(Error::InvalidPosition(n))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Single-bit mask of this channel, 0x01 for position 1 up to 0x80 for 8.
    pub fn mask(self) -> u8 {
        1 << (self.0 - 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    On,
    Off,
}

/// Payload of the `/k1` endpoint: a turn-on byte, a turn-off byte and two
/// bytes that are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandWord {
    pub on: u8,
    pub off: u8,
}

impl CommandWord {
    pub fn new(position: Position, action: Action) -> CommandWord {
        match action {
            Action::On => CommandWord {
                on: position.mask(),
                off: 0,
            },
            Action::Off => CommandWord {
                on: 0,
                off: position.mask(),
            },
        }
    }
}

impl fmt::Display for CommandWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}0000", self.on, self.off)
    }
}

impl FromStr for CommandWord {
    type Err = Error;

    fn from_str(s: &str) -> Result<CommandWord> {
        if s.len() != WORD_LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidCommand(s.to_owned()));
        }
        let byte = |i: usize| {
            u8::from_str_radix(&s[i..i + 2], 16).map_err(|_| Error::InvalidCommand(s.to_owned()))
        };
        Ok(CommandWord {
            on: byte(0)?,
            off: byte(2)?,
        })
    }
}

/// Eight lowercase hex characters to append to `/k1`.
pub fn encode(position: Position, action: Action) -> String {
    CommandWord::new(position, action).to_string()
}
