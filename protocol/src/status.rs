use crate::error::{Error, Result};

/// Bytes a `/k0` answer must carry: four hex fields and the reservation byte.
pub const STATUS_LEN: usize = 9;
const FIELD_LEN: usize = 2;
const RESERVED: u8 = 1;

/// Snapshot of the box as reported by `/k0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusWord {
    pub relays: u8,
    pub reset: u8,
    pub readable: u8,
    pub writable: u8,
    /// Box is locked by another client.
    pub reserved: bool,
}

impl StatusWord {
    pub fn parse(body: &[u8]) -> Result<StatusWord> {
        if body.len() < STATUS_LEN {
            return Err(Error::ShortBody {
                expected: STATUS_LEN,
                got: body.len(),
            });
        }
        Ok(StatusWord {
            relays: parse_field(&body[0..2])?,
            reset: parse_field(&body[2..4])?,
            readable: parse_field(&body[4..6])?,
            writable: parse_field(&body[6..8])?,
            reserved: body[8] == RESERVED,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = format!(
            "{:02x}{:02x}{:02x}{:02x}",
            self.relays, self.reset, self.readable, self.writable
        )
        .into_bytes();
        out.push(if self.reserved { RESERVED } else { 0 });
        out
    }
}

/// Relay byte at the head of a `/k1` answer.
pub fn parse_relays(body: &[u8]) -> Result<u8> {
    if body.len() < FIELD_LEN {
        return Err(Error::ShortBody {
            expected: FIELD_LEN,
            got: body.len(),
        });
    }
    parse_field(&body[0..FIELD_LEN])
}

fn parse_field(pair: &[u8]) -> Result<u8> {
    let not_hex = || Error::NotHex(String::from_utf8_lossy(pair).into_owned());
    if pair.len() != FIELD_LEN || !pair.iter().all(u8::is_ascii_hexdigit) {
        return Err(not_hex());
    }
    let text = std::str::from_utf8(pair).map_err(|_| not_hex())?;
    u8::from_str_radix(text, 16).map_err(|_| not_hex())
}

/// Renders a bit field under the `1 2 3 4 5 6 7 8` column header.
///
/// Each bit of the `%08b` rendering is prepended, so column 1 ends up holding
/// the least significant bit and column 8 the most significant one.
pub fn format_bits(byte: u8) -> String {
    let mut out = String::with_capacity(2 * 8);
    for bit in format!("{:08b}", byte).chars() {
        out.insert(0, bit);
        out.insert(0, ' ');
    }
    out.split_off(1)
}

pub fn decode_and_format(pair: &str) -> Result<String> {
    parse_field(pair.as_bytes()).map(format_bits)
}
