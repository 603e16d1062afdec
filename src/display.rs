use sb800_protocol::{format_bits, StatusWord};
use std::io::{Result, Write};

const HEADER: &str = "\n               \t 1 2 3 4 5 6 7 8\n               \t ---------------\n";

pub fn header(out: &mut impl Write) -> Result<()> {
    write!(out, "{}", HEADER)
}

/// One bit field, lined up under the header columns.
pub fn bits(out: &mut impl Write, byte: u8) -> Result<()> {
    writeln!(out, " {}", format_bits(byte))
}

pub fn status(out: &mut impl Write, s: &StatusWord) -> Result<()> {
    header(out)?;
    for (label, byte) in [
        ("Current status:", s.relays),
        ("Reset ongoing:", s.reset),
        ("Read possible:", s.readable),
        ("Write possible:", s.writable),
    ] {
        write!(out, "{}\t", label)?;
        bits(out, byte)?;
    }
    writeln!(out, "\nBox reserved by other user:\t{}", s.reserved)
}
