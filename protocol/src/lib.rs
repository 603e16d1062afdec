//! Wire format and HTTP client for the SwitchBox800 eight-channel relay box.

pub mod command;
pub mod error;
pub mod relay;
pub mod status;

pub use command::{encode, Action, CommandWord, Position};
pub use error::{Error, Result};
pub use relay::{HttpTransport, SwitchBox, Transport};
pub use status::{decode_and_format, format_bits, StatusWord};
