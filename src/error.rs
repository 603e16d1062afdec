use sb800_protocol::Error as DeviceError;
use std::io;
use std::path::PathBuf;
use thiserror::Error as ThisError;

pub const EXIT_USAGE: u8 = 1;
pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_TRANSPORT: u8 = 3;
pub const EXIT_DECODE: u8 = 4;
pub const EXIT_INTERNAL: u8 = 5;

#[derive(ThisError, Debug)]
pub enum CliError {
    #[error("Position must be 1-8")]
    BadPosition,

    #[error("Please specify --on, --off or --reset")]
    NoAction,

    #[error("no SwitchBox800 url stored in {}, pass one with --url", .0.display())]
    NoUrl(PathBuf),

    #[error("cannot locate the home directory for the config file")]
    NoHome,

    #[error("cannot access {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::BadPosition | CliError::NoAction => EXIT_USAGE,
            CliError::NoUrl(_) | CliError::NoHome | CliError::Config { .. } => EXIT_CONFIG,
        }
    }
}

/// Exit code for the first error in the chain that carries a known kind.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<CliError>() {
            return e.exit_code();
        }
        if let Some(e) = cause.downcast_ref::<DeviceError>() {
            return if e.is_decode() {
                EXIT_DECODE
            } else if e.is_transport() {
                EXIT_TRANSPORT
            } else {
                EXIT_USAGE
            };
        }
    }
    EXIT_INTERNAL
}
