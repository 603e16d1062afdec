use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("Position must be 1-8 (got {0})")]
    InvalidPosition(i64),

    #[error("malformed command word {0:?}")]
    InvalidCommand(String),

    #[error("response too short: expected at least {expected} bytes, got {got}")]
    ShortBody { expected: usize, got: usize },

    #[error("status field {0:?} is not a hex byte")]
    NotHex(String),

    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    HttpStatus { url: String, status: u16 },
}

impl Error {
    /// The device answered, but with bytes this client cannot make sense of.
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::ShortBody { .. } | Error::NotHex(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. } | Error::HttpStatus { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
