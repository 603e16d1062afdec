use crate::command::CommandWord;
use crate::error::{Error, Result};
use crate::status::{self, StatusWord};
use log::debug;
use reqwest::blocking::Client;
use std::time::Duration;

pub const TIMEOUT: Duration = Duration::from_secs(10);
pub const STATUS_PATH: &str = "/k0";
pub const COMMAND_PREFIX: &str = "/k1";

/// Issues a GET against the box and hands back the raw body.
pub trait Transport {
    fn get(&self, path: &str) -> Result<Vec<u8>>;
}

pub struct HttpTransport {
    client: Client,
    base: String,
}

impl HttpTransport {
    /// `url` is either a bare `host[:port]` or a full `http(s)://` base.
    pub fn new(url: &str) -> Result<HttpTransport> {
        let base = base_url(url);
        let client = Client::builder()
            .timeout(TIMEOUT)
            .build()
            .map_err(|source| Error::Transport {
                url: base.clone(),
                source,
            })?;
        Ok(HttpTransport { client, base })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }
}

fn base_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if url.contains("://") {
        url.to_owned()
    } else {
        format!("http://{}", url)
    }
}

impl Transport for HttpTransport {
    fn get(&self, path: &str) -> Result<Vec<u8>> {
        let url = format!("{}{}", self.base, path);
        debug!("GET {}", url);
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|source| Error::Transport {
                url: url.clone(),
                source,
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }
        let body = resp.bytes().map_err(|source| Error::Transport {
            url: url.clone(),
            source,
        })?;
        debug!("{}: {} bytes", url, body.len());
        Ok(body.to_vec())
    }
}

pub struct SwitchBox<T> {
    transport: T,
}

impl<T: Transport> SwitchBox<T> {
    pub fn new(transport: T) -> SwitchBox<T> {
        SwitchBox { transport }
    }

    pub fn status(&self) -> Result<StatusWord> {
        StatusWord::parse(&self.transport.get(STATUS_PATH)?)
    }

    /// Sends a command word and returns the relay byte the box reports back.
    pub fn send(&self, word: CommandWord) -> Result<u8> {
        let body = self
            .transport
            .get(&format!("{}{}", COMMAND_PREFIX, word))?;
        status::parse_relays(&body)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}
