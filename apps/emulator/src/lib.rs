use axum::{extract::State, http::StatusCode, http::Uri, Router};
use chrono::{DateTime, Local};
use log::{error, info};
use sb800_protocol::relay::{COMMAND_PREFIX, STATUS_PATH};
use sb800_protocol::{CommandWord, StatusWord};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};

/// Oldest requests are dropped past this many.
pub const JOURNAL_LIMIT: usize = 1024;

#[derive(Debug, Clone)]
pub struct Request {
    pub at: DateTime<Local>,
    pub path: String,
}

/// In-memory SwitchBox800.
#[derive(Debug, Clone)]
pub struct BoxState {
    pub status: StatusWord,
    pub journal: VecDeque<Request>,
}

impl Default for BoxState {
    fn default() -> Self {
        BoxState {
            status: StatusWord {
                relays: 0,
                reset: 0,
                readable: 0xff,
                writable: 0xff,
                reserved: false,
            },
            journal: VecDeque::new(),
        }
    }
}

impl BoxState {
    /// Channels without write capability keep their state, and a box
    /// reserved by another client ignores writes altogether.
    pub fn apply(&mut self, word: CommandWord) {
        if self.status.reserved {
            return;
        }
        let writable = self.status.writable;
        let relays = self.status.relays;
        self.status.relays = (relays | (word.on & writable)) & !(word.off & writable);
    }

    pub fn record(&mut self, at: DateTime<Local>, path: &str) {
        if self.journal.len() == JOURNAL_LIMIT {
            self.journal.pop_front();
        }
        self.journal.push_back(Request {
            at,
            path: path.to_owned(),
        });
    }

    pub fn paths(&self) -> Vec<String> {
        self.journal.iter().map(|r| r.path.clone()).collect()
    }
}

pub type SharedState = Arc<RwLock<BoxState>>;

pub fn shared(state: BoxState) -> SharedState {
    Arc::new(RwLock::new(state))
}

pub fn router(state: SharedState) -> Router {
    Router::new().fallback(handle).with_state(state)
}

async fn handle(State(state): State<SharedState>, uri: Uri) -> (StatusCode, Vec<u8>) {
    let path = uri.path();
    let now = Local::now();
    info!("{}: GET {}", now.format("%a %d %b %H:%M:%S"), path);

    let mut state = state.write().unwrap();
    state.record(now, path);

    if path == STATUS_PATH {
        return (StatusCode::OK, state.status.to_bytes());
    }
    match path.strip_prefix(COMMAND_PREFIX).map(str::parse::<CommandWord>) {
        Some(Ok(word)) => {
            state.apply(word);
            (StatusCode::OK, state.status.to_bytes())
        }
        Some(Err(e)) => (StatusCode::BAD_REQUEST, e.to_string().into_bytes()),
        None => (StatusCode::NOT_FOUND, b"not found".to_vec()),
    }
}

/// Serves the emulator from a thread of its own on an ephemeral port of
/// 127.0.0.1. The socket is bound before returning, so clients can connect
/// straight away.
pub fn serve_in_background(state: SharedState) -> anyhow::Result<SocketAddr> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    listener.set_nonblocking(true)?;
    let addr = listener.local_addr()?;
    let app = router(state);

    std::thread::spawn(move || {
        if let Err(e) = serve_blocking(listener, app) {
            error!("emulator on {} stopped: {:#}", addr, e);
        }
    });
    Ok(addr)
}

fn serve_blocking(listener: std::net::TcpListener, app: Router) -> anyhow::Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(async move {
        let listener = tokio::net::TcpListener::from_std(listener)?;
        axum::serve(listener, app).await?;
        Ok::<(), anyhow::Error>(())
    })
}
