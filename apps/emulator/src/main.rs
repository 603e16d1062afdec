use anyhow::{bail, Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;
use sb800_emulator::{router, shared, BoxState};

/// Bench stand-in for a SwitchBox800, answering /k0 and /k1 over HTTP
#[derive(Parser, Debug)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: String,

    /// Initial relay state as a hex byte, bit 0 = position 1
    #[arg(long, default_value = "00", value_parser = parse_hex_byte)]
    state: u8,

    /// Write-capability mask as a hex byte
    #[arg(long, default_value = "ff", value_parser = parse_hex_byte)]
    writable: u8,

    /// Report the box as reserved by another user
    #[arg(long)]
    reserved: bool,
}

fn parse_hex_byte(s: &str) -> Result<u8> {
    if s.len() != 2 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        bail!("expected two hex digits, got {:?}", s);
    }
    Ok(u8::from_str_radix(s, 16)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut state = BoxState::default();
    state.status.relays = args.state;
    state.status.writable = args.writable;
    state.status.reserved = args.reserved;

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("binding {}", args.bind))?;
    info!("SwitchBox800 emulator on http://{}", listener.local_addr()?);
    axum::serve(listener, router(shared(state))).await?;
    Ok(())
}
