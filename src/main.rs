mod config;
mod display;
mod error;
mod session;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::debug;
use sb800_protocol::{HttpTransport, SwitchBox};
use std::io::{stdout, Write};
use std::process::ExitCode;

use crate::error::{exit_code, EXIT_USAGE};
use crate::session::Plan;

/// cli for SwitchBox800
#[derive(Parser, Debug)]
#[command(name = "sb800-cli", version)]
struct Cli {
    /// Url of switchbox800, remembered for later runs
    #[arg(long)]
    url: Option<String>,

    /// Print status then quit
    #[arg(long)]
    status: bool,

    /// Position of switch to perform action on (1-8)
    #[arg(long, allow_hyphen_values = true)]
    position: Option<i64>,

    /// Time in ms to sleep during reset or off/on action
    #[arg(long, default_value_t = 500)]
    sleep: u64,

    /// Turn switch on
    #[arg(long)]
    on: bool,

    /// Turn switch off
    #[arg(long)]
    off: bool,

    /// Turn switch off, sleep, then turn switch on
    #[arg(long)]
    reset: bool,
}

fn run(cli: Cli) -> Result<()> {
    let home = dirs::home_dir();
    let url = config::resolve_url(cli.url.as_deref(), home.as_deref())?;
    let sb = SwitchBox::new(HttpTransport::new(&url)?);
    debug!("using {}", sb.transport().base_url());

    let mut out = stdout().lock();

    if cli.status {
        let status = sb.status().context("reading status")?;
        display::status(&mut out, &status)?;
        out.flush()?;
        return Ok(());
    }

    let plan = Plan::from_flags(cli.position, cli.on, cli.off, cli.reset, cli.sleep)?;
    writeln!(out, "\nConnecting to SwitchBox800 ({})", url)?;
    session::execute(&sb, &plan, &mut out)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // --help and --version land here too
            return if err.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = exit_code(&err);
            if code == EXIT_USAGE {
                let _ = writeln!(stdout(), "{}", err);
            } else {
                eprintln!("Error: {:#}", err);
            }
            ExitCode::from(code)
        }
    }
}
