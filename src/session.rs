use crate::display;
use crate::error::CliError;
use anyhow::{Context, Result};
use log::debug;
use sb800_protocol::{Action, CommandWord, Position, SwitchBox, Transport};
use std::io::Write;
use std::thread::sleep;
use std::time::Duration;

/// What a switching run will do, checked before the box is contacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    pub position: Position,
    pub off: bool,
    pub on: bool,
    pub pause: Option<Duration>,
}

impl Plan {
    pub fn from_flags(
        position: Option<i64>,
        on: bool,
        off: bool,
        reset: bool,
        sleep_ms: u64,
    ) -> Result<Plan, CliError> {
        let position = position
            .and_then(|p| Position::new(p).ok())
            .ok_or(CliError::BadPosition)?;
        if !on && !off && !reset {
            return Err(CliError::NoAction);
        }
        Ok(Plan {
            position,
            off: off || reset,
            on: on || reset,
            pause: (off && on || reset).then(|| Duration::from_millis(sleep_ms)),
        })
    }
}

pub fn execute<T: Transport>(sb: &SwitchBox<T>, plan: &Plan, out: &mut impl Write) -> Result<()> {
    if plan.off {
        update(sb, CommandWord::new(plan.position, Action::Off), out)?;
    }

    if let Some(pause) = plan.pause {
        writeln!(out, "\n\t(Sleep {} ms)", pause.as_millis())?;
        out.flush()?;
        debug!("sleeping 2 x {:?}", pause);
        sleep(pause);
        sleep(pause);
    }

    if plan.on {
        update(sb, CommandWord::new(plan.position, Action::On), out)?;
    }
    Ok(())
}

fn update<T: Transport>(sb: &SwitchBox<T>, word: CommandWord, out: &mut impl Write) -> Result<()> {
    display::header(out)?;
    write!(out, "Status before:\t")?;
    let before = sb.status().context("reading status before switching")?;
    display::bits(out, before.relays)?;

    let after = sb
        .send(word)
        .with_context(|| format!("sending command {}", word))?;
    write!(out, "Status after:\t")?;
    display::bits(out, after)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
