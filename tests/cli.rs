use sb800_emulator::{serve_in_background, shared, BoxState, SharedState};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn emulator(state: BoxState) -> anyhow::Result<(String, SharedState)> {
    let state = shared(state);
    let addr = serve_in_background(state.clone())?;
    Ok((addr.to_string(), state))
}

fn sb800(home: &Path, args: &[&str]) -> anyhow::Result<Output> {
    Ok(Command::new(env!("CARGO_BIN_EXE_sb800-cli"))
        .env("HOME", home)
        .env_remove("RUST_LOG")
        .args(args)
        .output()?)
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn paths(state: &SharedState) -> Vec<String> {
    state.read().unwrap().paths()
}

#[test]
fn reset_cycles_the_switch() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    let mut initial = BoxState::default();
    initial.status.relays = 0x04;
    let (url, state) = emulator(initial)?;

    let out = sb800(
        home.path(),
        &["--url", &url, "--position", "3", "--reset", "--sleep", "10"],
    )?;
    assert!(out.status.success(), "{:?}", out);
    assert_eq!(
        paths(&state),
        vec!["/k0", "/k100040000", "/k0", "/k104000000"]
    );

    let journal = state.read().unwrap().journal.clone();
    assert!(journal[2].at - journal[1].at >= chrono::Duration::milliseconds(20));

    let text = stdout(&out);
    assert!(text.contains(&format!("Connecting to SwitchBox800 ({})", url)));
    assert!(text.contains("\t(Sleep 10 ms)"));
    assert!(text.contains("Status before:\t 0 0 1 0 0 0 0 0\nStatus after:\t 0 0 0 0 0 0 0 0\n"));
    assert!(text.contains("Status before:\t 0 0 0 0 0 0 0 0\nStatus after:\t 0 0 1 0 0 0 0 0\n"));
    Ok(())
}

#[test]
fn on_without_pause() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    let (url, state) = emulator(BoxState::default())?;

    let out = sb800(home.path(), &["--url", &url, "--position", "8", "--on"])?;
    assert!(out.status.success(), "{:?}", out);
    assert_eq!(paths(&state), vec!["/k0", "/k180000000"]);
    assert!(!stdout(&out).contains("Sleep"));
    assert_eq!(state.read().unwrap().status.relays, 0x80);
    Ok(())
}

#[test]
fn status_block() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    let mut initial = BoxState::default();
    initial.status.relays = 0x05;
    initial.status.writable = 0x0f;
    initial.status.reserved = true;
    let (url, state) = emulator(initial)?;

    let out = sb800(home.path(), &["--url", &url, "--status", "--position", "2", "--on"])?;
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(paths(&state), vec!["/k0"]);

    let text = stdout(&out);
    assert!(text.contains("\t 1 2 3 4 5 6 7 8\n"));
    assert!(text.contains("Current status:\t 1 0 1 0 0 0 0 0\n"));
    assert!(text.contains("Reset ongoing:\t 0 0 0 0 0 0 0 0\n"));
    assert!(text.contains("Read possible:\t 1 1 1 1 1 1 1 1\n"));
    assert!(text.contains("Write possible:\t 1 1 1 1 0 0 0 0\n"));
    assert!(text.contains("Box reserved by other user:\ttrue"));
    Ok(())
}

#[test]
fn position_out_of_range() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    let (url, state) = emulator(BoxState::default())?;

    for position in ["0", "9"] {
        let out = sb800(home.path(), &["--url", &url, "--position", position, "--on"])?;
        assert_eq!(out.status.code(), Some(1));
        assert!(stdout(&out).contains("Position must be 1-8"));
    }
    let out = sb800(home.path(), &["--url", &url, "--off"])?;
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).contains("Position must be 1-8"));

    assert!(paths(&state).is_empty());
    Ok(())
}

#[test]
fn action_missing() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    let (url, state) = emulator(BoxState::default())?;

    let out = sb800(home.path(), &["--url", &url, "--position", "2"])?;
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).contains("Please specify --on, --off or --reset"));
    assert!(paths(&state).is_empty());
    Ok(())
}

#[test]
fn url_is_remembered() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    let (addr, state) = emulator(BoxState::default())?;
    let url = format!("http://{}", addr);

    let out = sb800(home.path(), &["--url", &url, "--status"])?;
    assert!(out.status.success(), "{:?}", out);
    assert_eq!(
        fs::read_to_string(home.path().join(".config/sb800-cli/config"))?,
        url
    );

    let out = sb800(home.path(), &["--status"])?;
    assert!(out.status.success(), "{:?}", out);
    assert_eq!(paths(&state), vec!["/k0", "/k0"]);
    Ok(())
}

#[test]
fn no_url_anywhere() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    let out = sb800(home.path(), &["--status"])?;
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("--url"));
    Ok(())
}

#[test]
fn unreachable_box() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    let closed = std::net::TcpListener::bind("127.0.0.1:0")?.local_addr()?;

    let out = sb800(
        home.path(),
        &["--url", &closed.to_string(), "--position", "1", "--on"],
    )?;
    assert_eq!(out.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&out.stderr).contains("/k0"));
    Ok(())
}

#[test]
fn error_status_from_box() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    let (addr, state) = emulator(BoxState::default())?;

    let url = format!("{}/sub", addr);
    let out = sb800(home.path(), &["--url", &url, "--status"])?;
    assert_eq!(out.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&out.stderr).contains("HTTP 404"));
    assert_eq!(paths(&state), vec!["/sub/k0"]);
    Ok(())
}

#[test]
fn malformed_arguments() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    let (url, state) = emulator(BoxState::default())?;

    let out = sb800(home.path(), &["--url", &url, "--position", "abc", "--on"])?;
    assert_eq!(out.status.code(), Some(1));
    assert!(!out.stderr.is_empty());
    assert!(paths(&state).is_empty());

    let out = sb800(home.path(), &["--version"])?;
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout(&out).contains("sb800-cli"));
    Ok(())
}
