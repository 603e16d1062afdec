use crate::error::CliError;
use log::{debug, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = ".config/sb800-cli";
const CONFIG_FILE: &str = "config";

pub fn config_path(home: &Path) -> PathBuf {
    home.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Device URL for this run: the `--url` value, which is stored for later
/// runs, or else whatever an earlier run stored under `home`. Without a home
/// directory a `--url` value is still used, just not remembered.
pub fn resolve_url(flag: Option<&str>, home: Option<&Path>) -> Result<String, CliError> {
    let flag = flag.map(str::trim).filter(|url| !url.is_empty());
    let path = match home {
        Some(home) => config_path(home),
        None => {
            let url = flag.ok_or(CliError::NoHome)?;
            warn!("no home directory, {} will not be remembered", url);
            return Ok(url.to_owned());
        }
    };

    match flag {
        Some(url) => {
            store(&path, url)?;
            Ok(url.to_owned())
        }
        None => load(&path),
    }
}

fn store(path: &Path, url: &str) -> Result<(), CliError> {
    let config_err = |source: std::io::Error| CliError::Config {
        path: path.to_owned(),
        source,
    };
    if let Some(dir) = path.parent() {
        create_private_dir(dir).map_err(config_err)?;
    }
    fs::write(path, url).map_err(config_err)?;
    debug!("stored url {} in {}", url, path.display());
    Ok(())
}

fn load(path: &Path) -> Result<String, CliError> {
    let url = match fs::read_to_string(path) {
        Ok(text) => text.trim().to_owned(),
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(CliError::NoUrl(path.to_owned())),
        Err(source) => {
            return Err(CliError::Config {
                path: path.to_owned(),
                source,
            })
        }
    };
    if url.is_empty() {
        return Err(CliError::NoUrl(path.to_owned()));
    }
    debug!("loaded url {} from {}", url, path.display());
    Ok(url)
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_round_trip() -> anyhow::Result<()> {
        let home = tempfile::tempdir()?;
        let url = resolve_url(Some("http://host:1234"), Some(home.path()))?;
        assert_eq!(url, "http://host:1234");
        assert_eq!(resolve_url(None, Some(home.path()))?, "http://host:1234");
        assert_eq!(
            fs::read_to_string(home.path().join(".config/sb800-cli/config"))?,
            "http://host:1234"
        );
        Ok(())
    }

    #[test]
    fn flag_overwrites_stored_url() -> anyhow::Result<()> {
        let home = tempfile::tempdir()?;
        resolve_url(Some("10.0.0.1"), Some(home.path()))?;
        resolve_url(Some("10.0.0.2:81"), Some(home.path()))?;
        assert_eq!(resolve_url(None, Some(home.path()))?, "10.0.0.2:81");
        Ok(())
    }

    #[test]
    fn stored_url_is_trimmed() -> anyhow::Result<()> {
        let home = tempfile::tempdir()?;
        let path = config_path(home.path());
        fs::create_dir_all(path.parent().unwrap())?;
        fs::write(&path, "box.local\n")?;
        assert_eq!(resolve_url(None, Some(home.path()))?, "box.local");
        Ok(())
    }

    #[test]
    fn nothing_stored() -> anyhow::Result<()> {
        let home = tempfile::tempdir()?;
        let err = resolve_url(None, Some(home.path())).unwrap_err();
        assert!(matches!(err, CliError::NoUrl(_)));
        let err = resolve_url(Some("  "), Some(home.path())).unwrap_err();
        assert!(matches!(err, CliError::NoUrl(_)));
        Ok(())
    }

    #[test]
    fn no_home() -> anyhow::Result<()> {
        assert_eq!(resolve_url(Some(" box:81 "), None)?, "box:81");
        assert!(matches!(resolve_url(None, None), Err(CliError::NoHome)));
        assert!(matches!(resolve_url(Some(""), None), Err(CliError::NoHome)));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn config_dir_is_private() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;
        let home = tempfile::tempdir()?;
        resolve_url(Some("box"), Some(home.path()))?;
        let dir = home.path().join(".config/sb800-cli");
        assert_eq!(fs::metadata(dir)?.permissions().mode() & 0o777, 0o700);
        Ok(())
    }
}
