use anyhow::{Context, Result, bail};
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use tally_backup::JsonFileStore;

/// `$TALLY_HOME` if set, else `$HOME/.tally`.
pub fn tally_home() -> Result<PathBuf> {
    resolve_home(std::env::var_os("TALLY_HOME"), std::env::var_os("HOME"))
}

fn resolve_home(tally_home: Option<OsString>, home: Option<OsString>) -> Result<PathBuf> {
    match (tally_home.filter(|h| !h.is_empty()), home) {
        (Some(dir), _) => Ok(PathBuf::from(dir)),
        (None, Some(home)) => Ok(PathBuf::from(home).join(".tally")),
        (None, None) => bail!("neither TALLY_HOME nor HOME is set"),
    }
}

pub fn ensure_tally_home() -> Result<PathBuf> {
    let dir = tally_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn data_path() -> Result<PathBuf> {
    Ok(ensure_tally_home()?.join("transactions.json"))
}

pub fn open_store() -> Result<JsonFileStore> {
    let p = data_path()?;
    JsonFileStore::open(&p).with_context(|| format!("open {}", p.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_home_wins() {
        let dir = resolve_home(Some("/data/tally".into()), Some("/home/u".into())).unwrap();
        assert_eq!(dir, PathBuf::from("/data/tally"));
    }

    #[test]
    fn test_falls_back_to_home() {
        let dir = resolve_home(Some("".into()), Some("/home/u".into())).unwrap();
        assert_eq!(dir, PathBuf::from("/home/u/.tally"));
        assert!(resolve_home(None, None).is_err());
    }
}
