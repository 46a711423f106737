use anyhow::{Context, Result};
use chrono::Utc;
use clap::ValueEnum;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use tally_backup::{backup_filename, export_json, import_json, read_csv, restore_into, write_csv};
use tally_core::ClockIds;

use crate::state;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Csv,
}

pub fn export(format: Format, out: Option<PathBuf>) -> Result<()> {
    let store = state::open_store()?;
    let now = Utc::now();
    let out = out.unwrap_or_else(|| {
        let name = PathBuf::from(backup_filename(now));
        match format {
            Format::Json => name,
            Format::Csv => name.with_extension("csv"),
        }
    });

    match format {
        Format::Json => {
            let json = export_json(store.records(), now)?;
            fs::write(&out, json).with_context(|| format!("write {}", out.display()))?;
        }
        Format::Csv => {
            let file = File::create(&out).with_context(|| format!("create {}", out.display()))?;
            write_csv(BufWriter::new(file), store.records())?;
        }
    }

    println!("Exported {} transactions to {}", store.records().len(), out.display());
    Ok(())
}

pub fn import(path: &Path) -> Result<()> {
    let ids = ClockIds::new();
    let txns = if is_csv(path) {
        let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        read_csv(file, &ids).with_context(|| format!("parse {}", path.display()))?
    } else {
        let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        import_json(&text).with_context(|| format!("parse {}", path.display()))?
    };

    let mut store = state::open_store()?;
    let count = restore_into(&mut store, txns, &ids)?;
    println!("Imported {} transactions from {}", count, path.display());
    Ok(())
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_csv() {
        assert!(is_csv(Path::new("backup.CSV")));
        assert!(!is_csv(Path::new("expense_backup_20240301_093000.json")));
        assert!(!is_csv(Path::new("notes")));
    }
}
