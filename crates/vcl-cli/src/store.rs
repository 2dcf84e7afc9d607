use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context};
use tempfile::NamedTempFile;
use vcl_ledger::{Ledger, LedgerSnapshot};

/// Read the snapshot stored at `path` without verifying it.
pub fn read_snapshot(path: &Path) -> anyhow::Result<LedgerSnapshot> {
    if !path.exists() {
        bail!("no ledger at {}; run `vcl init` first", path.display());
    }
    let text =
        fs::read_to_string(path).with_context(|| format!("reading ledger {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing ledger {}", path.display()))
}

/// Load and verify the ledger stored at `path`.
pub fn load_ledger(path: &Path) -> anyhow::Result<Ledger> {
    let snapshot = read_snapshot(path)?;
    Ledger::restore(snapshot)
        .with_context(|| format!("ledger {} failed verification", path.display()))
}

/// Write the ledger to `path`, replacing any previous file atomically.
pub fn save_ledger(path: &Path, ledger: &Ledger) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let json = serde_json::to_vec_pretty(&ledger.snapshot())?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&json)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("writing ledger {}", path.display()))?;

    tracing::debug!(path = %path.display(), entries = ledger.entry_count(), "ledger saved");
    Ok(())
}
