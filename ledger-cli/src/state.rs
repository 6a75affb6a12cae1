use anyhow::{Context, Result};
use ledger_core::LedgerDocument;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

const LAST_DOCUMENT: &str = "last.json";

pub fn ledger_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("INCOME_LEDGER_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".income-ledger"))
}

pub fn ensure_ledger_home() -> Result<PathBuf> {
    let dir = ledger_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// The last built document, kept as JSON between runs.
///
/// Persistence is best effort: a failed write is logged, and a missing or
/// unreadable file reads as "nothing saved".
#[derive(Debug, Clone)]
pub struct DocumentStore {
    path: PathBuf,
}

impl DocumentStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::at(ensure_ledger_home()?.join(LAST_DOCUMENT)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, doc: &LedgerDocument) {
        if let Err(e) = self.try_save(doc) {
            warn!("could not save ledger document: {e:#}");
        }
    }

    fn try_save(&self, doc: &LedgerDocument) -> Result<()> {
        let json = serde_json::to_string_pretty(doc).context("serialize document")?;
        fs::write(&self.path, json).with_context(|| format!("write {}", self.path.display()))?;
        debug!("saved ledger document to {}", self.path.display());
        Ok(())
    }

    pub fn load(&self) -> Option<LedgerDocument> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) => {
                debug!("no saved document at {}: {e}", self.path.display());
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!("ignoring unreadable {}: {e}", self.path.display());
                None
            }
        }
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove {}", self.path.display())),
        }
    }
}
