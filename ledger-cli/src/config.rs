use anyhow::{bail, Context, Result};
use ledger_core::Locale;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_ledger_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ledger: LedgerSection,
    #[serde(default)]
    pub export: ExportSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSection {
    /// Merge all income of one day into a single row
    pub group_by_day: bool,
    pub show_summaries: bool,
    pub locale: Locale,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// Document title; empty means the locale's standard ledger title
    pub title: String,
    /// CSV field separator, a single character or `\t`
    pub delimiter: String,
}

impl Default for LedgerSection {
    fn default() -> Self {
        Self {
            group_by_day: true,
            show_summaries: true,
            locale: Locale::Uk,
        }
    }
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            title: String::new(),
            delimiter: ";".to_string(),
        }
    }
}

impl ExportSection {
    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_str() {
            "\\t" | "\t" | "tab" => Ok(b'\t'),
            d if d.len() == 1 => Ok(d.as_bytes()[0]),
            other => bail!("export.delimiter must be a single ASCII character, got {other:?}"),
        }
    }

    pub fn title(&self) -> Option<String> {
        Some(self.title.trim().to_string()).filter(|t| !t.is_empty())
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_ledger_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
