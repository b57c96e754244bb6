//! Best score persistence
//!
//! The only thing saved between sessions is a single integer. Stores:
//! - `MemoryStore`: in-process, for tests and headless runs
//! - `JsonFileStore`: JSON file written atomically (tmp → rename)
//!
//! On disk the record is `{"bestScore": {"best": N}}`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("stored record is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Storage for the best score
pub trait BestScoreStore {
    /// Read the stored best score. No record yet reads as 0.
    fn load_best_score(&self) -> Result<u32, PersistenceError>;

    fn save_best_score(&mut self, best: u32) -> Result<(), PersistenceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct BestEntry {
    best: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Record {
    #[serde(rename = "bestScore")]
    best_score: BestEntry,
}

impl Record {
    fn new(best: u32) -> Self {
        Self {
            best_score: BestEntry { best },
        }
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: Option<u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(best: u32) -> Self {
        Self { best: Some(best) }
    }
}

impl BestScoreStore for MemoryStore {
    fn load_best_score(&self) -> Result<u32, PersistenceError> {
        Ok(self.best.unwrap_or(0))
    }

    fn save_best_score(&mut self, best: u32) -> Result<(), PersistenceError> {
        self.best = Some(best);
        Ok(())
    }
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Default file name, relative to the working directory
    pub const DEFAULT_FILE: &'static str = "popper_pig.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BestScoreStore for JsonFileStore {
    fn load_best_score(&self) -> Result<u32, PersistenceError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let record: Record = serde_json::from_str(&json)?;
        Ok(record.best_score.best)
    }

    fn save_best_score(&mut self, best: u32) -> Result<(), PersistenceError> {
        let json = serde_json::to_vec_pretty(&Record::new(best))?;
        write_atomic(&self.path, &json)?;
        log::info!("Best score {} saved to {}", best, self.path.display());
        Ok(())
    }
}

/// Write to a sibling temp file then rename over the target
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> Result<(), PersistenceError> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
