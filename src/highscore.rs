/// High-score persistence.
///
/// The score lives under a fixed key in a small JSON key-value file, so other
/// values can share the file later without a format change.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Result;

pub const HIGH_SCORE_KEY: &str = "endlessShooterHighScore";

pub trait HighScoreStore {
    /// Stored high score, 0 when nothing has been saved yet.
    fn load(&self) -> Result<u32>;
    fn save(&mut self, score: u32) -> Result<()>;
}

/// In-memory store, handy for tests and for running without a home directory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pub score: Option<u32>,
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<u32> {
        Ok(self.score.unwrap_or(0))
    }

    fn save(&mut self, score: u32) -> Result<()> {
        self.score = Some(score);
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    /// `$HOME/.sky_shooter.json`, or the working directory without a home.
    pub fn in_home() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        FileStore::new(PathBuf::from(home).join(".sky_shooter.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, u32>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl HighScoreStore for FileStore {
    fn load(&self) -> Result<u32> {
        let entries = self.read_entries()?;
        Ok(entries.get(HIGH_SCORE_KEY).copied().unwrap_or(0))
    }

    fn save(&mut self, score: u32) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(HIGH_SCORE_KEY.to_string(), score);
        std::fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        log::debug!("saved high score {score} to {}", self.path.display());
        Ok(())
    }
}
