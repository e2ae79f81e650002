//! File-backed high score storage
//!
//! The file holds one decimal integer followed by a newline.

use std::fs;
use std::path::{Path, PathBuf};

use crate::highscores::{HighScoreError, HighScoreStore, parse_high_score};

/// High score kept in a single text file
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&self) -> Result<u64, HighScoreError> {
        let raw = fs::read_to_string(&self.path)?;
        parse_high_score(&raw)
    }

    fn save(&mut self, score: u64) -> Result<(), HighScoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, format!("{score}\n"))?;
        log::info!("High score {} saved to {}", score, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::load_or_zero;

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("highscore.txt");

        let mut store = FileHighScoreStore::new(&path);
        assert!(matches!(store.load(), Err(HighScoreError::Io(_))));

        store.save(250).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "250\n");

        let reloaded = FileHighScoreStore::new(&path);
        assert_eq!(reloaded.load().unwrap(), 250);
    }

    #[test]
    fn test_corrupt_file_loads_as_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscore.txt");
        fs::write(&path, "not a number").unwrap();

        let store = FileHighScoreStore::new(&path);
        assert!(matches!(store.load(), Err(HighScoreError::Parse(_))));
        assert_eq!(load_or_zero(&store), 0);
    }
}
