//! High score persistence seam
//!
//! The best score is a single non-negative integer. Loading is recoverable
//! (any failure means "no record yet"), saving is best-effort.

use std::fmt;
use std::num::ParseIntError;

/// Failure while reading or writing the stored high score
#[derive(Debug)]
pub enum HighScoreError {
    /// Storage could not be read or written
    Io(std::io::Error),
    /// Stored contents are not a decimal integer
    Parse(ParseIntError),
}

impl fmt::Display for HighScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighScoreError::Io(e) => write!(f, "high score storage error: {e}"),
            HighScoreError::Parse(e) => write!(f, "malformed high score: {e}"),
        }
    }
}

impl std::error::Error for HighScoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HighScoreError::Io(e) => Some(e),
            HighScoreError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for HighScoreError {
    fn from(e: std::io::Error) -> Self {
        HighScoreError::Io(e)
    }
}

impl From<ParseIntError> for HighScoreError {
    fn from(e: ParseIntError) -> Self {
        HighScoreError::Parse(e)
    }
}

/// Where the best score lives between runs
pub trait HighScoreStore {
    fn load(&self) -> Result<u64, HighScoreError>;
    fn save(&mut self, score: u64) -> Result<(), HighScoreError>;
}

/// Parse stored contents (surrounding whitespace is ignored)
pub fn parse_high_score(raw: &str) -> Result<u64, HighScoreError> {
    Ok(raw.trim().parse::<u64>()?)
}

/// Load the stored score, treating any failure as zero
pub fn load_or_zero(store: &dyn HighScoreStore) -> u64 {
    match store.load() {
        Ok(score) => {
            log::info!("Loaded high score {}", score);
            score
        }
        Err(e) => {
            log::warn!("{}, starting from 0", e);
            0
        }
    }
}

/// In-memory store for tests and hosts without storage
///
/// Holds the raw text so corrupt contents can be simulated.
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    contents: Option<String>,
}

impl MemoryHighScoreStore {
    /// Empty store (no record yet)
    pub fn new() -> Self {
        Self { contents: None }
    }

    /// Store pre-filled with raw contents
    pub fn with_contents(raw: impl Into<String>) -> Self {
        Self {
            contents: Some(raw.into()),
        }
    }

    /// Raw stored text, if anything was ever written
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&self) -> Result<u64, HighScoreError> {
        match &self.contents {
            Some(raw) => parse_high_score(raw),
            None => Err(HighScoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no high score saved",
            ))),
        }
    }

    fn save(&mut self, score: u64) -> Result<(), HighScoreError> {
        self.contents = Some(score.to_string());
        Ok(())
    }
}
