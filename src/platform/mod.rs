//! Platform helpers for native hosts
//!
//! - Fixed-step frame clock
//! - File-backed high score storage

pub mod clock;
pub mod storage;

pub use clock::FixedStep;
pub use storage::FileHighScoreStore;
