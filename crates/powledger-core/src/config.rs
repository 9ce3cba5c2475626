use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DIFFICULTY, HASH_HEX_SIZE};
use crate::error::{ChainError, Result};

/// Mining settings owned by a [`crate::chain::Chain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    /// Number of leading `'0'` hex digits a block hash must carry.
    pub difficulty: u32,
    /// Give up after this many nonces. `None` searches until a nonce is found.
    pub max_attempts: Option<u64>,
    /// Split the nonce space across the rayon thread pool.
    pub parallel: bool,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            max_attempts: None,
            parallel: false,
        }
    }
}

impl MiningConfig {
    pub fn with_difficulty(mut self, difficulty: u32) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// A difficulty above the digest length can never be satisfied.
    pub fn validate(&self) -> Result<()> {
        check_difficulty(self.difficulty)
    }
}

pub(crate) fn check_difficulty(difficulty: u32) -> Result<()> {
    if difficulty as usize > HASH_HEX_SIZE {
        return Err(ChainError::DifficultyOutOfRange {
            difficulty,
            max: HASH_HEX_SIZE,
        });
    }
    Ok(())
}
