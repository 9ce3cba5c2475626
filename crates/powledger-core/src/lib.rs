pub mod chain;
pub mod config;
pub mod constants;
pub mod error;
pub mod mine;

pub use chain::Chain;
pub use config::MiningConfig;
pub use error::{ChainError, Result};

use constants::{GENESIS_HASH, GENESIS_INDEX};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub amount: i64,
    pub fee: i64,
    pub sender: String,
    pub recipient: String,
}

/// Renders as compact JSON, which is what goes into a block header.
impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// A nonce together with the hash it produces for a given block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    pub hash: String,
    pub nonce: u64,
}

/// A batch of transactions linked to its predecessor by `previous_hash`.
///
/// A block starts unsealed (empty `hash`, `nonce == 0`) and is sealed exactly
/// once with a [`Proof`]. Fields are read-only from outside the crate so a block
/// held by a [`Chain`] cannot be edited after it was appended.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Block<T = Transaction> {
    index: u64,
    timestamp: u64,
    transactions: Vec<T>,
    previous_hash: String,
    nonce: u64,
    hash: String,
}

impl<T> Block<T> {
    pub fn new(transactions: Vec<T>, previous_hash: impl Into<String>, index: u64) -> Self {
        Self {
            index,
            timestamp: now_millis(),
            transactions,
            previous_hash: previous_hash.into(),
            nonce: 0,
            hash: String::new(),
        }
    }

    /// The first block of every chain. Its hash is the sentinel
    /// [`GENESIS_HASH`], not a digest.
    pub fn genesis() -> Self {
        let mut block = Self::new(Vec::new(), "", GENESIS_INDEX);
        block.hash = GENESIS_HASH.to_string();
        block
    }

    /// Pin the timestamp so hashes are reproducible in tests.
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn transactions(&self) -> &[T] {
        &self.transactions
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Empty until the block is sealed.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn is_sealed(&self) -> bool {
        !self.hash.is_empty()
    }

    pub fn is_genesis(&self) -> bool {
        self.index == GENESIS_INDEX && self.hash == GENESIS_HASH
    }
}

impl<T: fmt::Display> Block<T> {
    /// Everything that goes into the hash except the nonce:
    /// timestamp, transactions joined with `,`, previous hash.
    pub fn header_prefix(&self) -> String {
        let transactions = self
            .transactions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        format!("{}{}{}", self.timestamp, transactions, self.previous_hash)
    }

    /// SHA-256 of the header with `nonce` appended, as 64 lowercase hex chars.
    /// Does not touch the stored nonce or hash.
    pub fn compute_hash(&self, nonce: u64) -> String {
        digest_hex(&self.header_prefix(), nonce)
    }

    /// Fix `nonce` and `hash` from a mining result.
    pub fn seal(&mut self, proof: Proof) -> Result<()> {
        if self.is_sealed() {
            return Err(ChainError::AlreadySealed { index: self.index });
        }
        if self.compute_hash(proof.nonce) != proof.hash {
            return Err(ChainError::ProofMismatch { index: self.index });
        }
        self.nonce = proof.nonce;
        self.hash = proof.hash;
        Ok(())
    }
}

pub(crate) fn digest_hex(prefix: &str, nonce: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prefix.as_bytes());
    hasher.update(nonce.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as u64
}

pub mod pow {
    use super::{digest_hex, Block, Proof};
    use crate::config::check_difficulty;
    use crate::error::{ChainError, Result};
    use std::fmt;

    /// Mine the block by counting nonces up from zero until the hash starts
    /// with `difficulty` zero digits. The block itself is left untouched.
    pub fn mine_block<T: fmt::Display>(
        block: &Block<T>,
        difficulty: u32,
        max_attempts: Option<u64>,
    ) -> Result<Proof> {
        check_difficulty(difficulty)?;
        let prefix = block.header_prefix();
        let Some(last) = last_nonce(max_attempts) else {
            return Err(exhausted(block.index(), max_attempts));
        };

        for nonce in 0..=last {
            let hash = digest_hex(&prefix, nonce);
            if meets_difficulty(&hash, difficulty) {
                return Ok(Proof { hash, nonce });
            }
        }
        Err(exhausted(block.index(), max_attempts))
    }

    /// Highest nonce a search may try. `None` when the budget is zero.
    pub(crate) fn last_nonce(max_attempts: Option<u64>) -> Option<u64> {
        match max_attempts {
            Some(cap) => cap.checked_sub(1),
            None => Some(u64::MAX),
        }
    }

    pub(crate) fn exhausted(index: u64, max_attempts: Option<u64>) -> ChainError {
        match max_attempts {
            Some(attempts) => ChainError::BudgetExhausted { index, attempts },
            None => ChainError::NonceSpaceExhausted { index },
        }
    }

    pub fn leading_zero_digits(hash: &str) -> usize {
        hash.bytes().take_while(|b| *b == b'0').count()
    }

    pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
        leading_zero_digits(hash) >= difficulty as usize
    }
}
