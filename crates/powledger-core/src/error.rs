use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("difficulty {difficulty} exceeds the {max} hex digits of a block hash")]
    DifficultyOutOfRange { difficulty: u32, max: usize },

    #[error("no valid nonce found for block {index} within {attempts} attempts")]
    BudgetExhausted { index: u64, attempts: u64 },

    #[error("every nonce was tried for block {index} without a match")]
    NonceSpaceExhausted { index: u64 },

    #[error("block {index} is already sealed")]
    AlreadySealed { index: u64 },

    #[error("proof for block {index} does not match its contents")]
    ProofMismatch { index: u64 },

    #[error("block {index} hash does not match its contents")]
    TamperedBlock { index: u64 },

    #[error("block {index} does not link to the hash of its predecessor")]
    BrokenLink { index: u64 },
}

pub type Result<T> = std::result::Result<T, ChainError>;
