use std::fmt;

use tracing::{debug, info, warn};

use crate::config::{check_difficulty, MiningConfig};
use crate::error::{ChainError, Result};
use crate::mine::mine_block_parallel;
use crate::pow::mine_block;
use crate::{Block, Proof, Transaction};

/// An in-memory, append-only sequence of blocks starting at genesis.
///
/// `T` is the transaction payload stored in blocks. Anything with a stable
/// [`fmt::Display`] can be hashed.
#[derive(Clone, Debug)]
pub struct Chain<T = Transaction> {
    blocks: Vec<Block<T>>,
    pending: Vec<Transaction>,
    config: MiningConfig,
}

impl<T: fmt::Display> Default for Chain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Display> Chain<T> {
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::genesis()],
            pending: Vec::new(),
            config: MiningConfig::default(),
        }
    }

    pub fn with_config(config: MiningConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    pub fn config(&self) -> &MiningConfig {
        &self.config
    }

    pub fn difficulty(&self) -> u32 {
        self.config.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: u32) -> Result<()> {
        check_difficulty(difficulty)?;
        self.config.difficulty = difficulty;
        Ok(())
    }

    pub fn blocks(&self) -> &[Block<T>] {
        &self.blocks
    }

    /// Number of blocks, genesis included. Never zero.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn pending_transactions(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn genesis_block(&self) -> &Block<T> {
        &self.blocks[0]
    }

    pub fn last_block(&self) -> &Block<T> {
        // genesis is always present
        &self.blocks[self.blocks.len() - 1]
    }

    /// Queue a transaction for a later block and hand back a copy of it.
    pub fn create_transaction(
        &mut self,
        amount: i64,
        fee: i64,
        sender: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Transaction {
        let tx = Transaction {
            amount,
            fee,
            sender: sender.into(),
            recipient: recipient.into(),
        };
        self.pending.push(tx.clone());
        tx
    }

    /// Search for a nonce that satisfies the chain's difficulty.
    ///
    /// The block is not modified; pass the result to [`Block::seal`].
    pub fn mine(&self, block: &Block<T>) -> Result<Proof> {
        let MiningConfig {
            difficulty,
            max_attempts,
            parallel,
        } = self.config;

        let result = if parallel {
            mine_block_parallel(block, difficulty, max_attempts)
        } else {
            mine_block(block, difficulty, max_attempts)
        };

        match &result {
            Ok(proof) => info!(
                "Mined block {} with nonce {} and hash {}",
                block.index(),
                proof.nonce,
                proof.hash
            ),
            Err(err) => warn!("mining block {} failed: {err}", block.index()),
        }
        result
    }

    /// Mine, seal and append a block holding `transactions`.
    ///
    /// The new index is the current length plus one. `previous_hash` is taken
    /// as given. The pending queue is emptied whether or not `transactions`
    /// came from it; if mining fails nothing is appended and the queue is kept.
    pub fn add_block(
        &mut self,
        transactions: Vec<T>,
        previous_hash: impl Into<String>,
    ) -> Result<&Block<T>> {
        let index = self.blocks.len() as u64 + 1;
        let mut block = Block::new(transactions, previous_hash, index);

        let proof = self.mine(&block)?;
        block.seal(proof)?;

        if !self.pending.is_empty() {
            debug!("dropping {} pending transactions", self.pending.len());
        }
        self.pending.clear();
        self.blocks.push(block);
        debug!("appended block {index}, chain length {}", self.blocks.len());
        Ok(self.last_block())
    }

    /// Re-derive every block hash and check each block points at its
    /// predecessor. Genesis is skipped.
    pub fn validate(&self) -> Result<()> {
        for pair in self.blocks.windows(2) {
            let (prev, block) = (&pair[0], &pair[1]);
            if block.compute_hash(block.nonce()) != block.hash() {
                return Err(ChainError::TamperedBlock {
                    index: block.index(),
                });
            }
            if block.previous_hash() != prev.hash() {
                return Err(ChainError::BrokenLink {
                    index: block.index(),
                });
            }
        }
        Ok(())
    }
}

impl Chain<Transaction> {
    /// Put the whole pending queue into a block linked to the current tip.
    pub fn mine_pending(&mut self) -> Result<&Block<Transaction>> {
        let previous_hash = self.last_block().hash().to_string();
        let transactions = self.pending.clone();
        self.add_block(transactions, previous_hash)
    }
}
