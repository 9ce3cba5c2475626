#![allow(dead_code)]

use powledger_core::{Chain, Transaction};
use rand::{rngs::StdRng, Rng, SeedableRng};

pub const FIXED_TS: u64 = 1_679_517_559;

/// A chain with three numeric blocks on top of genesis, using the
/// caller-supplied (unlinked) previous hashes.
pub fn chain_with_three_blocks() -> Chain<u32> {
    let mut chain = Chain::new();
    chain.add_block(vec![1, 2, 3], "0").expect("mine block 1");
    chain.add_block(vec![4, 5, 6], "af21239d").expect("mine block 2");
    chain.add_block(vec![7, 8, 9], "f1232a23").expect("mine block 3");
    chain
}

pub fn random_transactions(seed: u64, count: usize) -> Vec<Transaction> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| Transaction {
            amount: rng.gen_range(-1_000..1_000),
            fee: rng.gen_range(0..50),
            sender: format!("sender-{i}"),
            recipient: format!("recipient-{}", rng.gen::<u16>()),
        })
        .collect()
}
