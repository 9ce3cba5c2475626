mod helpers;

use helpers::{chain_with_three_blocks, random_transactions, FIXED_TS};
use powledger_core::{pow, Block, Chain, ChainError, MiningConfig};

#[test]
fn test_genesis_block() {
    let chain = chain_with_three_blocks();
    let genesis = chain.genesis_block();
    assert_eq!(genesis.hash(), "0");
    assert_eq!(genesis.index(), 0);
    assert!(genesis.transactions().is_empty());
}

#[test]
fn test_add_blocks() -> anyhow::Result<()> {
    let mut chain = chain_with_three_blocks();
    chain.add_block(vec![10, 11, 12], "f1232a23")?;
    chain.add_block(vec![13, 14, 15], "ca21239d")?;
    chain.add_block(vec![16, 17, 18], "ef323d13")?;
    // genesis plus six
    assert_eq!(chain.len(), 7);
    Ok(())
}

#[test]
fn test_last_block() -> anyhow::Result<()> {
    let mut chain = chain_with_three_blocks();
    chain.add_block(vec![19, 20, 21], "cab20b4e")?;
    let last = chain.last_block();
    assert_eq!(last.transactions(), &[19, 20, 21]);
    assert_eq!(last.previous_hash(), "cab20b4e");
    Ok(())
}

#[test]
fn test_each_append_grows_by_one_and_clears_queue() -> anyhow::Result<()> {
    let mut chain: Chain = Chain::new();
    for round in 0..5usize {
        let before = chain.len();
        chain.create_transaction(round as i64, 1, "Alice", "Bob");
        let txs = random_transactions(round as u64, 3);
        let tip = chain.last_block().hash().to_string();
        let appended = chain.add_block(txs.clone(), tip)?.clone();

        assert_eq!(chain.len(), before + 1);
        assert!(chain.pending_transactions().is_empty());
        assert_eq!(chain.last_block(), &appended);
        assert_eq!(appended.transactions(), txs.as_slice());
    }
    chain.validate()?;
    Ok(())
}

#[test]
fn test_proof_of_work_reference_scenario() -> anyhow::Result<()> {
    let mut chain = chain_with_three_blocks();
    chain.set_difficulty(1)?;
    let last = chain.last_block();
    let block = Block::new(
        last.transactions().to_vec(),
        last.previous_hash(),
        last.index(),
    )
    .with_timestamp(FIXED_TS);

    let proof = chain.mine(&block)?;
    assert_eq!(
        proof.hash,
        "0605ff9b41624664b7e20799d4d600f05cd52f97c8338759fd228c831579096f"
    );
    assert_eq!(proof.nonce, 22);
    Ok(())
}

#[test]
fn test_block_hash_vector() {
    let block = Block::new(vec!["hello world"], "ffffff", 0).with_timestamp(FIXED_TS);
    let hash = block.compute_hash(0);
    assert_eq!(
        hash,
        "5ce0d2ba32f796369bb2f70f35f8556903d6f153d1c2ec72ab0a77461128e54a"
    );
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn test_sealed_hashes_meet_every_difficulty() -> anyhow::Result<()> {
    for difficulty in 0..=3 {
        let mut chain: Chain =
            Chain::with_config(MiningConfig::default().with_difficulty(difficulty))?;
        for seed in 0..3 {
            let tip = chain.last_block().hash().to_string();
            chain.add_block(random_transactions(seed, 4), tip)?;
        }
        for block in &chain.blocks()[1..] {
            assert!(pow::meets_difficulty(block.hash(), difficulty));
            assert!(pow::leading_zero_digits(block.hash()) >= difficulty as usize);
        }
        chain.validate()?;
    }
    Ok(())
}

#[test]
fn test_parallel_chain_matches_sequential_rules() -> anyhow::Result<()> {
    let config = MiningConfig::default().with_difficulty(2).with_parallel(true);
    let mut chain: Chain = Chain::with_config(config)?;
    chain.create_transaction(100, 10, "Alice", "Bob");
    chain.mine_pending()?;
    let block = chain.last_block();
    assert!(block.hash().starts_with("00"));
    assert_eq!(pow::mine_block(block, 2, None)?.nonce, block.nonce());
    Ok(())
}

#[test]
fn test_pending_queue_redesign_drains_what_it_used() -> anyhow::Result<()> {
    let mut chain: Chain = Chain::new();
    let tx = chain.create_transaction(100, 10, "Alice", "Bob");
    assert_eq!(chain.pending_transactions()[0], tx);

    chain.mine_pending()?;
    assert_eq!(chain.last_block().transactions(), &[tx]);
    assert_eq!(chain.last_block().previous_hash(), chain.genesis_block().hash());
    assert!(chain.pending_transactions().is_empty());
    Ok(())
}

#[test]
fn test_budget_error_message() {
    let config = MiningConfig::default().with_difficulty(10).with_max_attempts(5);
    let mut chain: Chain<u32> = Chain::with_config(config).unwrap();
    let err = chain.add_block(vec![1], "0").unwrap_err();
    assert_eq!(
        err,
        ChainError::BudgetExhausted {
            index: 2,
            attempts: 5
        }
    );
    assert_eq!(
        err.to_string(),
        "no valid nonce found for block 2 within 5 attempts"
    );
}
