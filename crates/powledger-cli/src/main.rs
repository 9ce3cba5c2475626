use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use powledger_core::{Block, Chain, MiningConfig};
use std::{fs, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "powledger")]
#[command(about = "Proof-of-work ledger simulation")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the hash of a block for one nonce, without searching
    Hash {
        #[command(flatten)]
        block: BlockArgs,
        /// Nonce to hash with
        #[arg(long, default_value_t = 0)]
        nonce: u64,
    },
    /// Search for a nonce that satisfies the difficulty
    Mine {
        #[command(flatten)]
        block: BlockArgs,
        #[command(flatten)]
        mining: MiningArgs,
    },
    /// Build a small chain from generated transactions and print it
    Demo {
        /// Blocks to mine on top of genesis
        #[arg(long, default_value_t = 3)]
        blocks: usize,
        #[command(flatten)]
        mining: MiningArgs,
    },
}

#[derive(Args, Debug)]
struct BlockArgs {
    /// Transaction payload, repeat for several
    #[arg(long = "tx")]
    transactions: Vec<String>,
    /// Hash of the preceding block
    #[arg(long, default_value = "")]
    previous_hash: String,
    /// Block index. Not part of the hashed header, so it only shows up in
    /// error messages
    #[arg(long, default_value_t = 1)]
    index: u64,
    /// Fixed timestamp in milliseconds; defaults to now
    #[arg(long)]
    timestamp: Option<u64>,
}

impl BlockArgs {
    fn build(self) -> Block<String> {
        let block = Block::new(self.transactions, self.previous_hash, self.index);
        match self.timestamp {
            Some(ts) => block.with_timestamp(ts),
            None => block,
        }
    }
}

#[derive(Args, Debug)]
struct MiningArgs {
    /// JSON file with mining settings; the flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Required leading zero hex digits
    #[arg(long)]
    difficulty: Option<u32>,
    /// Give up after this many nonces
    #[arg(long)]
    max_attempts: Option<u64>,
    /// Search the nonce space on all cores
    #[arg(long)]
    parallel: bool,
}

impl MiningArgs {
    fn resolve(&self) -> Result<MiningConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => MiningConfig::default(),
        };
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if let Some(max_attempts) = self.max_attempts {
            config.max_attempts = Some(max_attempts);
        }
        if self.parallel {
            config.parallel = true;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Hash { block, nonce } => {
            println!("{}", block.build().compute_hash(nonce));
        }
        Command::Mine { block, mining } => {
            let chain: Chain<String> = Chain::with_config(mining.resolve()?)?;
            let proof = chain.mine(&block.build())?;
            println!("{}", serde_json::to_string(&proof)?);
        }
        Command::Demo { blocks, mining } => {
            let mut chain: Chain = Chain::with_config(mining.resolve()?)?;
            for round in 0..blocks {
                let amount = (round as i64 + 1) * 100;
                chain.create_transaction(amount, amount / 10, "Alice", "Bob");
                chain.create_transaction(amount / 2, amount / 20, "Bob", "Carol");
                chain
                    .mine_pending()
                    .with_context(|| format!("mining block {}", round + 1))?;
            }
            chain.validate().context("demo chain failed validation")?;
            info!("demo chain of {} blocks is valid", chain.len());
            println!("{}", serde_json::to_string_pretty(chain.blocks())?);
        }
    }
    Ok(())
}
