use crate::{
    config::check_difficulty,
    digest_hex,
    error::Result,
    pow::{exhausted, last_nonce, meets_difficulty},
    Block, Proof,
};
use rayon::prelude::*;
use std::fmt;
use tracing::debug;

/// Nonces handed to the thread pool per round.
const NONCE_WINDOW: u64 = 1 << 14;

/// Searches nonces in parallel until a hash has at least `difficulty` leading
/// zero digits.
///
/// The nonce space is walked in fixed windows, and every worker shares the
/// current window. Inside a window `find_map_first` keeps the lowest
/// qualifying nonce, so the result agrees with [`crate::pow::mine_block`].
pub fn mine_block_parallel<T: fmt::Display>(
    block: &Block<T>,
    difficulty: u32,
    max_attempts: Option<u64>,
) -> Result<Proof> {
    check_difficulty(difficulty)?;

    // Only the nonce varies per attempt.
    let prefix = block.header_prefix();
    debug!(
        "parallel search for block {} on {} threads",
        block.index(),
        rayon::current_num_threads()
    );

    search_windows(max_attempts, NONCE_WINDOW, |nonce| {
        let hash = digest_hex(&prefix, nonce);
        meets_difficulty(&hash, difficulty).then_some(hash)
    })
    .map(|(nonce, hash)| Proof { hash, nonce })
    .ok_or_else(|| exhausted(block.index(), max_attempts))
}

/// Run `check` over `0..max_attempts` one window at a time and return the
/// lowest nonce it accepts.
fn search_windows<F>(max_attempts: Option<u64>, window: u64, check: F) -> Option<(u64, String)>
where
    F: Fn(u64) -> Option<String> + Sync + Send,
{
    let last = last_nonce(max_attempts)?;
    let span = window.max(1) - 1;
    let mut start = 0u64;
    loop {
        let end = start.saturating_add(span).min(last);
        let found = (start..=end)
            .into_par_iter()
            .find_map_first(|nonce| check(nonce).map(|hash| (nonce, hash)));
        if found.is_some() || end == last {
            return found;
        }
        start = end + 1;
    }
}
