pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;
pub const DEFAULT_DIFFICULTY: u32 = 1;
/// Hard-coded identity of the genesis block. Never a real digest.
pub const GENESIS_HASH: &str = "0";
pub const GENESIS_INDEX: u64 = 0;
