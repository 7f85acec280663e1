//! Ledger constants

/// Maximum height difference tolerated between the best-known chain and a
/// block's insertion point. A block whose parent sits more than this many
/// heights behind the maximum is rejected, which also bounds how much of
/// the tree must stay resident.
pub const CUT_OFF_AGE: u64 = 10;

/// Maximum value carried by a single output, in base units
pub const MAX_MONEY: i64 = 21_000_000 * 100_000_000;

/// Maximum number of inputs per transaction
pub const MAX_INPUTS: usize = 1000;

/// Maximum number of outputs per transaction
pub const MAX_OUTPUTS: usize = 1000;
