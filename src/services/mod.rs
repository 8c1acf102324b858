pub mod adjustment;
pub mod ledger;
pub mod movement;

/// How many times a losing writer re-reads and retries before surfacing
/// `ConcurrencyConflict` to the caller.
pub(crate) const MAX_CONFLICT_RETRIES: u32 = 3;
