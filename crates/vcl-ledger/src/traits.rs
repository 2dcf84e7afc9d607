use crate::entry::LedgerEntry;
use crate::error::LedgerError;
use crate::tally::Tally;

/// Write boundary for ledger mutations.
pub trait LedgerWriter: Send + Sync {
    fn append(&self, voter_id: &str, choice: &str) -> Result<(), LedgerError>;

    fn close(&self) -> Result<(), LedgerError>;
}

/// Read boundary for tallies, traversal and verification.
///
/// Every call observes one consistent state of the ledger.
pub trait LedgerReader: Send + Sync {
    fn tally_for(&self, candidate: &str) -> Result<u64, LedgerError>;

    fn tally_all(&self, candidates: &[String]) -> Result<Tally, LedgerError>;

    fn entries(&self) -> Result<Vec<LedgerEntry>, LedgerError>;

    fn verify_integrity(&self) -> Result<(), LedgerError>;

    fn is_closed(&self) -> Result<bool, LedgerError>;

    fn entry_count(&self) -> Result<usize, LedgerError>;
}
