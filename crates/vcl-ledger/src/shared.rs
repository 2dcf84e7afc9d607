use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::entry::LedgerEntry;
use crate::error::LedgerError;
use crate::ledger::Ledger;
use crate::tally::Tally;
use crate::traits::{LedgerReader, LedgerWriter};

/// A [`Ledger`] shared between several voting terminals.
///
/// Appends and close hold the write lock, so at most one mutation runs at a
/// time. Reads hold the read lock and return owned copies.
#[derive(Debug, Default)]
pub struct SharedLedger {
    inner: RwLock<Ledger>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: RwLock::new(ledger),
        }
    }

    /// Take the ledger back out, e.g. to persist it after the election.
    pub fn into_inner(self) -> Result<Ledger, LedgerError> {
        self.inner.into_inner().map_err(|_| LedgerError::LockPoisoned)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Ledger>, LedgerError> {
        self.inner.read().map_err(|_| LedgerError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Ledger>, LedgerError> {
        self.inner.write().map_err(|_| LedgerError::LockPoisoned)
    }
}

impl From<Ledger> for SharedLedger {
    fn from(ledger: Ledger) -> Self {
        Self::new(ledger)
    }
}

impl LedgerWriter for SharedLedger {
    fn append(&self, voter_id: &str, choice: &str) -> Result<(), LedgerError> {
        Ok(self.write()?.append(voter_id, choice)?)
    }

    fn close(&self) -> Result<(), LedgerError> {
        Ok(self.write()?.close()?)
    }
}

impl LedgerReader for SharedLedger {
    fn tally_for(&self, candidate: &str) -> Result<u64, LedgerError> {
        Ok(self.read()?.tally_for(candidate))
    }

    fn tally_all(&self, candidates: &[String]) -> Result<Tally, LedgerError> {
        Ok(self.read()?.tally_all(candidates))
    }

    fn entries(&self) -> Result<Vec<LedgerEntry>, LedgerError> {
        Ok(self.read()?.entries().to_vec())
    }

    fn verify_integrity(&self) -> Result<(), LedgerError> {
        Ok(self.read()?.verify_integrity()?)
    }

    fn is_closed(&self) -> Result<bool, LedgerError> {
        Ok(self.read()?.is_closed())
    }

    fn entry_count(&self) -> Result<usize, LedgerError> {
        Ok(self.read()?.entry_count())
    }
}
