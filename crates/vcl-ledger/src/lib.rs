//! Append-only vote ledger for the Vote Chain Ledger (VCL).
//!
//! This crate is the heart of VCL. It provides:
//! - `LedgerEntry`, an immutable vote record hash-linked to its predecessor
//! - `Ledger`, the single-writer chain with append, close, tally and verify
//! - `SharedLedger` behind the `LedgerWriter` / `LedgerReader` trait boundaries
//! - `BallotRules` / `Election` for centralized voter-id and candidate checks
//! - `LedgerSnapshot` for persisting and restoring a verified chain

pub mod election;
pub mod entry;
pub mod error;
pub mod ledger;
pub mod rules;
pub mod shared;
pub mod snapshot;
pub mod tally;
pub mod traits;

pub use election::Election;
pub use entry::LedgerEntry;
pub use error::{AppendError, CloseError, ConfigError, IntegrityError, LedgerError, RestoreError};
pub use ledger::Ledger;
pub use rules::{BallotRules, ElectionConfig};
pub use shared::SharedLedger;
pub use snapshot::LedgerSnapshot;
pub use tally::{ElectionSummary, Tally, Winner};
pub use traits::{LedgerReader, LedgerWriter};
pub use vcl_crypto::HashScheme;
