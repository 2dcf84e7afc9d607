//! Cryptographic primitives for the Vote Chain Ledger.
//!
//! Provides SHA-256 entry digests under a selectable input encoding and
//! hash chain verification over any sequence of linked entries.
//!
//! All crypto operations wrap established libraries; there is no custom cryptography.

pub mod chain;
pub mod hasher;

pub use chain::{
    ChainLinked, HashChainVerifier, IntegrityError, GENESIS_CHOICE, GENESIS_PREVIOUS_HASH,
    GENESIS_VOTER_ID, SEAL_CHOICE,
};
pub use hasher::{EntryHasher, HashScheme};
