use serde::{Deserialize, Serialize};
use vcl_crypto::{
    ChainLinked, EntryHasher, HashScheme, GENESIS_CHOICE, GENESIS_PREVIOUS_HASH, GENESIS_VOTER_ID,
};

/// One accepted vote, linked to the entry before it.
///
/// The hash is computed once, at construction, from the other three fields.
/// Fields are readable through getters only; nothing outside this crate can
/// rewrite an entry in place. Deserialized entries are untrusted until the
/// chain they belong to has been verified (see [`crate::Ledger::restore`]).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub(crate) voter_id: String,
    pub(crate) choice: String,
    pub(crate) previous_hash: String,
    pub(crate) hash: String,
}

impl LedgerEntry {
    /// Build an entry using the default (framed) digest encoding.
    pub fn new(
        voter_id: impl Into<String>,
        choice: impl Into<String>,
        previous_hash: impl Into<String>,
    ) -> Self {
        Self::with_scheme(HashScheme::default(), voter_id, choice, previous_hash)
    }

    /// Build an entry whose hash is computed under `scheme`.
    pub fn with_scheme(
        scheme: HashScheme,
        voter_id: impl Into<String>,
        choice: impl Into<String>,
        previous_hash: impl Into<String>,
    ) -> Self {
        let voter_id = voter_id.into();
        let choice = choice.into();
        let previous_hash = previous_hash.into();
        let hash = EntryHasher::new(scheme).digest(&voter_id, &choice, &previous_hash);
        Self {
            voter_id,
            choice,
            previous_hash,
            hash,
        }
    }

    /// The synthetic first entry of every chain.
    pub fn genesis(scheme: HashScheme) -> Self {
        Self::with_scheme(scheme, GENESIS_VOTER_ID, GENESIS_CHOICE, GENESIS_PREVIOUS_HASH)
    }

    pub fn voter_id(&self) -> &str {
        &self.voter_id
    }

    pub fn choice(&self) -> &str {
        &self.choice
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// First 8 characters of the hash, for log lines.
    pub fn short_hash(&self) -> &str {
        self.hash.get(..8).unwrap_or(&self.hash)
    }
}

impl ChainLinked for LedgerEntry {
    fn voter_id(&self) -> &str {
        &self.voter_id
    }
    fn choice(&self) -> &str {
        &self.choice
    }
    fn previous_hash(&self) -> &str {
        &self.previous_hash
    }
    fn hash(&self) -> &str {
        &self.hash
    }
}
