use crate::hasher::EntryHasher;

/// Voter id recorded on the genesis entry.
pub const GENESIS_VOTER_ID: &str = "0";
/// Choice recorded on the genesis entry.
pub const GENESIS_CHOICE: &str = "Genesis";
/// Previous-hash placeholder recorded on the genesis entry.
pub const GENESIS_PREVIOUS_HASH: &str = "0";
/// Choice recorded in the closing seal, which commits to the head hash.
pub const SEAL_CHOICE: &str = "Closed";

/// Trait for entries that participate in a hash chain.
pub trait ChainLinked {
    fn voter_id(&self) -> &str;
    fn choice(&self) -> &str;
    /// Hex digest of the preceding entry (`"0"` for genesis).
    fn previous_hash(&self) -> &str;
    /// The entry's own stored hex digest.
    fn hash(&self) -> &str;
}

/// Hash chain integrity verifier.
///
/// Verifies that a sequence of entries forms a valid hash chain:
/// the first entry is the canonical genesis, each entry's previous hash
/// matches its predecessor's stored hash, and each stored hash is what the
/// entry's fields digest to.
pub struct HashChainVerifier;

impl HashChainVerifier {
    /// Verify a chain of entries under the given hasher.
    ///
    /// At each index the link is checked before the digest, so an entry
    /// whose previous hash was rewritten reports `LinkBroken` rather than
    /// `HashMismatch`. The first failing index wins.
    pub fn verify_chain(
        entries: &[impl ChainLinked],
        hasher: EntryHasher,
    ) -> Result<(), IntegrityError> {
        let Some(genesis) = entries.first() else {
            return Ok(());
        };

        if genesis.previous_hash() != GENESIS_PREVIOUS_HASH {
            return Err(IntegrityError::LinkBroken { index: 0 });
        }
        let canonical = Self::genesis_hash(hasher);
        if genesis.hash() != canonical
            || !hasher.verify(
                genesis.voter_id(),
                genesis.choice(),
                genesis.previous_hash(),
                genesis.hash(),
            )
        {
            return Err(IntegrityError::HashMismatch { index: 0 });
        }

        for (index, pair) in entries.windows(2).enumerate() {
            let (prev, entry) = (&pair[0], &pair[1]);
            let index = index + 1;

            if entry.previous_hash() != prev.hash() {
                return Err(IntegrityError::LinkBroken { index });
            }
            if !hasher.verify(
                entry.voter_id(),
                entry.choice(),
                entry.previous_hash(),
                entry.hash(),
            ) {
                return Err(IntegrityError::HashMismatch { index });
            }
        }

        Ok(())
    }

    /// The digest every genesis entry carries under `hasher`.
    pub fn genesis_hash(hasher: EntryHasher) -> String {
        hasher.digest(GENESIS_VOTER_ID, GENESIS_CHOICE, GENESIS_PREVIOUS_HASH)
    }

    /// The seal recorded when a chain ending in `head_hash` is closed.
    pub fn seal_hash(hasher: EntryHasher, head_hash: &str) -> String {
        hasher.digest(GENESIS_VOTER_ID, SEAL_CHOICE, head_hash)
    }
}

/// Errors from chain verification.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("hash mismatch at index {index}: computed hash differs from stored")]
    HashMismatch { index: usize },

    #[error("broken link at index {index}: previous hash does not match")]
    LinkBroken { index: usize },
}

impl IntegrityError {
    /// Position of the offending entry.
    pub fn index(&self) -> usize {
        match self {
            Self::HashMismatch { index } | Self::LinkBroken { index } => *index,
        }
    }
}
