use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Domain tag prepended to framed entry digests.
const ENTRY_DOMAIN: &[u8] = b"vcl-entry-v1:";

/// How an entry's fields are laid out before digesting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashScheme {
    /// Domain tag, then each field prefixed with its byte length
    /// (little-endian `u64`). Field boundaries are unambiguous.
    #[default]
    Framed,
    /// Plain `voter_id || choice || previous_hash`.
    ///
    /// Reproduces digests of chains recorded by the legacy desktop tool.
    /// `("1", "23")` and `("12", "3")` collide under this layout.
    Concatenated,
}

/// SHA-256 digest over the `(voter_id, choice, previous_hash)` triple.
///
/// Digests are rendered as 64 lowercase hex characters. Hashing is
/// infallible; there is no error path to propagate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntryHasher {
    scheme: HashScheme,
}

impl EntryHasher {
    /// Hasher using length-prefixed framing.
    pub const FRAMED: Self = Self {
        scheme: HashScheme::Framed,
    };
    /// Hasher using raw concatenation.
    pub const CONCATENATED: Self = Self {
        scheme: HashScheme::Concatenated,
    };

    pub const fn new(scheme: HashScheme) -> Self {
        Self { scheme }
    }

    /// Compute the hex digest for an entry's fields.
    pub fn digest(&self, voter_id: &str, choice: &str, previous_hash: &str) -> String {
        let mut hasher = Sha256::new();
        match self.scheme {
            HashScheme::Framed => {
                hasher.update(ENTRY_DOMAIN);
                for field in [voter_id, choice, previous_hash] {
                    hasher.update((field.len() as u64).to_le_bytes());
                    hasher.update(field.as_bytes());
                }
            }
            HashScheme::Concatenated => {
                for field in [voter_id, choice, previous_hash] {
                    hasher.update(field.as_bytes());
                }
            }
        }
        hex::encode(hasher.finalize())
    }

    /// Check that the fields produce the expected digest.
    pub fn verify(&self, voter_id: &str, choice: &str, previous_hash: &str, expected: &str) -> bool {
        self.digest(voter_id, choice, previous_hash) == expected
    }
}
