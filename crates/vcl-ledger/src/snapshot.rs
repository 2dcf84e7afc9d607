use serde::{Deserialize, Serialize};
use vcl_crypto::HashScheme;

use crate::entry::LedgerEntry;

/// Persistable copy of a ledger.
///
/// Produced by [`crate::Ledger::snapshot`]. Loading goes through
/// [`crate::Ledger::restore`], which re-verifies the whole chain before
/// trusting any of it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Digest encoding the entries were hashed under.
    #[serde(default)]
    pub scheme: HashScheme,
    pub closed: bool,
    /// Digest over the head hash, present once the election is closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seal: Option<String>,
    pub entries: Vec<LedgerEntry>,
}
