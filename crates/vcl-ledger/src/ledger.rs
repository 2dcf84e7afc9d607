use std::collections::HashSet;

use tracing::{debug, info, warn};
use vcl_crypto::{EntryHasher, HashChainVerifier, HashScheme};

use crate::entry::LedgerEntry;
use crate::error::{AppendError, CloseError, IntegrityError, RestoreError};
use crate::rules::BallotRules;
use crate::snapshot::LedgerSnapshot;
use crate::tally::Tally;

/// The vote chain: a genesis entry followed by one entry per accepted vote.
///
/// Single writer. Mutators take `&mut self` and either apply fully or leave
/// the ledger as it was. Wrap in [`crate::SharedLedger`] to share across
/// threads.
#[derive(Clone, Debug)]
pub struct Ledger {
    scheme: HashScheme,
    entries: Vec<LedgerEntry>,
    cast: HashSet<String>,
    /// Set by [`Ledger::close`]; commits to the head hash at closing time.
    seal: Option<String>,
}

impl Ledger {
    /// A fresh, open ledger using the framed digest encoding.
    pub fn new() -> Self {
        Self::with_scheme(HashScheme::default())
    }

    /// A fresh, open ledger whose entries are hashed under `scheme`.
    pub fn with_scheme(scheme: HashScheme) -> Self {
        Self {
            scheme,
            entries: vec![LedgerEntry::genesis(scheme)],
            cast: HashSet::new(),
            seal: None,
        }
    }

    /// Record a vote.
    ///
    /// Fails with `ElectionClosed` once [`Ledger::close`] has succeeded, then
    /// with `DuplicateVoter` if `voter_id` already voted. Voter-id format and
    /// candidate membership are not checked here; see
    /// [`Ledger::append_validated`].
    pub fn append(&mut self, voter_id: &str, choice: &str) -> Result<(), AppendError> {
        self.check_admissible(voter_id)?;
        self.push(voter_id, choice);
        Ok(())
    }

    /// Record a vote after the closed and duplicate checks and then `rules`.
    pub fn append_validated(
        &mut self,
        voter_id: &str,
        choice: &str,
        rules: &BallotRules,
    ) -> Result<(), AppendError> {
        self.check_admissible(voter_id)?;
        if let Err(err) = rules.validate(voter_id, choice) {
            warn!(error = %err, "ballot rejected");
            return Err(err);
        }
        self.push(voter_id, choice);
        Ok(())
    }

    /// End the election. A second call fails with `AlreadyClosed`.
    ///
    /// Closing records a seal over the current head hash. A persisted
    /// ledger carrying a seal cannot be restored as open.
    pub fn close(&mut self) -> Result<(), CloseError> {
        if self.is_closed() {
            return Err(CloseError::AlreadyClosed);
        }
        let seal = self.expected_seal();
        info!(votes = self.votes_cast(), head = %self.head().short_hash(), "election closed");
        self.seal = Some(seal);
        Ok(())
    }

    /// Number of recorded votes for `candidate`.
    ///
    /// The genesis entry is skipped by position, so a real candidate named
    /// "Genesis" is counted like any other.
    pub fn tally_for(&self, candidate: &str) -> u64 {
        self.entries[1..]
            .iter()
            .filter(|entry| entry.choice == candidate)
            .count() as u64
    }

    /// Tallies for each candidate, in the order given.
    pub fn tally_all<S: AsRef<str>>(&self, candidates: &[S]) -> Tally {
        candidates
            .iter()
            .map(|candidate| {
                let name = candidate.as_ref();
                (name.to_string(), self.tally_for(name))
            })
            .collect()
    }

    /// The full chain, genesis first.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Recompute every digest and link. Detection only; nothing is repaired.
    pub fn verify_integrity(&self) -> Result<(), IntegrityError> {
        HashChainVerifier::verify_chain(&self.entries, EntryHasher::new(self.scheme))
    }

    pub fn is_closed(&self) -> bool {
        self.seal.is_some()
    }

    /// The closing seal, once the election has ended.
    pub fn seal(&self) -> Option<&str> {
        self.seal.as_deref()
    }

    /// Entries in the chain, including genesis.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Entries in the chain, excluding genesis.
    pub fn votes_cast(&self) -> usize {
        self.entries.len() - 1
    }

    pub fn has_voted(&self, voter_id: &str) -> bool {
        self.cast.contains(voter_id)
    }

    /// The most recent entry (genesis on a fresh ledger).
    pub fn head(&self) -> &LedgerEntry {
        &self.entries[self.entries.len() - 1]
    }

    /// Copy of the ledger state for persistence.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            scheme: self.scheme,
            closed: self.is_closed(),
            seal: self.seal.clone(),
            entries: self.entries.clone(),
        }
    }

    /// Rebuild a ledger from a snapshot.
    ///
    /// The chain is verified under the snapshot's scheme (genesis included)
    /// and the voted-id index is rebuilt from the entries. A voter id that
    /// appears twice is rejected. The closed flag must agree with the seal,
    /// and a seal must match the head of the chain.
    pub fn restore(snapshot: LedgerSnapshot) -> Result<Self, RestoreError> {
        let LedgerSnapshot {
            scheme,
            closed,
            seal,
            entries,
        } = snapshot;

        if entries.is_empty() {
            return Err(RestoreError::Empty);
        }
        HashChainVerifier::verify_chain(&entries, EntryHasher::new(scheme))?;

        let mut cast = HashSet::with_capacity(entries.len() - 1);
        for (index, entry) in entries.iter().enumerate().skip(1) {
            if !cast.insert(entry.voter_id.clone()) {
                return Err(RestoreError::DuplicateVoter {
                    index,
                    voter_id: entry.voter_id.clone(),
                });
            }
        }

        let ledger = Self {
            scheme,
            entries,
            cast,
            seal,
        };
        if closed != ledger.is_closed() {
            return Err(RestoreError::ClosedFlagMismatch { closed });
        }
        if let Some(seal) = ledger.seal() {
            if seal != ledger.expected_seal() {
                return Err(RestoreError::SealMismatch);
            }
        }

        info!(entries = ledger.entry_count(), closed, "ledger restored");
        Ok(ledger)
    }

    fn expected_seal(&self) -> String {
        HashChainVerifier::seal_hash(EntryHasher::new(self.scheme), self.head().hash())
    }

    fn check_admissible(&self, voter_id: &str) -> Result<(), AppendError> {
        if self.is_closed() {
            warn!("vote rejected: election closed");
            return Err(AppendError::ElectionClosed);
        }
        if self.cast.contains(voter_id) {
            warn!(voter_id, "vote rejected: duplicate voter");
            return Err(AppendError::DuplicateVoter {
                voter_id: voter_id.to_string(),
            });
        }
        Ok(())
    }

    fn push(&mut self, voter_id: &str, choice: &str) {
        let entry = LedgerEntry::with_scheme(self.scheme, voter_id, choice, self.head().hash());
        debug!(index = self.entries.len(), hash = %entry.short_hash(), "appended ledger entry");
        self.entries.push(entry);
        self.cast.insert(voter_id.to_string());
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ElectionConfig;
    use proptest::prelude::*;

    fn four_entry_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.append("111111111111", "Alice").unwrap();
        ledger.append("222222222222", "Bob").unwrap();
        ledger.append("333333333333", "Alice").unwrap();
        ledger
    }

    #[test]
    fn new_ledger_holds_only_genesis() {
        let ledger = Ledger::new();
        assert_eq!(ledger.entry_count(), 1);
        assert_eq!(ledger.votes_cast(), 0);
        assert_eq!(ledger.entries()[0], LedgerEntry::genesis(HashScheme::Framed));
        assert!(!ledger.is_closed());
        ledger.verify_integrity().unwrap();
    }

    #[test]
    fn append_links_to_previous_hash() {
        let ledger = four_entry_ledger();
        let entries = ledger.entries();
        for i in 1..entries.len() {
            assert_eq!(entries[i].previous_hash(), entries[i - 1].hash());
        }
        assert_eq!(ledger.head().voter_id(), "333333333333");
    }

    #[test]
    fn duplicate_voter_is_rejected_without_change() {
        let mut ledger = Ledger::new();
        ledger.append("111111111111", "Alice").unwrap();
        let err = ledger.append("111111111111", "Bob").unwrap_err();
        assert_eq!(
            err,
            AppendError::DuplicateVoter {
                voter_id: "111111111111".into()
            }
        );
        assert_eq!(ledger.entry_count(), 2);
        assert_eq!(ledger.tally_for("Bob"), 0);
    }

    #[test]
    fn append_after_close_is_rejected() {
        let mut ledger = Ledger::new();
        ledger.append("111111111111", "Alice").unwrap();
        ledger.close().unwrap();
        assert_eq!(
            ledger.append("222222222222", "Bob").unwrap_err(),
            AppendError::ElectionClosed
        );
        assert_eq!(ledger.entry_count(), 2);
    }

    #[test]
    fn closed_check_wins_over_duplicate_check() {
        let mut ledger = Ledger::new();
        ledger.append("111111111111", "Alice").unwrap();
        ledger.close().unwrap();
        assert_eq!(
            ledger.append("111111111111", "Alice").unwrap_err(),
            AppendError::ElectionClosed
        );
    }

    #[test]
    fn second_close_fails() {
        let mut ledger = Ledger::new();
        assert!(ledger.close().is_ok());
        assert_eq!(ledger.close().unwrap_err(), CloseError::AlreadyClosed);
        assert!(ledger.is_closed());
    }

    #[test]
    fn tally_counts_choices() {
        let ledger = four_entry_ledger();
        assert_eq!(ledger.tally_for("Alice"), 2);
        assert_eq!(ledger.tally_for("Bob"), 1);
        assert_eq!(ledger.tally_for("Genesis"), 0);
        assert_eq!(ledger.tally_for("Charlie"), 0);
    }

    #[test]
    fn candidate_named_genesis_is_counted() {
        let mut ledger = Ledger::new();
        ledger.append("111111111111", "Genesis").unwrap();
        assert_eq!(ledger.tally_for("Genesis"), 1);
    }

    #[test]
    fn tally_all_preserves_order() {
        let ledger = four_entry_ledger();
        let tally = ledger.tally_all(&["Charlie", "Bob", "Alice"]);
        let names: Vec<_> = tally.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Charlie", "Bob", "Alice"]);
        assert_eq!(tally.get("Alice"), Some(2));
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn unmodified_chain_verifies() {
        four_entry_ledger().verify_integrity().unwrap();
    }

    #[test]
    fn tampered_choice_detected_at_index() {
        for index in 1..4 {
            let mut ledger = four_entry_ledger();
            ledger.entries[index].choice = "Mallory".into();
            assert_eq!(
                ledger.verify_integrity().unwrap_err(),
                IntegrityError::HashMismatch { index }
            );
        }
    }

    #[test]
    fn tampered_hash_detected_at_index() {
        for index in 1..4 {
            let mut ledger = four_entry_ledger();
            ledger.entries[index].hash = "ab".repeat(32);
            assert_eq!(
                ledger.verify_integrity().unwrap_err(),
                IntegrityError::HashMismatch { index }
            );
        }
    }

    #[test]
    fn tampered_genesis_detected() {
        let mut ledger = four_entry_ledger();
        ledger.entries[0].choice = "Alice".into();
        assert_eq!(
            ledger.verify_integrity().unwrap_err(),
            IntegrityError::HashMismatch { index: 0 }
        );
    }

    #[test]
    fn rewritten_previous_hash_breaks_link() {
        let mut ledger = four_entry_ledger();
        let forged = ledger.entries[1].hash.clone();
        ledger.entries[3].previous_hash = forged;
        assert_eq!(
            ledger.verify_integrity().unwrap_err(),
            IntegrityError::LinkBroken { index: 3 }
        );
    }

    #[test]
    fn legacy_scheme_ledger_verifies() {
        let mut ledger = Ledger::with_scheme(HashScheme::Concatenated);
        ledger.append("111111111111", "Alice").unwrap();
        assert_eq!(
            ledger.head().hash(),
            "cfa45209a9fdcbbb7e6a13d857178102bcc9c970d631a40ac8557d71d782c4ec"
        );
        ledger.verify_integrity().unwrap();
    }

    #[test]
    fn append_validated_applies_rules_after_ledger_checks() {
        let rules = BallotRules::new(&ElectionConfig::default()).unwrap();
        let mut ledger = Ledger::new();

        assert!(matches!(
            ledger.append_validated("12345", "Alice", &rules),
            Err(AppendError::InvalidVoterId { .. })
        ));
        assert!(matches!(
            ledger.append_validated("111111111111", "Dave", &rules),
            Err(AppendError::UnknownCandidate { .. })
        ));
        assert_eq!(ledger.entry_count(), 1);

        ledger
            .append_validated("111111111111", "Alice", &rules)
            .unwrap();
        assert!(matches!(
            ledger.append_validated("111111111111", "Dave", &rules),
            Err(AppendError::DuplicateVoter { .. })
        ));
    }

    #[test]
    fn restore_round_trip() {
        let mut ledger = four_entry_ledger();
        ledger.close().unwrap();
        let restored = Ledger::restore(ledger.snapshot()).unwrap();
        assert_eq!(restored.entries(), ledger.entries());
        assert!(restored.is_closed());
        assert!(restored.has_voted("222222222222"));
        assert!(!restored.has_voted("444444444444"));
    }

    #[test]
    fn restore_rejects_empty_snapshot() {
        let snapshot = LedgerSnapshot {
            scheme: HashScheme::Framed,
            closed: false,
            seal: None,
            entries: vec![],
        };
        assert_eq!(Ledger::restore(snapshot).unwrap_err(), RestoreError::Empty);
    }

    #[test]
    fn restore_rejects_tampered_chain() {
        let mut snapshot = four_entry_ledger().snapshot();
        snapshot.entries[2].choice = "Alice".into();
        assert_eq!(
            Ledger::restore(snapshot).unwrap_err(),
            RestoreError::Integrity(IntegrityError::HashMismatch { index: 2 })
        );
    }

    #[test]
    fn restore_rejects_repeated_voter() {
        // Build a consistent chain that bypasses the duplicate check.
        let scheme = HashScheme::Framed;
        let genesis = LedgerEntry::genesis(scheme);
        let first = LedgerEntry::with_scheme(scheme, "111111111111", "Alice", genesis.hash());
        let second = LedgerEntry::with_scheme(scheme, "111111111111", "Bob", first.hash());
        let snapshot = LedgerSnapshot {
            scheme,
            closed: false,
            seal: None,
            entries: vec![genesis, first, second],
        };
        assert_eq!(
            Ledger::restore(snapshot).unwrap_err(),
            RestoreError::DuplicateVoter {
                index: 2,
                voter_id: "111111111111".into()
            }
        );
    }

    #[test]
    fn reopening_a_closed_snapshot_is_rejected() {
        let mut ledger = four_entry_ledger();
        ledger.close().unwrap();
        let mut snapshot = ledger.snapshot();
        snapshot.closed = false;
        assert_eq!(
            Ledger::restore(snapshot).unwrap_err(),
            RestoreError::ClosedFlagMismatch { closed: false }
        );
    }

    #[test]
    fn closed_flag_without_seal_is_rejected() {
        let mut snapshot = four_entry_ledger().snapshot();
        snapshot.closed = true;
        assert_eq!(
            Ledger::restore(snapshot).unwrap_err(),
            RestoreError::ClosedFlagMismatch { closed: true }
        );
    }

    #[test]
    fn seal_must_match_head() {
        let mut ledger = four_entry_ledger();
        ledger.close().unwrap();

        let mut forged = ledger.snapshot();
        forged.seal = Some("ab".repeat(32));
        assert_eq!(Ledger::restore(forged).unwrap_err(), RestoreError::SealMismatch);

        // Votes appended behind a reused seal move the head away from it.
        let mut extended = ledger.snapshot();
        let head = extended.entries[3].hash().to_string();
        extended.entries.push(LedgerEntry::new("444444444444", "Bob", &head));
        assert_eq!(Ledger::restore(extended).unwrap_err(), RestoreError::SealMismatch);
    }

    #[test]
    fn close_seals_current_head() {
        let mut ledger = four_entry_ledger();
        assert_eq!(ledger.seal(), None);
        ledger.close().unwrap();
        let expected = HashChainVerifier::seal_hash(EntryHasher::FRAMED, ledger.head().hash());
        assert_eq!(ledger.seal(), Some(expected.as_str()));
        let restored = Ledger::restore(ledger.snapshot()).unwrap();
        assert_eq!(restored.seal(), ledger.seal());
    }

    proptest! {
        #[test]
        fn chain_stays_linked(votes in prop::collection::vec((0u8..20, 0usize..3), 0..40)) {
            let candidates = ["Alice", "Bob", "Charlie"];
            let mut ledger = Ledger::new();
            let mut accepted = 0usize;
            for (voter, candidate) in &votes {
                let voter_id = format!("{voter:012}");
                let before = ledger.entry_count();
                match ledger.append(&voter_id, candidates[*candidate]) {
                    Ok(()) => accepted += 1,
                    Err(_) => {
                        prop_assert_eq!(ledger.entry_count(), before);
                    }
                }
            }

            prop_assert_eq!(ledger.votes_cast(), accepted);
            let entries = ledger.entries();
            for i in 1..entries.len() {
                prop_assert_eq!(entries[i].previous_hash(), entries[i - 1].hash());
            }
            prop_assert!(ledger.verify_integrity().is_ok());
            prop_assert_eq!(ledger.tally_all(&candidates).total(), accepted as u64);
        }
    }
}
