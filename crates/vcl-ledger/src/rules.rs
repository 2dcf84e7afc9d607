use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{AppendError, ConfigError};

/// Election parameters supplied when the election starts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElectionConfig {
    /// Candidate names, in display and tie-break order.
    pub candidates: Vec<String>,
    /// Exact number of ASCII digits a voter id must have.
    pub voter_id_digits: usize,
}

impl Default for ElectionConfig {
    fn default() -> Self {
        Self {
            candidates: vec!["Alice".into(), "Bob".into(), "Charlie".into()],
            voter_id_digits: 12,
        }
    }
}

impl ElectionConfig {
    /// Check that candidates are non-empty, non-blank and distinct.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.candidates.is_empty() {
            return Err(ConfigError::NoCandidates);
        }
        if self.voter_id_digits == 0 {
            return Err(ConfigError::ZeroLengthVoterId);
        }
        let mut seen = HashSet::new();
        for candidate in &self.candidates {
            if candidate.trim().is_empty() {
                return Err(ConfigError::BlankCandidate);
            }
            if !seen.insert(candidate.as_str()) {
                return Err(ConfigError::DuplicateCandidate(candidate.clone()));
            }
        }
        Ok(())
    }
}

/// Shape checks for a ballot: voter-id format and candidate membership.
///
/// Uniqueness and closed state are the ledger's job, not these rules'.
#[derive(Clone, Debug)]
pub struct BallotRules {
    candidates: HashSet<String>,
    voter_id_digits: usize,
}

impl BallotRules {
    pub fn new(config: &ElectionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            candidates: config.candidates.iter().cloned().collect(),
            voter_id_digits: config.voter_id_digits,
        })
    }

    pub fn validate(&self, voter_id: &str, choice: &str) -> Result<(), AppendError> {
        self.validate_voter_id(voter_id)?;
        if !self.candidates.contains(choice) {
            return Err(AppendError::UnknownCandidate {
                candidate: choice.to_string(),
            });
        }
        Ok(())
    }

    /// Exactly `voter_id_digits` ASCII digits, nothing else.
    pub fn validate_voter_id(&self, voter_id: &str) -> Result<(), AppendError> {
        let well_formed = voter_id.len() == self.voter_id_digits
            && voter_id.bytes().all(|b| b.is_ascii_digit());
        if !well_formed {
            return Err(AppendError::InvalidVoterId {
                voter_id: voter_id.to_string(),
                expected_digits: self.voter_id_digits,
            });
        }
        Ok(())
    }
}
