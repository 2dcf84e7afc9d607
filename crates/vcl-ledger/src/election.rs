use crate::error::{AppendError, CloseError, ConfigError};
use crate::ledger::Ledger;
use crate::rules::{BallotRules, ElectionConfig};
use crate::tally::{ElectionSummary, Tally};

/// A ledger together with the configuration it is run under.
///
/// Votes go through [`BallotRules`] before reaching the ledger, and tallies
/// always cover the configured candidates in configured order.
#[derive(Clone, Debug)]
pub struct Election {
    config: ElectionConfig,
    rules: BallotRules,
    ledger: Ledger,
}

impl Election {
    pub fn new(config: ElectionConfig) -> Result<Self, ConfigError> {
        Self::with_ledger(config, Ledger::new())
    }

    /// Resume an election over an existing (e.g. restored) ledger.
    pub fn with_ledger(config: ElectionConfig, ledger: Ledger) -> Result<Self, ConfigError> {
        let rules = BallotRules::new(&config)?;
        Ok(Self {
            config,
            rules,
            ledger,
        })
    }

    pub fn cast_vote(&mut self, voter_id: &str, choice: &str) -> Result<(), AppendError> {
        self.ledger.append_validated(voter_id, choice, &self.rules)
    }

    /// End the election and return the final figures.
    pub fn close(&mut self) -> Result<ElectionSummary, CloseError> {
        self.ledger.close()?;
        Ok(self.summary())
    }

    /// Live count over the configured candidates.
    pub fn tally(&self) -> Tally {
        self.ledger.tally_all(&self.config.candidates)
    }

    pub fn summary(&self) -> ElectionSummary {
        ElectionSummary::from(self.tally())
    }

    pub fn config(&self) -> &ElectionConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}
