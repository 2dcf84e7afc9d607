pub use vcl_crypto::IntegrityError;

/// Reasons a vote is refused. A refused vote leaves the ledger untouched.
///
/// [`crate::Ledger::append`] only produces `ElectionClosed` and
/// `DuplicateVoter`; the shape checks come from [`crate::BallotRules`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppendError {
    #[error("election has ended; no more votes can be cast")]
    ElectionClosed,

    #[error("voter id {voter_id} has already cast a vote")]
    DuplicateVoter { voter_id: String },

    #[error("voter id {voter_id:?} must be exactly {expected_digits} digits")]
    InvalidVoterId {
        voter_id: String,
        expected_digits: usize,
    },

    #[error("unknown candidate: {candidate}")]
    UnknownCandidate { candidate: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CloseError {
    #[error("election has already ended")]
    AlreadyClosed,
}

/// Errors produced when rebuilding a ledger from a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RestoreError {
    #[error("snapshot contains no entries")]
    Empty,

    #[error("snapshot failed verification: {0}")]
    Integrity(#[from] IntegrityError),

    #[error("voter id {voter_id} appears more than once (again at index {index})")]
    DuplicateVoter { index: usize, voter_id: String },

    #[error("closed flag ({closed}) disagrees with the closing seal")]
    ClosedFlagMismatch { closed: bool },

    #[error("closing seal does not match the head of the chain")]
    SealMismatch,
}

/// Errors in an election configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("at least one candidate must be configured")]
    NoCandidates,

    #[error("candidate names must not be blank")]
    BlankCandidate,

    #[error("candidate listed twice: {0}")]
    DuplicateCandidate(String),

    #[error("voter id length must be at least one digit")]
    ZeroLengthVoterId,
}

/// Errors surfaced at the [`crate::LedgerWriter`] / [`crate::LedgerReader`]
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Append(#[from] AppendError),

    #[error(transparent)]
    Close(#[from] CloseError),

    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    #[error("ledger lock poisoned")]
    LockPoisoned,
}
