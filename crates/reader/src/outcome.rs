//! Read transaction outcomes

use cardlink_ccid::CardIdentity;

/// Error code reported when no card was present or the exchange failed
pub const NO_CARD: &str = "NO_CARD";

/// Result of one read transaction
///
/// `NoCard` is a normal outcome, not an error: the reader was reachable
/// but no card answered, or the protocol exchange failed mid-way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A card was read and classified
    Success {
        /// The captured card identity
        card: CardIdentity,
    },
    /// No card was detected
    NoCard {
        /// Human-readable description of what went wrong
        message: String,
    },
}

impl ReadOutcome {
    /// Whether the transaction produced a card identity
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The card identity, when present
    pub const fn card(&self) -> Option<&CardIdentity> {
        match self {
            Self::Success { card } => Some(card),
            Self::NoCard { .. } => None,
        }
    }

    /// The machine-readable error code, `NO_CARD` for failed reads
    pub const fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::Success { .. } => None,
            Self::NoCard { .. } => Some(NO_CARD),
        }
    }
}
