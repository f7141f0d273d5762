//! Player ledger for the Homestead simulation.
//!
//! The [`PlayerLedger`] is the player's mutable account: currency, energy,
//! experience and level, farmhouse level, unlocked upgrades, and owned
//! decorations. Every operation validates before it mutates, so a failed
//! call leaves the ledger exactly as it was.
//!
//! # Architecture
//!
//! - [`ledger`] -- The [`PlayerLedger`] struct with currency and energy
//!   operations.
//! - [`progression`] -- Experience grants and multi-level level-ups.
//! - [`purchases`] -- Farmhouse upgrades and decoration purchases.
//! - [`invariants`] -- Invariant verification for ledgers read from storage.
//!
//! # Invariants
//!
//! For every reachable ledger:
//!
//! ```text
//! 0 <= energy <= max_energy
//! experience < experience_to_next_level
//! level >= 1, house_level >= 1
//! ```
//!
//! Currency is unsigned, so it can never go negative; debits that would
//! overdraw are refused with [`LedgerError::InsufficientFunds`].
//!
//! # Usage
//!
//! ```
//! use homestead_ledger::{LedgerDefaults, PlayerLedger};
//!
//! let mut ledger = PlayerLedger::new(&LedgerDefaults::default());
//! assert!(ledger.can_afford(100));
//! ledger.debit(10).ok();
//! ledger.credit(25).ok();
//! assert_eq!(ledger.currency(), 115);
//! ```

pub mod invariants;
pub mod ledger;
pub mod progression;
pub mod purchases;

// Re-export primary types at crate root.
pub use invariants::InvariantCheck;
pub use ledger::{LedgerDefaults, PlayerLedger};
pub use progression::LevelUp;

use homestead_types::{DecorationId, RejectionReason};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when mutating the player ledger.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Not enough currency for the requested debit.
    #[error("insufficient funds: need {required}, have {available}")]
    InsufficientFunds {
        /// Amount requested.
        required: u64,
        /// Current balance.
        available: u64,
    },

    /// Not enough energy for the requested action.
    #[error("insufficient energy: need {required}, have {available}")]
    InsufficientEnergy {
        /// Energy requested.
        required: u32,
        /// Current energy.
        available: u32,
    },

    /// The catalog has no tier above the current house level.
    #[error("no upgrade available above house level {house_level}")]
    NoUpgradeAvailable {
        /// Current house level.
        house_level: u32,
    },

    /// The decoration is not in the catalog.
    #[error("unknown item: {0}")]
    UnknownItem(DecorationId),

    /// The decoration is already owned.
    #[error("already owned: {0}")]
    AlreadyOwned(DecorationId),

    /// A counter would overflow.
    #[error("arithmetic overflow in ledger: {context}")]
    ArithmeticOverflow {
        /// Which computation overflowed.
        context: &'static str,
    },
}

impl LedgerError {
    /// The rejection reason reported for this error.
    ///
    /// Overflow cannot be caused by a well-formed command against a sound
    /// ledger; it is reported as a precondition violation.
    pub const fn reason(&self) -> RejectionReason {
        match self {
            Self::InsufficientFunds { .. } => RejectionReason::InsufficientFunds,
            Self::InsufficientEnergy { .. } => RejectionReason::InsufficientEnergy,
            Self::NoUpgradeAvailable { .. } => RejectionReason::NoUpgradeAvailable,
            Self::UnknownItem(_) => RejectionReason::UnknownItem,
            Self::AlreadyOwned(_) => RejectionReason::AlreadyOwned,
            Self::ArithmeticOverflow { .. } => RejectionReason::PreconditionViolation,
        }
    }
}

// ---------------------------------------------------------------------------
// Anomaly type
// ---------------------------------------------------------------------------

/// An invariant violation found in a ledger, typically one read back from
/// a damaged save file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerAnomaly {
    /// One entry per violated invariant.
    pub violations: Vec<String>,
}

impl core::fmt::Display for LedgerAnomaly {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ledger invariants violated: {}", self.violations.join("; "))
    }
}
