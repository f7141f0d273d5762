//! The player's account: currency and energy operations.
//!
//! Every mutating method has a `check_*` twin that performs the same
//! validation without touching state. The action processor calls the checks
//! for every part of a command first and only then applies the mutations,
//! so a command is either applied completely or not at all.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use homestead_types::DecorationId;

use crate::LedgerError;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Starting values for a fresh ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerDefaults {
    /// Currency on first run (default: 100).
    pub starting_currency: u64,
    /// Energy on first run, clamped to `max_energy` (default: 100).
    pub starting_energy: u32,
    /// Initial energy cap (default: 100).
    pub max_energy: u32,
    /// Experience needed to go from level 1 to level 2 (default: 100).
    pub experience_to_next_level: u64,
}

impl Default for LedgerDefaults {
    fn default() -> Self {
        Self {
            starting_currency: 100,
            starting_energy: 100,
            max_energy: 100,
            experience_to_next_level: 100,
        }
    }
}

// ---------------------------------------------------------------------------
// PlayerLedger
// ---------------------------------------------------------------------------

/// The player's mutable account.
///
/// Fields are private so that every change goes through a validating
/// method. Ledgers read from storage should be checked with
/// [`verify_invariants`](crate::invariants) before use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerLedger {
    pub(crate) currency: u64,
    pub(crate) energy: u32,
    pub(crate) max_energy: u32,
    pub(crate) experience: u64,
    pub(crate) experience_to_next_level: u64,
    pub(crate) level: u32,
    pub(crate) house_level: u32,
    #[serde(default)]
    pub(crate) unlocked_upgrades: BTreeSet<u32>,
    #[serde(default)]
    pub(crate) owned_decorations: BTreeSet<DecorationId>,
    /// Epoch ms up to which energy regeneration has been credited.
    #[serde(default)]
    pub(crate) energy_settled_at_ms: i64,
}

impl PlayerLedger {
    /// Create a fresh ledger at level 1 with house level 1.
    pub fn new(defaults: &LedgerDefaults) -> Self {
        Self {
            currency: defaults.starting_currency,
            energy: defaults.starting_energy.min(defaults.max_energy),
            max_energy: defaults.max_energy,
            experience: 0,
            experience_to_next_level: defaults.experience_to_next_level.max(1),
            level: 1,
            house_level: 1,
            unlocked_upgrades: BTreeSet::new(),
            owned_decorations: BTreeSet::new(),
            energy_settled_at_ms: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Current currency balance.
    pub const fn currency(&self) -> u64 {
        self.currency
    }

    /// Current energy.
    pub const fn energy(&self) -> u32 {
        self.energy
    }

    /// Energy cap.
    pub const fn max_energy(&self) -> u32 {
        self.max_energy
    }

    /// Experience accumulated toward the next level.
    pub const fn experience(&self) -> u64 {
        self.experience
    }

    /// Experience required to reach the next level.
    pub const fn experience_to_next_level(&self) -> u64 {
        self.experience_to_next_level
    }

    /// Player level (starts at 1).
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Farmhouse level (starts at 1, independent of player level).
    pub const fn house_level(&self) -> u32 {
        self.house_level
    }

    /// House tiers reached through upgrades.
    pub const fn unlocked_upgrades(&self) -> &BTreeSet<u32> {
        &self.unlocked_upgrades
    }

    /// Decorations owned.
    pub const fn owned_decorations(&self) -> &BTreeSet<DecorationId> {
        &self.owned_decorations
    }

    /// Whether a decoration is owned.
    pub fn owns(&self, id: &DecorationId) -> bool {
        self.owned_decorations.contains(id)
    }

    /// Epoch ms up to which energy regeneration has been credited.
    pub const fn energy_settled_at_ms(&self) -> i64 {
        self.energy_settled_at_ms
    }

    // -----------------------------------------------------------------------
    // Currency
    // -----------------------------------------------------------------------

    /// Whether the balance covers `cost`.
    pub const fn can_afford(&self, cost: u64) -> bool {
        self.currency >= cost
    }

    /// Validate a debit without mutating.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InsufficientFunds`] if the balance is below `amount`.
    pub const fn check_debit(&self, amount: u64) -> Result<(), LedgerError> {
        if self.can_afford(amount) {
            Ok(())
        } else {
            Err(LedgerError::InsufficientFunds {
                required: amount,
                available: self.currency,
            })
        }
    }

    /// Remove `amount` from the balance.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InsufficientFunds`] if the balance is below `amount`;
    /// the balance is unchanged.
    pub fn debit(&mut self, amount: u64) -> Result<(), LedgerError> {
        self.check_debit(amount)?;
        self.currency = self.currency.saturating_sub(amount);
        tracing::trace!(amount, balance = self.currency, "Debited");
        Ok(())
    }

    /// Validate a credit without mutating.
    ///
    /// # Errors
    ///
    /// [`LedgerError::ArithmeticOverflow`] if the balance would exceed
    /// `u64::MAX`.
    pub const fn check_credit(&self, amount: u64) -> Result<(), LedgerError> {
        match self.currency.checked_add(amount) {
            Some(_) => Ok(()),
            None => Err(LedgerError::ArithmeticOverflow {
                context: "currency credit",
            }),
        }
    }

    /// Add `amount` to the balance.
    ///
    /// # Errors
    ///
    /// [`LedgerError::ArithmeticOverflow`] if the balance would exceed
    /// `u64::MAX`.
    pub fn credit(&mut self, amount: u64) -> Result<(), LedgerError> {
        self.currency = self
            .currency
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow {
                context: "currency credit",
            })?;
        tracing::trace!(amount, balance = self.currency, "Credited");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Energy
    // -----------------------------------------------------------------------

    /// Validate spending energy without mutating.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InsufficientEnergy`] if energy is below `amount`.
    pub const fn check_energy(&self, amount: u32) -> Result<(), LedgerError> {
        if self.energy >= amount {
            Ok(())
        } else {
            Err(LedgerError::InsufficientEnergy {
                required: amount,
                available: self.energy,
            })
        }
    }

    /// Spend `amount` energy, flooring at zero.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InsufficientEnergy`] if energy is below `amount`;
    /// energy is unchanged.
    pub fn spend_energy(&mut self, amount: u32) -> Result<(), LedgerError> {
        self.check_energy(amount)?;
        self.energy = self.energy.saturating_sub(amount);
        Ok(())
    }

    /// Restore up to `amount` energy, clamped to the cap. Returns the energy
    /// actually restored.
    pub fn restore_energy(&mut self, amount: u32) -> u32 {
        let before = self.energy;
        self.energy = self.energy.saturating_add(amount).min(self.max_energy);
        self.energy.saturating_sub(before)
    }

    /// Record that energy regeneration has been credited up to `at_ms`.
    pub const fn mark_energy_settled(&mut self, at_ms: i64) {
        self.energy_settled_at_ms = at_ms;
    }
}

impl Default for PlayerLedger {
    fn default() -> Self {
        Self::new(&LedgerDefaults::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ledger_with(currency: u64) -> PlayerLedger {
        PlayerLedger::new(&LedgerDefaults {
            starting_currency: currency,
            ..LedgerDefaults::default()
        })
    }

    #[test]
    fn fresh_ledger_matches_defaults() {
        let ledger = PlayerLedger::default();
        assert_eq!(ledger.currency(), 100);
        assert_eq!(ledger.energy(), 100);
        assert_eq!(ledger.max_energy(), 100);
        assert_eq!(ledger.level(), 1);
        assert_eq!(ledger.house_level(), 1);
        assert_eq!(ledger.experience(), 0);
        assert_eq!(ledger.experience_to_next_level(), 100);
        assert!(ledger.owned_decorations().is_empty());
    }

    #[test]
    fn starting_energy_is_clamped_to_cap() {
        let ledger = PlayerLedger::new(&LedgerDefaults {
            starting_energy: 500,
            max_energy: 80,
            ..LedgerDefaults::default()
        });
        assert_eq!(ledger.energy(), 80);
    }

    #[test]
    fn can_afford_is_inclusive() {
        let ledger = ledger_with(10);
        assert!(ledger.can_afford(10));
        assert!(!ledger.can_afford(11));
    }

    #[test]
    fn debit_refuses_overdraft() {
        let mut ledger = ledger_with(5);
        let err = ledger.debit(10).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientFunds {
                required: 10,
                available: 5,
            }
        );
        assert_eq!(ledger.currency(), 5);
    }

    #[test]
    fn debit_to_exactly_zero() {
        let mut ledger = ledger_with(10);
        ledger.debit(10).unwrap();
        assert_eq!(ledger.currency(), 0);
    }

    #[test]
    fn credit_is_unconditional_until_overflow() {
        let mut ledger = ledger_with(0);
        ledger.credit(25).unwrap();
        assert_eq!(ledger.currency(), 25);

        let mut rich = ledger_with(u64::MAX);
        assert!(rich.check_credit(1).is_err());
        assert!(rich.credit(1).is_err());
        assert_eq!(rich.currency(), u64::MAX);
    }

    #[test]
    fn spend_energy_refuses_when_short() {
        let mut ledger = PlayerLedger::new(&LedgerDefaults {
            starting_energy: 3,
            ..LedgerDefaults::default()
        });
        assert!(ledger.spend_energy(5).is_err());
        assert_eq!(ledger.energy(), 3);
        ledger.spend_energy(3).unwrap();
        assert_eq!(ledger.energy(), 0);
    }

    #[test]
    fn restore_energy_clamps_to_cap() {
        let mut ledger = PlayerLedger::default();
        ledger.spend_energy(10).unwrap();
        assert_eq!(ledger.restore_energy(25), 10);
        assert_eq!(ledger.energy(), ledger.max_energy());
    }

    #[test]
    fn serde_round_trip_preserves_sets() {
        let mut ledger = PlayerLedger::default();
        ledger.owned_decorations.insert(DecorationId::from("scarecrow"));
        ledger.unlocked_upgrades.insert(2);
        let json = serde_json::to_string(&ledger).unwrap();
        let restored: PlayerLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, ledger);
    }
}
