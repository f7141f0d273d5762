//! Invariant verification for ledgers that did not come from
//! [`PlayerLedger::new`], typically ones deserialized from a save file.

use crate::LedgerAnomaly;
use crate::ledger::PlayerLedger;

/// Result of an invariant check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantCheck {
    /// All invariants hold.
    Sound,
    /// At least one invariant is violated.
    Anomaly(LedgerAnomaly),
}

impl InvariantCheck {
    /// Whether all invariants hold.
    pub const fn is_sound(&self) -> bool {
        matches!(self, Self::Sound)
    }
}

impl PlayerLedger {
    /// Check every ledger invariant and report all violations found.
    pub fn verify_invariants(&self) -> InvariantCheck {
        let mut violations = Vec::new();

        if self.energy > self.max_energy {
            violations.push(format!(
                "energy {} exceeds max_energy {}",
                self.energy, self.max_energy
            ));
        }
        if self.experience_to_next_level == 0 {
            violations.push("experience_to_next_level is zero".to_owned());
        }
        if self.experience >= self.experience_to_next_level {
            violations.push(format!(
                "experience {} not below threshold {}",
                self.experience, self.experience_to_next_level
            ));
        }
        if self.level < 1 {
            violations.push("level below 1".to_owned());
        }
        if self.house_level < 1 {
            violations.push("house_level below 1".to_owned());
        }

        if violations.is_empty() {
            InvariantCheck::Sound
        } else {
            tracing::warn!(count = violations.len(), "Ledger invariant violations");
            InvariantCheck::Anomaly(LedgerAnomaly { violations })
        }
    }
}
