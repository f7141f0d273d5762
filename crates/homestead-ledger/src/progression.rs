//! Experience grants and level-ups.
//!
//! A grant adds to the experience counter and then steps through level
//! thresholds one at a time: while experience reaches the threshold, the
//! threshold is subtracted, the level increases, and the next threshold
//! grows by the configured increment. One grant can therefore cross several
//! levels.

use serde::{Deserialize, Serialize};

use crate::LedgerError;
use crate::ledger::PlayerLedger;

/// Result of an experience grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelUp {
    /// Number of levels crossed by the grant (zero if none).
    pub levels_gained: u32,
    /// Player level after the grant.
    pub new_level: u32,
}

/// Ledger progression fields after a grant, computed without mutating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Progression {
    experience: u64,
    threshold: u64,
    level: u32,
    levels_gained: u32,
}

impl PlayerLedger {
    /// Validate an experience grant and report the level-ups it would cause.
    ///
    /// # Errors
    ///
    /// [`LedgerError::ArithmeticOverflow`] if the experience counter, the
    /// level, or the next threshold would overflow, or if the current
    /// threshold is zero.
    pub fn preview_experience(
        &self,
        amount: u64,
        level_up_increment: u64,
    ) -> Result<LevelUp, LedgerError> {
        let p = self.progress_after(amount, level_up_increment)?;
        Ok(LevelUp {
            levels_gained: p.levels_gained,
            new_level: p.level,
        })
    }

    /// Grant experience and apply every level-up it causes.
    ///
    /// # Errors
    ///
    /// See [`preview_experience`](Self::preview_experience); the ledger is
    /// unchanged on error.
    pub fn grant_experience(
        &mut self,
        amount: u64,
        level_up_increment: u64,
    ) -> Result<LevelUp, LedgerError> {
        let p = self.progress_after(amount, level_up_increment)?;
        self.experience = p.experience;
        self.experience_to_next_level = p.threshold;
        self.level = p.level;

        if p.levels_gained > 0 {
            tracing::info!(
                levels_gained = p.levels_gained,
                level = p.level,
                next_threshold = p.threshold,
                "Level up"
            );
        }

        Ok(LevelUp {
            levels_gained: p.levels_gained,
            new_level: p.level,
        })
    }

    fn progress_after(&self, amount: u64, increment: u64) -> Result<Progression, LedgerError> {
        let overflow = |context: &'static str| LedgerError::ArithmeticOverflow { context };

        let mut threshold = self.experience_to_next_level;
        if threshold == 0 {
            return Err(overflow("zero experience threshold"));
        }

        let mut experience = self
            .experience
            .checked_add(amount)
            .ok_or_else(|| overflow("experience grant"))?;
        let mut level = self.level;
        let mut levels_gained: u32 = 0;

        if increment == 0 {
            // Constant threshold: the loop collapses to a division.
            let crossed = experience
                .checked_div(threshold)
                .ok_or_else(|| overflow("zero experience threshold"))?;
            experience = experience
                .checked_rem(threshold)
                .ok_or_else(|| overflow("zero experience threshold"))?;
            levels_gained = u32::try_from(crossed)
                .ok()
                .ok_or_else(|| overflow("level"))?;
            level = level
                .checked_add(levels_gained)
                .ok_or_else(|| overflow("level"))?;
        } else {
            while experience >= threshold {
                experience = experience.saturating_sub(threshold);
                level = level.checked_add(1).ok_or_else(|| overflow("level"))?;
                levels_gained = levels_gained
                    .checked_add(1)
                    .ok_or_else(|| overflow("level"))?;
                threshold = threshold
                    .checked_add(increment)
                    .ok_or_else(|| overflow("experience threshold"))?;
            }
        }

        Ok(Progression {
            experience,
            threshold,
            level,
            levels_gained,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::{LedgerDefaults, LedgerError, PlayerLedger};

    fn ledger_at(experience: u64, threshold: u64) -> PlayerLedger {
        let mut ledger = PlayerLedger::new(&LedgerDefaults {
            experience_to_next_level: threshold,
            ..LedgerDefaults::default()
        });
        ledger.experience = experience;
        ledger
    }

    #[test]
    fn grant_below_threshold_only_accumulates() {
        let mut ledger = ledger_at(0, 100);
        let up = ledger.grant_experience(40, 25).unwrap();
        assert_eq!(up.levels_gained, 0);
        assert_eq!(up.new_level, 1);
        assert_eq!(ledger.experience(), 40);
        assert_eq!(ledger.experience_to_next_level(), 100);
    }

    #[test]
    fn grant_exactly_to_threshold_levels_up() {
        let mut ledger = ledger_at(90, 100);
        let up = ledger.grant_experience(10, 25).unwrap();
        assert_eq!(up.levels_gained, 1);
        assert_eq!(ledger.level(), 2);
        assert_eq!(ledger.experience(), 0);
        assert_eq!(ledger.experience_to_next_level(), 125);
    }

    #[test]
    fn single_grant_crosses_two_levels() {
        // 90 + 150 = 240; 240 - 100 = 140 (next 125); 140 - 125 = 15 (next 150).
        let mut ledger = ledger_at(90, 100);
        let up = ledger.grant_experience(150, 25).unwrap();
        assert_eq!(up.levels_gained, 2);
        assert_eq!(up.new_level, 3);
        assert_eq!(ledger.experience(), 15);
        assert_eq!(ledger.experience_to_next_level(), 150);
        assert!(ledger.experience() < ledger.experience_to_next_level());
    }

    #[test]
    fn larger_increment_stops_after_one_level() {
        let mut ledger = ledger_at(90, 100);
        let up = ledger.grant_experience(150, 50).unwrap();
        assert_eq!(up.levels_gained, 1);
        assert_eq!(ledger.experience(), 140);
        assert_eq!(ledger.experience_to_next_level(), 150);
    }

    #[test]
    fn zero_increment_uses_constant_threshold() {
        let mut ledger = ledger_at(0, 100);
        let up = ledger.grant_experience(1_050, 0).unwrap();
        assert_eq!(up.levels_gained, 10);
        assert_eq!(ledger.level(), 11);
        assert_eq!(ledger.experience(), 50);
        assert_eq!(ledger.experience_to_next_level(), 100);
    }

    #[test]
    fn preview_matches_grant_and_does_not_mutate() {
        let ledger = ledger_at(90, 100);
        let before = ledger.clone();
        let preview = ledger.preview_experience(150, 25).unwrap();
        assert_eq!(ledger, before);

        let mut granted = ledger;
        assert_eq!(granted.grant_experience(150, 25).unwrap(), preview);
    }

    #[test]
    fn overflowing_grant_is_refused_without_change() {
        let mut ledger = ledger_at(10, u64::MAX);
        let before = ledger.clone();
        let err = ledger.grant_experience(u64::MAX, 25).unwrap_err();
        assert!(matches!(err, LedgerError::ArithmeticOverflow { .. }));
        assert_eq!(ledger, before);
    }
}
