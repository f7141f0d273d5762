//! Optional lazy energy regeneration.
//!
//! When enabled, each successful command credits energy for every whole
//! interval elapsed since the last settlement; a rejected command leaves the
//! credit owed. Views show owed energy through [`preview`]. Nothing runs
//! on a timer; a player who is away for an hour gets the same energy as one
//! who polled every second.

use homestead_ledger::PlayerLedger;

/// Regeneration rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnergyRegen {
    /// Energy restored per whole interval.
    pub points_per_interval: u32,
    /// Interval length in milliseconds (must be positive).
    pub interval_ms: i64,
}

/// Regeneration owed at a point in time, computed without mutating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regenerated {
    /// Energy credited (after clamping to the cap).
    pub restored: u32,
    /// Energy the ledger holds once the credit is applied.
    pub energy: u32,
    /// New settlement mark, epoch ms.
    pub settled_at_ms: i64,
}

/// Compute the regeneration owed at `now_ms`. Pure, like readiness.
///
/// A ledger that has never been settled, or whose mark lies in the future
/// (the clock went backwards), is marked at `now_ms` without a credit.
/// The remainder of a partial interval carries over to the next settlement.
pub fn preview(ledger: &PlayerLedger, regen: &EnergyRegen, now_ms: i64) -> Regenerated {
    let settled = ledger.energy_settled_at_ms();
    let unchanged = |settled_at_ms| Regenerated {
        restored: 0,
        energy: ledger.energy(),
        settled_at_ms,
    };
    if regen.interval_ms <= 0 || settled <= 0 || settled > now_ms {
        return unchanged(now_ms);
    }

    let elapsed = now_ms.saturating_sub(settled);
    let intervals = elapsed.checked_div(regen.interval_ms).unwrap_or(0);
    if intervals == 0 {
        return unchanged(settled);
    }

    let points = u64::try_from(intervals)
        .unwrap_or(0)
        .saturating_mul(u64::from(regen.points_per_interval));
    let points = u32::try_from(points).unwrap_or(u32::MAX);
    let energy = ledger
        .energy()
        .saturating_add(points)
        .min(ledger.max_energy());

    let settled_at_ms = if energy >= ledger.max_energy() {
        now_ms
    } else {
        settled.saturating_add(intervals.saturating_mul(regen.interval_ms))
    };

    Regenerated {
        restored: energy.saturating_sub(ledger.energy()),
        energy,
        settled_at_ms,
    }
}

/// Apply the regeneration owed at `now_ms` and advance the settlement
/// mark. Returns the energy actually restored.
pub fn settle(ledger: &mut PlayerLedger, regen: &EnergyRegen, now_ms: i64) -> u32 {
    let owed = preview(ledger, regen, now_ms);
    let restored = ledger.restore_energy(owed.restored);
    ledger.mark_energy_settled(owed.settled_at_ms);
    if restored > 0 {
        tracing::debug!(restored, energy = ledger.energy(), "Energy regenerated");
    }
    restored
}

/// Copy of `ledger` with the regeneration owed at `now_ms` applied.
pub fn settled(ledger: &PlayerLedger, regen: &EnergyRegen, now_ms: i64) -> PlayerLedger {
    let mut staged = ledger.clone();
    settle(&mut staged, regen, now_ms);
    staged
}
