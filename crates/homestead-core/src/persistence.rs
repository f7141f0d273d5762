//! Persistence boundary: the snapshot format and the gateway trait.
//!
//! The core never touches storage directly. It hands a [`Snapshot`] to a
//! [`PersistenceGateway`] after each command and asks for one back at
//! startup. Write atomicity is the gateway's job; the core only guarantees
//! that every field (integers, timestamps, sets) round-trips exactly.

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use homestead_ledger::PlayerLedger;
use homestead_world::LandPlot;

/// Current snapshot format. Snapshots with any other version are treated
/// as unreadable.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Serialized game state: the ledger plus the full plot collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Format version, see [`SNAPSHOT_FORMAT_VERSION`].
    pub format_version: u32,
    /// The player's account.
    pub ledger: PlayerLedger,
    /// Every plot, in id order.
    pub plots: Vec<LandPlot>,
}

impl Snapshot {
    /// Build a current-version snapshot.
    pub const fn new(ledger: PlayerLedger, plots: Vec<LandPlot>) -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            ledger,
            plots,
        }
    }
}

/// Load/save boundary for snapshots.
pub trait PersistenceGateway {
    /// Storage failure type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the stored snapshot. `Ok(None)` means nothing has been saved
    /// yet (first run).
    fn load(&self) -> Result<Option<Snapshot>, Self::Error>;

    /// Replace the stored snapshot.
    fn save(&self, snapshot: &Snapshot) -> Result<(), Self::Error>;

    /// Discard the stored snapshot so the next `load` starts a new game.
    /// Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), Self::Error>;
}

/// Errors from [`MemoryGateway`].
#[derive(Debug, thiserror::Error)]
pub enum MemoryGatewayError {
    /// The stored bytes are not a valid snapshot.
    #[error("failed to decode snapshot: {source}")]
    Decode {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

/// In-process gateway that stores the JSON encoding of the last snapshot.
///
/// Going through JSON exercises the same serde path as the file store, so
/// round-trip tests against this gateway are meaningful.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    stored: Mutex<Option<String>>,
}

impl MemoryGateway {
    /// Create an empty gateway (first run).
    pub const fn new() -> Self {
        Self {
            stored: Mutex::new(None),
        }
    }

    /// Create a gateway holding arbitrary stored text, e.g. a corrupt save.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            stored: Mutex::new(Some(raw.into())),
        }
    }

    /// The stored text, if any.
    pub fn raw(&self) -> Option<String> {
        self.stored
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PersistenceGateway for MemoryGateway {
    type Error = MemoryGatewayError;

    fn load(&self) -> Result<Option<Snapshot>, Self::Error> {
        let guard = self.stored.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_deref() {
            None => Ok(None),
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
        }
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), Self::Error> {
        let encoded = serde_json::to_string(snapshot)?;
        *self.stored.lock().unwrap_or_else(PoisonError::into_inner) = Some(encoded);
        Ok(())
    }

    fn clear(&self) -> Result<(), Self::Error> {
        *self.stored.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use homestead_types::{CropId, DecorationId, Malady, PlotId};
    use homestead_world::Catalog;

    use super::*;

    #[test]
    fn empty_gateway_loads_none() {
        assert!(MemoryGateway::new().load().unwrap().is_none());
    }

    #[test]
    fn round_trip_is_exact() {
        let catalog = Catalog::standard();
        let mut ledger = PlayerLedger::default();
        ledger
            .purchase_decoration(&DecorationId::from("scarecrow"), &catalog)
            .unwrap();
        let mut plots = LandPlot::create_farm(3);
        let plot = plots.get_mut(1).unwrap();
        plot.plant(&CropId::from("corn"), &catalog, 1_712_345_678_901)
            .unwrap();
        plot.afflict(Malady::Weedy).unwrap();

        let snapshot = Snapshot::new(ledger, plots);
        let gateway = MemoryGateway::new();
        gateway.save(&snapshot).unwrap();
        let loaded = gateway.load().unwrap().unwrap();

        assert_eq!(loaded, snapshot);
        assert_eq!(
            loaded.plots.get(1).and_then(LandPlot::planted_at_ms),
            Some(1_712_345_678_901)
        );
        assert_eq!(loaded.plots.get(1).map(|p| p.id), Some(PlotId(1)));
    }

    #[test]
    fn clear_forgets_the_save() {
        let gateway = MemoryGateway::new();
        gateway
            .save(&Snapshot::new(PlayerLedger::default(), LandPlot::create_farm(2)))
            .unwrap();
        gateway.clear().unwrap();
        assert!(gateway.raw().is_none());
        assert!(gateway.load().unwrap().is_none());
        gateway.clear().unwrap();
    }

    #[test]
    fn corrupt_bytes_surface_as_decode_error() {
        let gateway = MemoryGateway::with_raw("{not json");
        assert!(matches!(
            gateway.load(),
            Err(MemoryGatewayError::Decode { .. })
        ));
    }
}
