//! The static game catalog: crops, farmhouse upgrade tiers, and decorations.
//!
//! A [`Catalog`] is validated once at construction and never mutated
//! afterwards. The standard catalog reproduces the original farm's data;
//! a custom one may be supplied from configuration.

use std::collections::BTreeSet;

use homestead_types::{CropDefinition, CropId, DecorationId, DecorationItem, UpgradeTier};

use crate::error::CatalogError;

/// Helper to build a [`CropDefinition`].
fn crop(id: &str, name: &str, growth_seconds: u64, buy: u64, sell: u64, xp: u64) -> CropDefinition {
    CropDefinition {
        id: CropId::from(id),
        name: name.to_owned(),
        growth_duration_seconds: growth_seconds,
        buy_price: buy,
        sell_price: sell,
        xp_reward: xp,
    }
}

/// Helper to build an [`UpgradeTier`].
fn tier(level: u32, cost: u64, energy_bonus: u32, label: &str) -> UpgradeTier {
    UpgradeTier {
        level,
        cost,
        energy_bonus,
        label: label.to_owned(),
    }
}

/// Helper to build a [`DecorationItem`].
fn decoration(id: &str, name: &str, description: &str, price: u64) -> DecorationItem {
    DecorationItem {
        id: DecorationId::from(id),
        name: name.to_owned(),
        description: description.to_owned(),
        price,
    }
}

/// Immutable catalog of everything the player can plant, build, or buy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    crops: Vec<CropDefinition>,
    upgrades: Vec<UpgradeTier>,
    decorations: Vec<DecorationItem>,
}

impl Catalog {
    /// Build a catalog, validating its contents.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if there are no crops, an id is duplicated,
    /// a crop has a zero growth duration, or upgrade tiers are not strictly
    /// increasing in both level and cost.
    pub fn new(
        crops: Vec<CropDefinition>,
        upgrades: Vec<UpgradeTier>,
        decorations: Vec<DecorationItem>,
    ) -> Result<Self, CatalogError> {
        if crops.is_empty() {
            return Err(CatalogError::NoCrops);
        }

        let mut seen_crops = BTreeSet::new();
        for def in &crops {
            check_id(def.id.as_str())?;
            if !seen_crops.insert(&def.id) {
                return Err(CatalogError::DuplicateCrop(def.id.clone()));
            }
            if def.growth_duration_seconds == 0 {
                return Err(CatalogError::ZeroGrowthDuration(def.id.clone()));
            }
        }

        for pair in upgrades.windows(2) {
            if let [previous, next] = pair
                && (next.level <= previous.level || next.cost <= previous.cost)
            {
                return Err(CatalogError::TierOrder {
                    previous_level: previous.level,
                    level: next.level,
                });
            }
        }

        let mut seen_decorations = BTreeSet::new();
        for item in &decorations {
            check_id(item.id.as_str())?;
            if !seen_decorations.insert(&item.id) {
                return Err(CatalogError::DuplicateDecoration(item.id.clone()));
            }
        }

        tracing::debug!(
            crops = crops.len(),
            upgrade_tiers = upgrades.len(),
            decorations = decorations.len(),
            "Catalog validated"
        );

        Ok(Self {
            crops,
            upgrades,
            decorations,
        })
    }

    /// The standard catalog shipped with the game.
    ///
    /// Crop growth times and prices match the original farm; upgrade tier
    /// 1 is the starting cottage and costs nothing.
    pub fn standard() -> Self {
        Self {
            crops: vec![
                crop("radish", "White Radish", 30, 10, 25, 5),
                crop("cabbage", "Cabbage", 60, 20, 55, 12),
                crop("corn", "Golden Corn", 120, 50, 150, 30),
                crop("watermelon", "Watermelon", 300, 100, 350, 75),
            ],
            upgrades: vec![
                tier(1, 0, 0, "Thatched Cottage"),
                tier(2, 500, 20, "Timber House"),
                tier(3, 1500, 30, "Brick Farmhouse"),
                tier(4, 4000, 50, "Country Manor"),
            ],
            decorations: vec![
                decoration("scarecrow", "Scarecrow", "Keeps the crows honest.", 50),
                decoration("flower_bed", "Flower Bed", "A splash of color by the door.", 120),
                decoration("windmill", "Windmill", "Turns lazily in the breeze.", 300),
                decoration("fountain", "Stone Fountain", "The pride of the village.", 800),
            ],
        }
    }

    /// All crops, in catalog order.
    pub fn crops(&self) -> &[CropDefinition] {
        &self.crops
    }

    /// All upgrade tiers, in ascending level order.
    pub fn upgrades(&self) -> &[UpgradeTier] {
        &self.upgrades
    }

    /// All decorations, in catalog order.
    pub fn decorations(&self) -> &[DecorationItem] {
        &self.decorations
    }

    /// Look up a crop by id.
    pub fn crop(&self, id: &CropId) -> Option<&CropDefinition> {
        self.crops.iter().find(|def| &def.id == id)
    }

    /// Look up the upgrade tier for an exact house level.
    pub fn upgrade_for_level(&self, level: u32) -> Option<&UpgradeTier> {
        self.upgrades.iter().find(|t| t.level == level)
    }

    /// The tier a house at `current_level` would upgrade into, if any.
    pub fn next_upgrade(&self, current_level: u32) -> Option<&UpgradeTier> {
        current_level
            .checked_add(1)
            .and_then(|next| self.upgrade_for_level(next))
    }

    /// Look up a decoration by id.
    pub fn decoration(&self, id: &DecorationId) -> Option<&DecorationItem> {
        self.decorations.iter().find(|item| &item.id == id)
    }
}

/// Player input is lowercased before lookup, so a catalog id must already
/// be in that form to be reachable.
fn check_id(id: &str) -> Result<(), CatalogError> {
    if id.is_empty() || id.chars().any(|c| c.is_whitespace() || c.is_uppercase()) {
        return Err(CatalogError::InvalidId(id.to_owned()));
    }
    Ok(())
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_passes_validation() {
        let standard = Catalog::standard();
        let rebuilt = Catalog::new(
            standard.crops().to_vec(),
            standard.upgrades().to_vec(),
            standard.decorations().to_vec(),
        );
        assert_eq!(rebuilt.unwrap(), standard);
    }

    #[test]
    fn radish_matches_original_data() {
        let catalog = Catalog::standard();
        let radish = catalog.crop(&CropId::from("radish")).unwrap();
        assert_eq!(radish.growth_duration_seconds, 30);
        assert_eq!(radish.buy_price, 10);
        assert_eq!(radish.sell_price, 25);
    }

    #[test]
    fn next_upgrade_walks_tiers() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.next_upgrade(1).map(|t| t.level), Some(2));
        assert_eq!(catalog.next_upgrade(3).map(|t| t.level), Some(4));
        assert!(catalog.next_upgrade(4).is_none());
        assert!(catalog.next_upgrade(u32::MAX).is_none());
    }

    #[test]
    fn unknown_lookups_return_none() {
        let catalog = Catalog::standard();
        assert!(catalog.crop(&CropId::from("kale")).is_none());
        assert!(catalog.decoration(&DecorationId::from("gazebo")).is_none());
    }

    #[test]
    fn rejects_empty_crop_list() {
        let result = Catalog::new(Vec::new(), Vec::new(), Vec::new());
        assert_eq!(result.unwrap_err(), CatalogError::NoCrops);
    }

    #[test]
    fn rejects_duplicate_crop() {
        let crops = vec![
            crop("radish", "White Radish", 30, 10, 25, 5),
            crop("radish", "Red Radish", 40, 12, 30, 6),
        ];
        let result = Catalog::new(crops, Vec::new(), Vec::new());
        assert_eq!(
            result.unwrap_err(),
            CatalogError::DuplicateCrop(CropId::from("radish"))
        );
    }

    #[test]
    fn rejects_zero_growth() {
        let crops = vec![crop("instant", "Instant Bean", 0, 1, 2, 1)];
        let result = Catalog::new(crops, Vec::new(), Vec::new());
        assert!(matches!(result, Err(CatalogError::ZeroGrowthDuration(_))));
    }

    #[test]
    fn rejects_non_increasing_tier_cost() {
        let crops = vec![crop("radish", "White Radish", 30, 10, 25, 5)];
        let upgrades = vec![tier(1, 100, 0, "Hut"), tier(2, 100, 10, "Shed")];
        let result = Catalog::new(crops, upgrades, Vec::new());
        assert_eq!(
            result.unwrap_err(),
            CatalogError::TierOrder {
                previous_level: 1,
                level: 2,
            }
        );
    }

    #[test]
    fn rejects_duplicate_decoration() {
        let crops = vec![crop("radish", "White Radish", 30, 10, 25, 5)];
        let decorations = vec![
            decoration("gnome", "Gnome", "", 10),
            decoration("gnome", "Other Gnome", "", 20),
        ];
        let result = Catalog::new(crops, Vec::new(), decorations);
        assert!(matches!(result, Err(CatalogError::DuplicateDecoration(_))));
    }

    #[test]
    fn rejects_ids_player_input_cannot_reach() {
        let crops = vec![crop("Turnip", "Turnip", 20, 5, 12, 3)];
        let result = Catalog::new(crops, Vec::new(), Vec::new());
        assert_eq!(
            result.unwrap_err(),
            CatalogError::InvalidId("Turnip".to_owned())
        );

        let crops = vec![crop("radish", "White Radish", 30, 10, 25, 5)];
        let decorations = vec![decoration("garden gnome", "Gnome", "", 10)];
        let result = Catalog::new(crops, Vec::new(), decorations);
        assert!(matches!(result, Err(CatalogError::InvalidId(_))));

        let crops = vec![crop("", "Nothing", 30, 10, 25, 5)];
        assert!(matches!(
            Catalog::new(crops, Vec::new(), Vec::new()),
            Err(CatalogError::InvalidId(_))
        ));
    }
}
