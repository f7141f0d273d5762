//! Farmhouse upgrades and decoration purchases.

use homestead_types::{DecorationId, DecorationItem, UpgradeTier};
use homestead_world::Catalog;

use crate::LedgerError;
use crate::ledger::PlayerLedger;

impl PlayerLedger {
    /// Validate a farmhouse upgrade and return the tier it would move into.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NoUpgradeAvailable`] if the catalog has no tier for
    ///   `house_level + 1`.
    /// - [`LedgerError::InsufficientFunds`] if the tier cost is not covered.
    /// - [`LedgerError::ArithmeticOverflow`] if the energy cap would
    ///   overflow.
    pub fn check_upgrade_house<'c>(
        &self,
        catalog: &'c Catalog,
    ) -> Result<&'c UpgradeTier, LedgerError> {
        let tier = catalog
            .next_upgrade(self.house_level)
            .ok_or(LedgerError::NoUpgradeAvailable {
                house_level: self.house_level,
            })?;
        self.check_debit(tier.cost)?;
        if self.max_energy.checked_add(tier.energy_bonus).is_none() {
            return Err(LedgerError::ArithmeticOverflow {
                context: "energy cap",
            });
        }
        Ok(tier)
    }

    /// Upgrade the farmhouse by one tier: debit the cost, raise the house
    /// level, and grow the energy cap by the tier's bonus.
    ///
    /// Current energy is not topped up; only the cap grows.
    ///
    /// # Errors
    ///
    /// See [`check_upgrade_house`](Self::check_upgrade_house); the ledger
    /// is unchanged on error.
    pub fn upgrade_house<'c>(
        &mut self,
        catalog: &'c Catalog,
    ) -> Result<&'c UpgradeTier, LedgerError> {
        let tier = self.check_upgrade_house(catalog)?;
        self.debit(tier.cost)?;
        self.house_level = tier.level;
        self.max_energy = self.max_energy.saturating_add(tier.energy_bonus);
        self.unlocked_upgrades.insert(tier.level);

        tracing::info!(
            house_level = tier.level,
            label = %tier.label,
            cost = tier.cost,
            max_energy = self.max_energy,
            "Farmhouse upgraded"
        );
        Ok(tier)
    }

    /// Validate a decoration purchase and return the catalog item.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::UnknownItem`] if the id is not in the catalog.
    /// - [`LedgerError::AlreadyOwned`] if the decoration is already owned.
    /// - [`LedgerError::InsufficientFunds`] if the price is not covered.
    pub fn check_purchase_decoration<'c>(
        &self,
        id: &DecorationId,
        catalog: &'c Catalog,
    ) -> Result<&'c DecorationItem, LedgerError> {
        let item = catalog
            .decoration(id)
            .ok_or_else(|| LedgerError::UnknownItem(id.clone()))?;
        if self.owns(id) {
            return Err(LedgerError::AlreadyOwned(id.clone()));
        }
        self.check_debit(item.price)?;
        Ok(item)
    }

    /// Buy a decoration: debit its price and add it to the owned set.
    ///
    /// # Errors
    ///
    /// See [`check_purchase_decoration`](Self::check_purchase_decoration);
    /// the ledger is unchanged on error.
    pub fn purchase_decoration<'c>(
        &mut self,
        id: &DecorationId,
        catalog: &'c Catalog,
    ) -> Result<&'c DecorationItem, LedgerError> {
        let item = self.check_purchase_decoration(id, catalog)?;
        self.debit(item.price)?;
        self.owned_decorations.insert(item.id.clone());
        tracing::info!(decoration = %item.id, price = item.price, "Decoration purchased");
        Ok(item)
    }
}
