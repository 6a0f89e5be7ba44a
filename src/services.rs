//! Service types

use std::{borrow::Borrow, fmt};

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};

use crate::{
    cars::{CarSize, PriceKey},
    pricing::Amount,
};

/// Service types that accept the wax add-on.
pub const WAX_ADD_ON_SERVICE_TYPES: [&str; 2] = ["whole-wash", "outside-only"];

/// Wax add-on price, in minor units of the catalog currency.
pub const WAX_ADD_ON_PRICE_MINOR: i64 = 1_000;

/// Wax add-on staff commission, in minor units of the catalog currency.
pub const WAX_ADD_ON_COMMISSION_MINOR: i64 = 300;

/// Stable identifier of a service type (e.g. `whole-wash`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceTypeId(String);

impl ServiceTypeId {
    /// Creates a new service type identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServiceTypeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ServiceTypeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ServiceTypeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ServiceTypeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Price, staff commission and optional voucher commission for one price key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceEntry {
    /// Customer price
    pub price: Amount,

    /// Staff commission for a regularly paid job
    pub commission: Amount,

    /// Staff commission when the customer pays with a voucher
    pub voucher_commission: Option<Amount>,
}

impl PriceEntry {
    /// Creates a price entry without a voucher commission.
    pub fn new(price: Amount, commission: Amount) -> Self {
        Self {
            price,
            commission,
            voucher_commission: None,
        }
    }

    /// Creates a price entry from minor units in the given currency.
    pub fn from_minor(price: i64, commission: i64, currency: &'static Currency) -> Self {
        Self::new(
            Money::from_minor(price, currency),
            Money::from_minor(commission, currency),
        )
    }

    /// Sets the commission paid when the job is settled with a voucher.
    #[must_use]
    pub fn with_voucher_commission(mut self, commission: Amount) -> Self {
        self.voucher_commission = Some(commission);
        self
    }

    /// Currency of the customer price.
    pub fn currency(&self) -> &'static Currency {
        self.price.currency()
    }
}

/// Display names of a service type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceNames {
    /// Primary display name
    pub name: String,

    /// Arabic display name
    pub name_ar: String,

    /// English display name
    pub name_en: String,
}

/// Pricing configuration of a single service type.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceTypeConfig {
    /// Unique identifier
    pub id: ServiceTypeId,

    /// Display names
    pub names: ServiceNames,

    /// Whether a car size must be chosen to price this service
    pub requires_car_size: bool,

    /// Whether a discount voucher is accepted for this service
    pub accepts_voucher: bool,

    /// Price table
    pub prices: FxHashMap<PriceKey, PriceEntry>,
}

impl ServiceTypeConfig {
    /// Creates a flat-priced service type with a single `default` entry.
    pub fn flat(id: impl Into<ServiceTypeId>, entry: PriceEntry) -> Self {
        let mut prices = FxHashMap::default();
        prices.insert(PriceKey::Default, entry);

        Self {
            id: id.into(),
            names: ServiceNames::default(),
            requires_car_size: false,
            accepts_voucher: false,
            prices,
        }
    }

    /// Creates a size-priced service type with one entry per supported car size.
    pub fn sized(
        id: impl Into<ServiceTypeId>,
        entries: impl IntoIterator<Item = (CarSize, PriceEntry)>,
    ) -> Self {
        let prices = entries
            .into_iter()
            .map(|(size, entry)| (PriceKey::Size(size), entry))
            .collect();

        Self {
            id: id.into(),
            names: ServiceNames::default(),
            requires_car_size: true,
            accepts_voucher: false,
            prices,
        }
    }

    /// Marks the service type as accepting discount vouchers.
    #[must_use]
    pub fn accepting_vouchers(mut self) -> Self {
        self.accepts_voucher = true;
        self
    }

    /// Sets the display names.
    #[must_use]
    pub fn with_names(mut self, names: ServiceNames) -> Self {
        self.names = names;
        self
    }

    /// Returns the price entry for a key, if defined.
    pub fn entry(&self, key: PriceKey) -> Option<&PriceEntry> {
        self.prices.get(&key)
    }

    /// Car sizes this service type has prices for, smallest first.
    pub fn supported_sizes(&self) -> Vec<CarSize> {
        CarSize::ALL
            .into_iter()
            .filter(|size| self.prices.contains_key(&PriceKey::Size(*size)))
            .collect()
    }

    /// Whether the wax add-on may be sold with this service type.
    pub fn supports_wax(&self) -> bool {
        WAX_ADD_ON_SERVICE_TYPES.contains(&self.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::SAR;

    use super::*;

    #[test]
    fn flat_config_has_only_default_key() {
        let config = ServiceTypeConfig::flat("inside-only", PriceEntry::from_minor(1000, 400, SAR));

        assert!(!config.requires_car_size);
        assert_eq!(config.prices.len(), 1);
        assert!(config.entry(PriceKey::Default).is_some());
    }

    #[test]
    fn sized_config_reports_supported_sizes_in_order() {
        let config = ServiceTypeConfig::sized(
            "outside-only",
            [
                (CarSize::Big, PriceEntry::from_minor(2500, 1000, SAR)),
                (CarSize::Small, PriceEntry::from_minor(1500, 500, SAR)),
            ],
        );

        assert!(config.requires_car_size);
        assert_eq!(config.supported_sizes(), vec![CarSize::Small, CarSize::Big]);
    }

    #[test]
    fn wax_support_follows_fixed_service_set() {
        let outside = ServiceTypeConfig::sized("outside-only", []);
        let mirrors =
            ServiceTypeConfig::flat("mirrors-only", PriceEntry::from_minor(500, 200, SAR));

        assert!(outside.supports_wax());
        assert!(!mirrors.supports_wax());
    }

    #[test]
    fn voucher_commission_builder_sets_value() {
        let entry = PriceEntry::from_minor(2000, 800, SAR)
            .with_voucher_commission(Money::from_minor(400, SAR));

        assert_eq!(entry.voucher_commission, Some(Money::from_minor(400, SAR)));
        assert_eq!(entry.currency(), SAR);
    }

    #[test]
    fn service_type_id_borrows_as_str() {
        let id = ServiceTypeId::from("ac-wash");
        let borrowed: &str = id.borrow();

        assert_eq!(borrowed, "ac-wash");
        assert_eq!(id.to_string(), "ac-wash");
    }
}
