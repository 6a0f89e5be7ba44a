//! Catalog Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{
    cars::PriceKey,
    catalog::ServiceCatalog,
    fixtures::FixtureError,
    pricing::Amount,
    services::{PriceEntry, ServiceNames, ServiceTypeConfig},
};

/// Wrapper for a catalog in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// ISO currency code shared by every price
    pub currency: String,

    /// Map of service type id -> service fixture
    pub services: FxHashMap<String, ServiceFixture>,
}

/// Service type fixture from YAML
#[derive(Debug, Deserialize)]
pub struct ServiceFixture {
    /// Primary display name
    #[serde(default)]
    pub name: String,

    /// Arabic display name
    #[serde(default)]
    pub name_ar: String,

    /// English display name
    #[serde(default)]
    pub name_en: String,

    /// Whether the price depends on the car size
    #[serde(default)]
    pub requires_car_size: bool,

    /// Whether vouchers are accepted
    #[serde(default)]
    pub accepts_voucher: bool,

    /// Map of `default` or car size tag -> price entry
    pub prices: FxHashMap<String, PriceEntryFixture>,
}

/// Price entry fixture, amounts written as `"25.00 SAR"`
#[derive(Debug, Deserialize)]
pub struct PriceEntryFixture {
    /// Customer price
    pub price: String,

    /// Staff commission
    pub commission: String,

    /// Staff commission for voucher jobs
    #[serde(default)]
    pub voucher_commission: Option<String>,
}

/// Parse a catalog from YAML text
///
/// Service types are added in identifier order so the first invalid one
/// reported is stable.
///
/// # Errors
///
/// Returns an error if the YAML is malformed, a price or key cannot be
/// parsed, or the catalog rejects a service type.
pub fn parse(yaml: &str) -> Result<ServiceCatalog, FixtureError> {
    let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

    fixture.try_into_catalog()
}

impl CatalogFixture {
    /// Convert to a [`ServiceCatalog`]
    ///
    /// # Errors
    ///
    /// Returns an error if a service type cannot be converted or is rejected.
    pub fn try_into_catalog(self) -> Result<ServiceCatalog, FixtureError> {
        let currency = find_currency(&self.currency)?;
        let mut catalog = ServiceCatalog::new(currency);

        let mut services: Vec<(String, ServiceFixture)> = self.services.into_iter().collect();
        services.sort_by(|(a, _), (b, _)| a.cmp(b));

        for (id, service) in services {
            catalog.add(service.try_into_config(id)?)?;
        }

        Ok(catalog)
    }
}

impl ServiceFixture {
    /// Convert to a [`ServiceTypeConfig`] with the given id
    ///
    /// # Errors
    ///
    /// Returns an error if a price key or amount cannot be parsed.
    pub fn try_into_config(self, id: String) -> Result<ServiceTypeConfig, FixtureError> {
        let prices = self
            .prices
            .into_iter()
            .map(|(key, entry)| -> Result<_, FixtureError> {
                Ok((key.parse::<PriceKey>()?, PriceEntry::try_from(entry)?))
            })
            .collect::<Result<FxHashMap<_, _>, _>>()?;

        Ok(ServiceTypeConfig {
            id: id.into(),
            names: ServiceNames {
                name: self.name,
                name_ar: self.name_ar,
                name_en: self.name_en,
            },
            requires_car_size: self.requires_car_size,
            accepts_voucher: self.accepts_voucher,
            prices,
        })
    }
}

impl TryFrom<PriceEntryFixture> for PriceEntry {
    type Error = FixtureError;

    fn try_from(fixture: PriceEntryFixture) -> Result<Self, Self::Error> {
        let entry = PriceEntry::new(
            parse_price(&fixture.price)?,
            parse_price(&fixture.commission)?,
        );

        match fixture.voucher_commission {
            Some(commission) => Ok(entry.with_voucher_commission(parse_price(&commission)?)),
            None => Ok(entry),
        }
    }
}

/// Parse an amount written as `"<decimal> <ISO code>"`, e.g. `"25.00 SAR"`
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPrice`] for a malformed amount or one with
/// more decimal places than the currency allows, and
/// [`FixtureError::UnknownCurrency`] for an unrecognised code.
pub fn parse_price(s: &str) -> Result<Amount, FixtureError> {
    let mut parts = s.split_whitespace();

    let (Some(value), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    };

    let currency = find_currency(code)?;

    let value: Decimal = value
        .parse()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = 10_i64
        .checked_pow(currency.exponent)
        .and_then(|factor| value.checked_mul(Decimal::from(factor)))
        .filter(|scaled| scaled.fract().is_zero())
        .and_then(|scaled| scaled.to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok(Money::from_minor(minor_units, currency))
}

fn find_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    rusty_money::iso::find(code).ok_or_else(|| FixtureError::UnknownCurrency(code.to_string()))
}
