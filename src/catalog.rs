//! Service catalog

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    cars::PriceKey,
    errors::ErrorKind,
    pricing::Amount,
    services::{PriceEntry, ServiceTypeConfig, ServiceTypeId},
};

/// Errors raised by catalog mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// A service type with this identifier already exists.
    #[error("service type {0} already exists")]
    DuplicateKey(ServiceTypeId),

    /// No service type with this identifier exists.
    #[error("service type {0} not found")]
    NotFound(ServiceTypeId),

    /// The configuration breaks a price table rule.
    #[error("invalid configuration for service type {id}: {reason}")]
    InvalidConfig {
        /// Identifier of the rejected configuration
        id: ServiceTypeId,

        /// Which rule was broken
        reason: String,
    },
}

impl CatalogError {
    /// Flat error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::DuplicateKey(_) => ErrorKind::DuplicateKey,
            CatalogError::NotFound(_) => ErrorKind::NotFound,
            CatalogError::InvalidConfig { .. } => ErrorKind::InvalidConfig,
        }
    }
}

/// Editable mapping from service type identifier to pricing configuration.
///
/// All entries share a single currency. Price table rules are checked when a
/// configuration is written, so reads never have to re-validate.
#[derive(Debug, Clone)]
pub struct ServiceCatalog {
    services: FxHashMap<ServiceTypeId, ServiceTypeConfig>,
    currency: &'static Currency,
}

impl ServiceCatalog {
    /// Creates an empty catalog priced in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            services: FxHashMap::default(),
            currency,
        }
    }

    /// Creates a catalog from a list of configurations.
    ///
    /// # Errors
    ///
    /// Fails on the first configuration that [`ServiceCatalog::add`] would reject.
    pub fn with_services(
        currency: &'static Currency,
        configs: impl IntoIterator<Item = ServiceTypeConfig>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new(currency);

        for config in configs {
            catalog.add(config)?;
        }

        Ok(catalog)
    }

    /// Looks up a service type.
    pub fn get(&self, id: &str) -> Option<&ServiceTypeConfig> {
        self.services.get(id)
    }

    /// Adds a new service type.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::DuplicateKey`]: the identifier is already taken.
    /// - [`CatalogError::InvalidConfig`]: the price table breaks a coverage rule.
    pub fn add(&mut self, config: ServiceTypeConfig) -> Result<(), CatalogError> {
        if self.services.contains_key(&config.id) {
            return Err(CatalogError::DuplicateKey(config.id));
        }

        validate_config(&config, self.currency)?;

        info!(service_type = %config.id, "service type added");

        self.services.insert(config.id.clone(), config);

        Ok(())
    }

    /// Replaces an existing service type.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`]: the identifier is absent.
    /// - [`CatalogError::InvalidConfig`]: the price table breaks a coverage rule.
    pub fn update(&mut self, config: ServiceTypeConfig) -> Result<(), CatalogError> {
        let Some(slot) = self.services.get_mut(&config.id) else {
            return Err(CatalogError::NotFound(config.id));
        };

        validate_config(&config, self.currency)?;

        info!(service_type = %config.id, "service type updated");

        *slot = config;

        Ok(())
    }

    /// Removes a service type.
    ///
    /// Recorded transactions keep their own price and commission, so removal
    /// does not look at them.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the identifier is absent.
    pub fn remove(&mut self, id: &str) -> Result<ServiceTypeConfig, CatalogError> {
        let removed = self
            .services
            .remove(id)
            .ok_or_else(|| CatalogError::NotFound(ServiceTypeId::from(id)))?;

        info!(service_type = %id, "service type removed");

        Ok(removed)
    }

    /// Currency every entry is priced in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Identifiers of all service types, sorted.
    pub fn ids(&self) -> Vec<&ServiceTypeId> {
        let mut ids: Vec<_> = self.services.keys().collect();
        ids.sort_unstable();
        ids
    }

    /// Iterate over all service types in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ServiceTypeConfig> {
        self.services.values()
    }

    /// Number of service types.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether the catalog has no service types.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

fn validate_config(
    config: &ServiceTypeConfig,
    currency: &'static Currency,
) -> Result<(), CatalogError> {
    let invalid = |reason: String| CatalogError::InvalidConfig {
        id: config.id.clone(),
        reason,
    };

    if config.id.as_str().trim().is_empty() {
        return Err(invalid("identifier is empty".to_string()));
    }

    if config.prices.is_empty() {
        return Err(invalid("price table is empty".to_string()));
    }

    let has_default = config.prices.contains_key(&PriceKey::Default);

    if config.requires_car_size && has_default {
        return Err(invalid(
            "size-priced service must not define a default price".to_string(),
        ));
    }

    if !config.requires_car_size && (!has_default || config.prices.len() != 1) {
        return Err(invalid(
            "flat-priced service must define exactly the default price".to_string(),
        ));
    }

    for (key, entry) in &config.prices {
        validate_entry(*key, entry, config.accepts_voucher, currency).map_err(invalid)?;
    }

    debug!(service_type = %config.id, keys = config.prices.len(), "configuration validated");

    Ok(())
}

fn validate_entry(
    key: PriceKey,
    entry: &PriceEntry,
    accepts_voucher: bool,
    currency: &'static Currency,
) -> Result<(), String> {
    if entry.voucher_commission.is_some() && !accepts_voucher {
        return Err(format!(
            "{key}: voucher commission set on a service that does not accept vouchers"
        ));
    }

    let amounts = [
        ("price", Some(entry.price)),
        ("commission", Some(entry.commission)),
        ("voucher commission", entry.voucher_commission),
    ];

    for (label, amount) in amounts {
        let Some(amount) = amount else { continue };

        check_amount(key, label, &amount, currency)?;
    }

    Ok(())
}

fn check_amount(
    key: PriceKey,
    label: &str,
    amount: &Amount,
    currency: &'static Currency,
) -> Result<(), String> {
    if amount.currency() != currency {
        return Err(format!(
            "{key}: {label} is in {}, catalog is in {}",
            amount.currency().iso_alpha_code,
            currency.iso_alpha_code
        ));
    }

    if amount.is_negative() {
        return Err(format!("{key}: {label} is negative"));
    }

    Ok(())
}
