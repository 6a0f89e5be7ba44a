//! Prices

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    cars::{CarSize, PriceKey},
    errors::ErrorKind,
    payments::PaymentClassification,
    services::{
        PriceEntry, ServiceTypeConfig, ServiceTypeId, WAX_ADD_ON_COMMISSION_MINOR,
        WAX_ADD_ON_PRICE_MINOR,
    },
};

/// A monetary amount in a catalog currency.
pub type Amount = Money<'static, Currency>;

/// Errors that can occur while resolving a price.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The service is priced by car size but no size was given.
    #[error("service type {0} requires a car size")]
    MissingCarSize(ServiceTypeId),

    /// The service has no price for the requested key.
    #[error("service type {service_type} has no price for {key}")]
    UnsupportedCarSize {
        /// Service type being priced
        service_type: ServiceTypeId,

        /// Key that was looked up
        key: PriceKey,
    },

    /// A voucher was requested but the service or entry does not accept one.
    #[error("service type {0} does not accept vouchers")]
    VoucherNotSupported(ServiceTypeId),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

impl PricingError {
    /// Flat error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PricingError::MissingCarSize(_) => ErrorKind::MissingCarSize,
            PricingError::UnsupportedCarSize { .. } => ErrorKind::UnsupportedCarSize,
            PricingError::VoucherNotSupported(_) => ErrorKind::VoucherNotSupported,
            PricingError::Money(_) => ErrorKind::Money,
        }
    }
}

/// Resolved customer price and staff commission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    /// Amount the customer pays
    pub price: Amount,

    /// Amount the staff member earns
    pub commission: Amount,
}

impl Quote {
    fn new(price: Amount, commission: Amount) -> Self {
        Self { price, commission }
    }
}

/// Resolves the price table key for a service type.
///
/// Flat-priced services always use `default`, whatever car size was supplied.
///
/// # Errors
///
/// Returns [`PricingError::MissingCarSize`] if the service is size-priced and
/// `car_size` is `None`.
pub fn price_key(
    config: &ServiceTypeConfig,
    car_size: Option<CarSize>,
) -> Result<PriceKey, PricingError> {
    if !config.requires_car_size {
        return Ok(PriceKey::Default);
    }

    car_size
        .map(PriceKey::Size)
        .ok_or_else(|| PricingError::MissingCarSize(config.id.clone()))
}

/// Resolves the price and commission of a job.
///
/// Vouchers pay the entry's voucher commission. The wax add-on adds its fixed
/// price and commission together. Voucher and unpaid jobs are charged nothing
/// but still pay the commission computed above, add-on included.
///
/// # Errors
///
/// - [`PricingError::MissingCarSize`]: size-priced service without a car size.
/// - [`PricingError::UnsupportedCarSize`]: no entry for the resolved key.
/// - [`PricingError::VoucherNotSupported`]: voucher requested but the service
///   does not accept vouchers or the entry has no voucher commission.
/// - [`PricingError::Money`]: the add-on could not be added to the base amounts.
pub fn resolve(
    config: &ServiceTypeConfig,
    car_size: Option<CarSize>,
    payment: PaymentClassification,
    wax_add_on: bool,
) -> Result<Quote, PricingError> {
    let key = price_key(config, car_size)?;

    let entry = config
        .entry(key)
        .ok_or_else(|| PricingError::UnsupportedCarSize {
            service_type: config.id.clone(),
            key,
        })?;

    let mut quote = base_quote(config, entry, payment)?;

    if wax_add_on && config.supports_wax() {
        quote = with_wax(quote)?;
    }

    if payment.is_free_of_charge() {
        quote.price = Money::from_minor(0, quote.price.currency());
    }

    debug!(
        service_type = %config.id,
        %key,
        ?payment,
        wax_add_on,
        price = %quote.price,
        commission = %quote.commission,
        "price resolved"
    );

    Ok(quote)
}

fn base_quote(
    config: &ServiceTypeConfig,
    entry: &PriceEntry,
    payment: PaymentClassification,
) -> Result<Quote, PricingError> {
    if payment != PaymentClassification::Voucher {
        return Ok(Quote::new(entry.price, entry.commission));
    }

    match entry.voucher_commission {
        Some(commission) if config.accepts_voucher => Ok(Quote::new(
            Money::from_minor(0, entry.currency()),
            commission,
        )),
        _ => Err(PricingError::VoucherNotSupported(config.id.clone())),
    }
}

fn with_wax(quote: Quote) -> Result<Quote, PricingError> {
    let currency = quote.price.currency();

    Ok(Quote::new(
        quote
            .price
            .add(Money::from_minor(WAX_ADD_ON_PRICE_MINOR, currency))?,
        quote
            .commission
            .add(Money::from_minor(WAX_ADD_ON_COMMISSION_MINOR, currency))?,
    ))
}
