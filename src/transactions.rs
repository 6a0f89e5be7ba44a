//! Transactions

use jiff::Timestamp;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    cars::CarSize,
    catalog::ServiceCatalog,
    errors::ErrorKind,
    payments::{PaymentClassification, PaymentError, classify},
    pricing::{Amount, PricingError, resolve},
    services::{ServiceTypeId, WAX_ADD_ON_SERVICE_TYPES},
};

/// Errors raised while building a transaction record.
#[derive(Debug, Error, PartialEq)]
pub enum TransactionError {
    /// The service type is not in the catalog.
    #[error("unknown service type: {0}")]
    UnknownServiceType(String),

    /// The service is priced by car size but no size was given.
    #[error("service type {0} requires a car size")]
    MissingCarSize(ServiceTypeId),

    /// No staff member was given.
    #[error("no staff member selected")]
    MissingStaff,

    /// Payment classification failed.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Price resolution failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// A stored record breaks a record invariant.
    #[error("invalid record {id}: {reason}")]
    InvalidRecord {
        /// Identifier of the rejected record
        id: Uuid,

        /// Which invariant was broken
        reason: String,
    },
}

impl TransactionError {
    /// Flat error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransactionError::UnknownServiceType(_) => ErrorKind::UnknownServiceType,
            TransactionError::MissingCarSize(_) => ErrorKind::MissingCarSize,
            TransactionError::MissingStaff => ErrorKind::MissingStaff,
            TransactionError::Payment(err) => err.kind(),
            TransactionError::Pricing(err) => err.kind(),
            TransactionError::InvalidRecord { .. } => ErrorKind::InvalidRecord,
        }
    }
}

/// Staff member who performed a job, with both display names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Staff {
    /// Staff identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// English display name
    pub name_en: String,
}

impl Staff {
    /// Creates a staff member.
    pub fn new(id: impl Into<String>, name: impl Into<String>, name_en: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            name_en: name_en.into(),
        }
    }
}

/// Raw selections for a new transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRequest {
    /// Selected service type identifier
    pub service_type: String,

    /// Selected car size, if any
    pub car_size: Option<CarSize>,

    /// Selected staff member
    pub staff: Staff,

    /// Selected payment classification, if any
    pub payment: Option<PaymentClassification>,

    /// Whether the wax add-on was selected
    pub wax_add_on: bool,

    /// Customer phone number or other contact
    pub customer_contact: Option<String>,
}

impl TransactionRequest {
    /// Starts a request for a service type and staff member.
    pub fn new(service_type: impl Into<String>, staff: Staff) -> Self {
        Self {
            service_type: service_type.into(),
            car_size: None,
            staff,
            payment: None,
            wax_add_on: false,
            customer_contact: None,
        }
    }

    /// Sets the car size.
    #[must_use]
    pub fn with_car_size(mut self, car_size: CarSize) -> Self {
        self.car_size = Some(car_size);
        self
    }

    /// Sets the payment classification.
    #[must_use]
    pub fn with_payment(mut self, payment: PaymentClassification) -> Self {
        self.payment = Some(payment);
        self
    }

    /// Selects the wax add-on.
    #[must_use]
    pub fn with_wax(mut self) -> Self {
        self.wax_add_on = true;
        self
    }

    /// Sets the customer contact.
    #[must_use]
    pub fn with_customer_contact(mut self, contact: impl Into<String>) -> Self {
        self.customer_contact = Some(contact.into());
        self
    }
}

/// Field-by-field contents of a record, as written to and read from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionParts {
    /// Record identifier
    pub id: Uuid,

    /// Creation time
    pub created_at: Timestamp,

    /// Service type identifier
    pub service_type: ServiceTypeId,

    /// Car size, `None` for flat-priced services
    pub car_size: Option<CarSize>,

    /// Staff member
    pub staff: Staff,

    /// Price charged
    pub price: Amount,

    /// Commission earned
    pub commission: Amount,

    /// Payment classification
    pub payment: PaymentClassification,

    /// Whether the wax add-on was sold
    pub wax_add_on: bool,

    /// Customer contact
    pub customer_contact: Option<String>,
}

/// An immutable record of a completed job.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    parts: TransactionParts,
}

impl TransactionRecord {
    /// Rehydrates a stored record.
    ///
    /// The stored price and commission are kept as-is; the record is not
    /// re-priced against the current catalog. Checks that need the catalog
    /// are made by [`TransactionBuilder::restore`].
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::InvalidRecord`] if the staff id is blank,
    /// an amount is negative or in a second currency, a voucher or unpaid
    /// record has a non-zero price, or wax is recorded on a service type that
    /// does not sell it.
    pub fn from_parts(parts: TransactionParts) -> Result<Self, TransactionError> {
        check_parts(&parts).map_err(|reason| TransactionError::InvalidRecord {
            id: parts.id,
            reason,
        })?;

        Ok(Self { parts })
    }

    /// Takes the record apart for storage.
    pub fn into_parts(self) -> TransactionParts {
        self.parts
    }

    /// Record identifier.
    pub fn id(&self) -> Uuid {
        self.parts.id
    }

    /// Creation time.
    pub fn created_at(&self) -> Timestamp {
        self.parts.created_at
    }

    /// Service type identifier.
    pub fn service_type(&self) -> &ServiceTypeId {
        &self.parts.service_type
    }

    /// Car size, `None` for flat-priced services.
    pub fn car_size(&self) -> Option<CarSize> {
        self.parts.car_size
    }

    /// Staff member who did the job.
    pub fn staff(&self) -> &Staff {
        &self.parts.staff
    }

    /// Price charged.
    pub fn price(&self) -> Amount {
        self.parts.price
    }

    /// Commission earned.
    pub fn commission(&self) -> Amount {
        self.parts.commission
    }

    /// Payment classification.
    pub fn payment(&self) -> PaymentClassification {
        self.parts.payment
    }

    /// Whether the wax add-on was sold.
    pub fn wax_add_on(&self) -> bool {
        self.parts.wax_add_on
    }

    /// Customer contact, if one was captured.
    pub fn customer_contact(&self) -> Option<&str> {
        self.parts.customer_contact.as_deref()
    }
}

/// Turns raw selections into transaction records, priced from a catalog.
#[derive(Debug, Clone, Copy)]
pub struct TransactionBuilder<'c> {
    catalog: &'c ServiceCatalog,
}

impl<'c> TransactionBuilder<'c> {
    /// Creates a builder pricing against the given catalog.
    pub fn new(catalog: &'c ServiceCatalog) -> Self {
        Self { catalog }
    }

    /// Builds a record stamped with the current time.
    ///
    /// # Errors
    ///
    /// See [`TransactionBuilder::build_at`].
    pub fn build(
        &self,
        request: TransactionRequest,
    ) -> Result<TransactionRecord, TransactionError> {
        self.build_at(request, Timestamp::now())
    }

    /// Builds a record stamped with `now`.
    ///
    /// Checks run in order and the first failure is returned; no record is
    /// produced unless every check passes.
    ///
    /// # Errors
    ///
    /// - [`TransactionError::UnknownServiceType`]: service type not in the catalog.
    /// - [`TransactionError::MissingCarSize`]: size-priced service without a car size.
    /// - [`TransactionError::MissingStaff`]: blank staff identifier.
    /// - [`TransactionError::Payment`]: missing or unsupported payment classification.
    /// - [`TransactionError::Pricing`]: no price could be resolved.
    pub fn build_at(
        &self,
        request: TransactionRequest,
        now: Timestamp,
    ) -> Result<TransactionRecord, TransactionError> {
        let service_type = request.service_type.clone();

        self.try_build(request, now)
            .inspect(|record| {
                info!(
                    id = %record.id(),
                    service_type = %record.service_type(),
                    payment = %record.payment(),
                    price = %record.price(),
                    commission = %record.commission(),
                    "transaction recorded"
                );
            })
            .inspect_err(|err| {
                warn!(%service_type, kind = %err.kind(), "transaction rejected: {err}");
            })
    }

    fn try_build(
        &self,
        request: TransactionRequest,
        now: Timestamp,
    ) -> Result<TransactionRecord, TransactionError> {
        let config = self
            .catalog
            .get(&request.service_type)
            .ok_or_else(|| TransactionError::UnknownServiceType(request.service_type.clone()))?;

        if config.requires_car_size && request.car_size.is_none() {
            return Err(TransactionError::MissingCarSize(config.id.clone()));
        }

        if request.staff.id.trim().is_empty() {
            return Err(TransactionError::MissingStaff);
        }

        let payment = classify(request.payment, config)?;
        let quote = resolve(config, request.car_size, payment, request.wax_add_on)?;

        let car_size = request.car_size.filter(|_| config.requires_car_size);
        let customer_contact = request
            .customer_contact
            .map(|contact| contact.trim().to_string())
            .filter(|contact| !contact.is_empty());

        Ok(TransactionRecord {
            parts: TransactionParts {
                id: Uuid::new_v4(),
                created_at: now,
                service_type: config.id.clone(),
                car_size,
                staff: request.staff,
                price: quote.price,
                commission: quote.commission,
                payment,
                wax_add_on: request.wax_add_on && config.supports_wax(),
                customer_contact,
            },
        })
    }

    /// Rehydrates a stored record and checks it against the catalog.
    ///
    /// On top of [`TransactionRecord::from_parts`], a record whose service
    /// type is still in the catalog must carry a car size exactly when the
    /// service is size-priced, and may only be a voucher job if the service
    /// accepts vouchers. Records of removed service types are kept as stored.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::InvalidRecord`] if any check fails.
    pub fn restore(
        &self,
        parts: TransactionParts,
    ) -> Result<TransactionRecord, TransactionError> {
        let record = TransactionRecord::from_parts(parts)?;

        let Some(config) = self.catalog.get(record.service_type().as_str()) else {
            return Ok(record);
        };

        let invalid = |reason: &str| TransactionError::InvalidRecord {
            id: record.id(),
            reason: reason.to_string(),
        };

        if config.requires_car_size && record.car_size().is_none() {
            return Err(invalid("size-priced service recorded without a car size"));
        }

        if !config.requires_car_size && record.car_size().is_some() {
            return Err(invalid("flat-priced service recorded with a car size"));
        }

        if record.payment() == PaymentClassification::Voucher && !config.accepts_voucher {
            return Err(invalid("voucher recorded on a service that does not accept vouchers"));
        }

        Ok(record)
    }
}

fn check_parts(parts: &TransactionParts) -> Result<(), String> {
    if parts.staff.id.trim().is_empty() {
        return Err("staff identifier is empty".to_string());
    }

    if parts.price.currency() != parts.commission.currency() {
        return Err("price and commission are in different currencies".to_string());
    }

    if parts.price.is_negative() || parts.commission.is_negative() {
        return Err("negative amount".to_string());
    }

    if parts.payment.is_free_of_charge() && !parts.price.is_zero() {
        return Err(format!("{} record has a non-zero price", parts.payment));
    }

    if parts.wax_add_on && !WAX_ADD_ON_SERVICE_TYPES.contains(&parts.service_type.as_str()) {
        return Err(format!("wax recorded on {}", parts.service_type));
    }

    Ok(())
}
