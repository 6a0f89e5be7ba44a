//! Error kinds
//!
//! Every error type in the crate maps onto one [`ErrorKind`], so callers that
//! render form feedback can match on a single flat enum instead of on each
//! module's error type.

use std::fmt;

/// Flat classification of every failure the engine can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A service type with the same identifier already exists.
    DuplicateKey,

    /// The service type to update or remove does not exist.
    NotFound,

    /// A service type configuration violates a price table rule.
    InvalidConfig,

    /// A size-priced service was requested without a car size.
    MissingCarSize,

    /// No price entry exists for the requested car size.
    UnsupportedCarSize,

    /// A voucher was requested for a service that does not accept one.
    VoucherNotSupported,

    /// No payment classification was selected.
    MissingPaymentClassification,

    /// More than one payment classification was selected.
    ConflictingPaymentClassification,

    /// The requested service type is not in the catalog.
    UnknownServiceType,

    /// No staff member was selected.
    MissingStaff,

    /// Money arithmetic failed (e.g. a currency mismatch).
    Money,

    /// A deep link could not be composed.
    InvalidDeepLink,

    /// A stored record breaks a record invariant.
    InvalidRecord,

    /// Configuration could not be read or parsed.
    Configuration,

    /// Output could not be written.
    Io,
}

/// Form field an error should be reported against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Service type selector
    ServiceType,

    /// Car size selector
    CarSize,

    /// Staff member selector
    Staff,

    /// Payment method checkboxes
    Payment,

    /// Customer contact input
    CustomerContact,

    /// Price table of a service type being edited
    PriceTable,
}

impl ErrorKind {
    /// The form field this kind of error belongs to, if any.
    pub fn field(self) -> Option<Field> {
        match self {
            ErrorKind::DuplicateKey | ErrorKind::NotFound | ErrorKind::UnknownServiceType => {
                Some(Field::ServiceType)
            }
            ErrorKind::InvalidConfig => Some(Field::PriceTable),
            ErrorKind::MissingCarSize | ErrorKind::UnsupportedCarSize => Some(Field::CarSize),
            ErrorKind::VoucherNotSupported
            | ErrorKind::MissingPaymentClassification
            | ErrorKind::ConflictingPaymentClassification => Some(Field::Payment),
            ErrorKind::MissingStaff => Some(Field::Staff),
            ErrorKind::InvalidDeepLink => Some(Field::CustomerContact),
            ErrorKind::Money
            | ErrorKind::InvalidRecord
            | ErrorKind::Configuration
            | ErrorKind::Io => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
