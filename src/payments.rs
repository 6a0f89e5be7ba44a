//! Payments
//!
//! A transaction is settled in exactly one way. [`PaymentClassification`] makes
//! that a single value; [`PaymentFlags`] accepts the four independent
//! checkboxes a form produces and folds them into one classification.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::{errors::ErrorKind, services::ServiceTypeConfig};

/// How a transaction was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentClassification {
    /// Settled with a discount voucher
    Voucher,

    /// Paid in cash
    Cash,

    /// Paid on the card machine
    CardMachine,

    /// Not paid by the customer (e.g. an internally comped wash)
    Unpaid,
}

impl PaymentClassification {
    /// Every classification.
    pub const ALL: [PaymentClassification; 4] = [
        PaymentClassification::Voucher,
        PaymentClassification::Cash,
        PaymentClassification::CardMachine,
        PaymentClassification::Unpaid,
    ];

    /// Whether the customer pays nothing for this job.
    pub fn is_free_of_charge(self) -> bool {
        matches!(
            self,
            PaymentClassification::Voucher | PaymentClassification::Unpaid
        )
    }

    /// Whether the job counts as paid for loyalty purposes.
    ///
    /// Voucher jobs count: a zero price is not the same as unpaid.
    pub fn is_paid(self) -> bool {
        self != PaymentClassification::Unpaid
    }

    /// The kebab-case tag for this classification.
    pub fn tag(self) -> &'static str {
        match self {
            PaymentClassification::Voucher => "voucher",
            PaymentClassification::Cash => "cash",
            PaymentClassification::CardMachine => "card-machine",
            PaymentClassification::Unpaid => "unpaid",
        }
    }
}

impl fmt::Display for PaymentClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for PaymentClassification {
    type Err = UnknownPaymentClassification;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();

        PaymentClassification::ALL
            .into_iter()
            .find(|classification| classification.tag() == tag)
            .ok_or_else(|| UnknownPaymentClassification(s.to_string()))
    }
}

/// Error returned when a payment tag is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown payment classification: {0}")]
pub struct UnknownPaymentClassification(pub String);

/// Errors raised while classifying a payment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// No payment classification was selected.
    #[error("no payment classification selected")]
    MissingPaymentClassification,

    /// More than one payment classification was selected.
    #[error("more than one payment classification selected: {0:?}")]
    ConflictingPaymentClassification(Vec<PaymentClassification>),

    /// A voucher was selected for a service that does not accept vouchers.
    #[error("service type {0} does not accept vouchers")]
    VoucherNotSupported(String),
}

impl PaymentError {
    /// Flat error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PaymentError::MissingPaymentClassification => ErrorKind::MissingPaymentClassification,
            PaymentError::ConflictingPaymentClassification(_) => {
                ErrorKind::ConflictingPaymentClassification
            }
            PaymentError::VoucherNotSupported(_) => ErrorKind::VoucherNotSupported,
        }
    }
}

/// Validates a requested classification against a service type.
///
/// The voucher check mirrors the one the resolver makes, so a form can reject
/// an unsupported voucher before pricing.
///
/// # Errors
///
/// - [`PaymentError::MissingPaymentClassification`]: `requested` is `None`.
/// - [`PaymentError::VoucherNotSupported`]: voucher requested on a service
///   type that does not accept vouchers.
pub fn classify(
    requested: Option<PaymentClassification>,
    config: &ServiceTypeConfig,
) -> Result<PaymentClassification, PaymentError> {
    let classification = requested.ok_or(PaymentError::MissingPaymentClassification)?;

    if classification == PaymentClassification::Voucher && !config.accepts_voucher {
        return Err(PaymentError::VoucherNotSupported(config.id.to_string()));
    }

    Ok(classification)
}

/// Raw payment checkboxes as submitted by a form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaymentFlags {
    /// Voucher checkbox
    pub voucher: bool,

    /// Cash checkbox
    pub cash: bool,

    /// Card machine checkbox
    pub card_machine: bool,

    /// Unpaid checkbox
    pub unpaid: bool,
}

impl PaymentFlags {
    /// Folds the flags into a single classification.
    ///
    /// # Errors
    ///
    /// - [`PaymentError::MissingPaymentClassification`]: no flag is set.
    /// - [`PaymentError::ConflictingPaymentClassification`]: more than one flag is set.
    pub fn classify(self) -> Result<PaymentClassification, PaymentError> {
        let selected: Vec<PaymentClassification> = PaymentClassification::ALL
            .into_iter()
            .filter(|classification| self.is_set(*classification))
            .collect();

        if let [only] = selected.as_slice() {
            return Ok(*only);
        }

        if selected.is_empty() {
            Err(PaymentError::MissingPaymentClassification)
        } else {
            Err(PaymentError::ConflictingPaymentClassification(selected))
        }
    }

    fn is_set(self, classification: PaymentClassification) -> bool {
        match classification {
            PaymentClassification::Voucher => self.voucher,
            PaymentClassification::Cash => self.cash,
            PaymentClassification::CardMachine => self.card_machine,
            PaymentClassification::Unpaid => self.unpaid,
        }
    }
}

impl From<PaymentClassification> for PaymentFlags {
    fn from(classification: PaymentClassification) -> Self {
        let mut flags = PaymentFlags::default();

        match classification {
            PaymentClassification::Voucher => flags.voucher = true,
            PaymentClassification::Cash => flags.cash = true,
            PaymentClassification::CardMachine => flags.card_machine = true,
            PaymentClassification::Unpaid => flags.unpaid = true,
        }

        flags
    }
}
