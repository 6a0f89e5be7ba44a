//! Washbay prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cars::{CarSize, PriceKey, UnknownCarSize},
    catalog::{CatalogError, ServiceCatalog},
    errors::{ErrorKind, Field},
    fixtures::{Fixture, FixtureError},
    loyalty::{
        CustomerProfile, LOYALTY_CYCLE, LOYALTY_SERVICE_TYPE, RE_ENGAGEMENT_DAYS, aggregate,
        aggregate_at, group_by_contact,
    },
    messaging::{
        DeepLink, MessageTemplate, MessageTemplates, MessagingError, Outreach, compose, select,
    },
    payments::{PaymentClassification, PaymentError, PaymentFlags, classify},
    pricing::{Amount, PricingError, Quote, resolve},
    reports::{DailyReport, ReportError, StaffCommission},
    services::{PriceEntry, ServiceNames, ServiceTypeConfig, ServiceTypeId},
    transactions::{
        Staff, TransactionBuilder, TransactionError, TransactionParts, TransactionRecord,
        TransactionRequest,
    },
};
