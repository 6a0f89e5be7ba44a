//! Customer loyalty
//!
//! Profiles are folded from a customer's transaction records on demand and
//! hold no state of their own; aggregating the same records at the same
//! instant always gives the same profile.

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::transactions::TransactionRecord;

/// Service type whose paid jobs count towards the loyalty cycle.
pub const LOYALTY_SERVICE_TYPE: &str = "full-wash";

/// Number of paid full washes after which a free wash is earned.
pub const LOYALTY_CYCLE: usize = 6;

/// Days without a visit after which a customer is due a win-back message.
pub const RE_ENGAGEMENT_DAYS: i64 = 30;

const SECONDS_PER_DAY: i64 = 86_400;

/// Loyalty state of one customer.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerProfile {
    /// Customer contact identifier
    pub contact: String,

    /// The customer's records, newest first
    pub records: Vec<TransactionRecord>,

    /// Paid full washes, voucher washes included
    pub paid_full_wash_count: usize,

    /// Whole days since the newest record, `None` without records
    pub days_since_last_visit: Option<i64>,
}

impl CustomerProfile {
    /// Full washes still needed to complete the current loyalty cycle.
    ///
    /// Always between 1 and [`LOYALTY_CYCLE`].
    pub fn remaining_for_free_wash(&self) -> usize {
        LOYALTY_CYCLE - (self.paid_full_wash_count % LOYALTY_CYCLE)
    }

    /// Whether the customer has just completed a loyalty cycle.
    pub fn has_earned_free_wash(&self) -> bool {
        self.paid_full_wash_count > 0 && self.paid_full_wash_count % LOYALTY_CYCLE == 0
    }

    /// Whether the customer has been away longer than the re-engagement window.
    pub fn is_lapsed(&self) -> bool {
        self.days_since_last_visit
            .is_some_and(|days| days > RE_ENGAGEMENT_DAYS)
    }

    /// Time of the newest record.
    pub fn last_visit(&self) -> Option<Timestamp> {
        self.records.first().map(TransactionRecord::created_at)
    }
}

/// Aggregates a customer's records as of now.
pub fn aggregate(contact: impl Into<String>, records: Vec<TransactionRecord>) -> CustomerProfile {
    aggregate_at(contact, records, Timestamp::now())
}

/// Aggregates a customer's records as of `now`.
///
/// The caller supplies the customer's records; they are not filtered by contact.
pub fn aggregate_at(
    contact: impl Into<String>,
    mut records: Vec<TransactionRecord>,
    now: Timestamp,
) -> CustomerProfile {
    records.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| a.id().cmp(&b.id()))
    });

    let paid_full_wash_count = records
        .iter()
        .filter(|record| {
            record.service_type().as_str() == LOYALTY_SERVICE_TYPE && record.payment().is_paid()
        })
        .count();

    let days_since_last_visit = records
        .first()
        .map(|latest| whole_days_between(now, latest.created_at()));

    let profile = CustomerProfile {
        contact: contact.into(),
        records,
        paid_full_wash_count,
        days_since_last_visit,
    };

    debug!(
        contact = %profile.contact,
        records = profile.records.len(),
        paid_full_wash_count,
        ?days_since_last_visit,
        "customer aggregated"
    );

    profile
}

/// Builds a profile for every contact found in `records`.
///
/// Records without a customer contact are skipped. Profiles are ordered by
/// most recent visit, then by contact.
pub fn group_by_contact(records: &[TransactionRecord], now: Timestamp) -> Vec<CustomerProfile> {
    let mut by_contact: FxHashMap<&str, Vec<TransactionRecord>> = FxHashMap::default();

    for record in records {
        if let Some(contact) = record.customer_contact() {
            by_contact.entry(contact).or_default().push(record.clone());
        }
    }

    let mut profiles: Vec<CustomerProfile> = by_contact
        .into_iter()
        .map(|(contact, records)| aggregate_at(contact, records, now))
        .collect();

    profiles.sort_by(|a, b| {
        b.last_visit()
            .cmp(&a.last_visit())
            .then_with(|| a.contact.cmp(&b.contact))
    });

    profiles
}

/// Whole 24 hour periods from `then` to `now`, truncated toward zero.
fn whole_days_between(now: Timestamp, then: Timestamp) -> i64 {
    now.duration_since(then).as_secs() / SECONDS_PER_DAY
}
