//! End-to-end scenarios against the built-in catalog.
//!
//! Each test builds records the way the point of sale does, through a
//! [`TransactionBuilder`], and checks what ends up stored and selected.

use jiff::{SignedDuration, Timestamp};
use rusty_money::{Money, iso::SAR};
use testresult::TestResult;

use washbay::{
    cars::CarSize,
    catalog::ServiceCatalog,
    errors::ErrorKind,
    fixtures::Fixture,
    loyalty::{LOYALTY_SERVICE_TYPE, aggregate_at, group_by_contact},
    messaging::{DeepLink, MessageTemplate, MessageTemplates, compose, select},
    payments::PaymentClassification,
    services::{PriceEntry, ServiceTypeConfig, WAX_ADD_ON_COMMISSION_MINOR},
    transactions::{Staff, TransactionBuilder, TransactionRecord, TransactionRequest},
};

const CONTACT: &str = "966500000000";

fn now() -> Result<Timestamp, jiff::Error> {
    "2026-10-19T09:30:00Z".parse()
}

fn staff() -> Staff {
    Staff::new("staff-1", "أحمد", "Ahmed")
}

/// Built-in catalog plus the flat-priced service loyalty counts.
fn catalog() -> TestResult<ServiceCatalog> {
    let mut catalog = Fixture::default_catalog()?;

    catalog.add(ServiceTypeConfig::flat(
        LOYALTY_SERVICE_TYPE,
        PriceEntry::from_minor(2500, 1000, SAR),
    ))?;

    Ok(catalog)
}

fn full_washes(
    builder: &TransactionBuilder<'_>,
    count: usize,
    last_visit_days_ago: i64,
) -> TestResult<Vec<TransactionRecord>> {
    let mut records = Vec::new();

    for n in 0..count {
        let days_ago = last_visit_days_ago + i64::try_from(n)?;
        let at = now()?.checked_sub(SignedDuration::from_hours(days_ago * 24))?;

        records.push(builder.build_at(
            TransactionRequest::new(LOYALTY_SERVICE_TYPE, staff())
                .with_payment(PaymentClassification::Cash)
                .with_customer_contact(CONTACT),
            at,
        )?);
    }

    Ok(records)
}

#[test]
fn whole_wash_medium_cash() -> TestResult {
    let catalog = catalog()?;

    let record = TransactionBuilder::new(&catalog).build_at(
        TransactionRequest::new("whole-wash", staff())
            .with_car_size(CarSize::Medium)
            .with_payment(PaymentClassification::Cash),
        now()?,
    )?;

    assert_eq!(record.price(), Money::from_minor(2500, SAR));
    assert_eq!(record.commission(), Money::from_minor(1000, SAR));
    assert_eq!(record.car_size(), Some(CarSize::Medium));
    assert!(!record.wax_add_on());

    Ok(())
}

#[test]
fn whole_wash_small_voucher() -> TestResult {
    let catalog = catalog()?;

    let record = TransactionBuilder::new(&catalog).build_at(
        TransactionRequest::new("whole-wash", staff())
            .with_car_size(CarSize::Small)
            .with_payment(PaymentClassification::Voucher),
        now()?,
    )?;

    assert_eq!(record.price(), Money::from_minor(0, SAR));
    assert_eq!(record.commission(), Money::from_minor(400, SAR));

    Ok(())
}

#[test]
fn outside_only_big_unpaid_with_wax() -> TestResult {
    let catalog = catalog()?;

    let record = TransactionBuilder::new(&catalog).build_at(
        TransactionRequest::new("outside-only", staff())
            .with_car_size(CarSize::Big)
            .with_payment(PaymentClassification::Unpaid)
            .with_wax(),
        now()?,
    )?;

    assert_eq!(record.price(), Money::from_minor(0, SAR));
    assert_eq!(
        record.commission(),
        Money::from_minor(1000 + WAX_ADD_ON_COMMISSION_MINOR, SAR)
    );
    assert!(record.wax_add_on());

    Ok(())
}

#[test]
fn flat_service_ignores_car_size_and_wax() -> TestResult {
    let catalog = catalog()?;

    let record = TransactionBuilder::new(&catalog).build_at(
        TransactionRequest::new("mirrors-only", staff())
            .with_car_size(CarSize::Microbus)
            .with_payment(PaymentClassification::CardMachine)
            .with_wax(),
        now()?,
    )?;

    assert_eq!(record.price(), Money::from_minor(500, SAR));
    assert_eq!(record.commission(), Money::from_minor(200, SAR));
    assert_eq!(record.car_size(), None);
    assert!(!record.wax_add_on());

    Ok(())
}

#[test]
fn voucher_on_flat_service_is_rejected() -> TestResult {
    let catalog = catalog()?;

    let result = TransactionBuilder::new(&catalog).build_at(
        TransactionRequest::new("inside-only", staff())
            .with_payment(PaymentClassification::Voucher),
        now()?,
    );

    assert!(result.is_err_and(|err| err.kind() == ErrorKind::VoucherNotSupported));

    Ok(())
}

#[test]
fn six_paid_full_washes_earn_a_free_wash() -> TestResult {
    let catalog = catalog()?;
    let builder = TransactionBuilder::new(&catalog);

    let records = full_washes(&builder, 6, 5)?;
    let profile = aggregate_at(CONTACT, records, now()?);

    assert_eq!(profile.paid_full_wash_count, 6);
    assert_eq!(profile.days_since_last_visit, Some(5));
    assert_eq!(select(&profile), MessageTemplate::FreeWashEarned);

    Ok(())
}

#[test]
fn lapsed_customer_is_re_engaged() -> TestResult {
    let catalog = catalog()?;

    let record = TransactionBuilder::new(&catalog).build_at(
        TransactionRequest::new("inside-only", staff())
            .with_payment(PaymentClassification::Cash)
            .with_customer_contact(CONTACT),
        now()?.checked_sub(SignedDuration::from_hours(45 * 24))?,
    )?;

    let profile = aggregate_at(CONTACT, vec![record], now()?);

    assert_eq!(profile.paid_full_wash_count, 0);
    assert_eq!(select(&profile), MessageTemplate::ReEngagement);

    Ok(())
}

#[test]
fn re_engagement_wins_over_a_completed_cycle() -> TestResult {
    let catalog = catalog()?;
    let builder = TransactionBuilder::new(&catalog);

    let profile = aggregate_at(CONTACT, full_washes(&builder, 6, 45)?, now()?);

    assert!(profile.has_earned_free_wash());
    assert_eq!(select(&profile), MessageTemplate::ReEngagement);

    Ok(())
}

#[test]
fn outreach_link_for_grouped_customers() -> TestResult {
    let catalog = catalog()?;
    let builder = TransactionBuilder::new(&catalog);

    let mut records = full_washes(&builder, 2, 1)?;
    records.push(builder.build_at(
        TransactionRequest::new("spray-only", staff()).with_payment(PaymentClassification::Cash),
        now()?,
    )?);

    let profiles = group_by_contact(&records, now()?);

    assert_eq!(profiles.len(), 1);

    let profile = profiles.first().ok_or("no profile")?;
    let outreach = compose(profile, &MessageTemplates::default(), &DeepLink::default())?;

    assert_eq!(outreach.template, MessageTemplate::Standard { remaining: 4 });
    assert!(outreach.message.contains('4'));
    assert!(
        outreach
            .link
            .as_str()
            .starts_with("https://wa.me/966500000000?text=")
    );

    Ok(())
}

#[test]
fn adding_a_service_type_twice_is_a_duplicate() -> TestResult {
    let mut catalog = catalog()?;

    let result = catalog.add(ServiceTypeConfig::flat(
        "whole-wash",
        PriceEntry::from_minor(100, 10, SAR),
    ));

    assert!(result.is_err_and(|err| err.kind() == ErrorKind::DuplicateKey));

    Ok(())
}
