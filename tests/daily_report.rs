//! A day at the wash: a catalog loaded from disk, a handful of jobs, and the
//! closing report.

use std::fs;

use jiff::{SignedDuration, Timestamp, civil::date, tz::TimeZone};
use rusty_money::{Money, iso::SAR};
use testresult::TestResult;

use washbay::{
    cars::CarSize,
    fixtures::Fixture,
    payments::PaymentClassification,
    reports::DailyReport,
    transactions::{Staff, TransactionBuilder, TransactionRequest},
};

const CATALOG: &str = "currency: SAR
services:
  whole-wash:
    name_en: Whole Wash
    requires_car_size: true
    accepts_voucher: true
    prices:
      small: { price: \"20 SAR\", commission: \"8 SAR\", voucher_commission: \"4 SAR\" }
      medium: { price: \"25 SAR\", commission: \"10 SAR\", voucher_commission: \"5 SAR\" }
  ac-wash:
    name_en: AC Wash
    prices:
      default: { price: \"15 SAR\", commission: \"4 SAR\" }
";

#[test]
fn report_totals_a_day_of_jobs() -> TestResult {
    let dir = tempfile::tempdir()?;
    fs::create_dir_all(dir.path().join("catalog"))?;
    fs::write(dir.path().join("catalog").join("shop.yml"), CATALOG)?;

    let catalog = Fixture::with_base_path(dir.path()).catalog("shop")?;
    let builder = TransactionBuilder::new(&catalog);

    let opening: Timestamp = "2026-10-19T06:00:00Z".parse()?;
    let ahmed = Staff::new("staff-1", "أحمد", "Ahmed");
    let omar = Staff::new("staff-2", "عمر", "Omar");

    let jobs = [
        TransactionRequest::new("whole-wash", ahmed.clone())
            .with_car_size(CarSize::Medium)
            .with_payment(PaymentClassification::Cash),
        TransactionRequest::new("whole-wash", omar.clone())
            .with_car_size(CarSize::Small)
            .with_payment(PaymentClassification::Voucher),
        TransactionRequest::new("ac-wash", ahmed).with_payment(PaymentClassification::CardMachine),
        TransactionRequest::new("ac-wash", omar).with_payment(PaymentClassification::Unpaid),
    ];

    let mut records = Vec::new();
    for (hour, job) in (0_i64..).zip(jobs) {
        let at = opening.checked_add(SignedDuration::from_hours(hour))?;

        records.push(builder.build_at(job, at)?);
    }

    let report = DailyReport::for_date(&records, date(2026, 10, 19), &TimeZone::UTC, SAR);

    assert_eq!(report.records().len(), 4);
    assert_eq!(report.total_sales()?, Money::from_minor(2500 + 1500, SAR));
    assert_eq!(report.total_commission()?, Money::from_minor(1000 + 400 + 400 + 400, SAR));

    let by_staff: Vec<(String, usize, i64)> = report
        .commission_by_staff()?
        .into_iter()
        .map(|staff| (staff.name_en, staff.jobs, staff.commission.to_minor_units()))
        .collect();

    assert_eq!(
        by_staff,
        [
            ("Ahmed".to_string(), 2, 1400),
            ("Omar".to_string(), 2, 800),
        ]
    );

    let mut out = Vec::new();
    report.write_to(&mut out)?;

    let output = String::from_utf8(out)?;
    assert!(output.contains("ac-wash"));
    assert!(output.contains("Omar (2 jobs)"));

    Ok(())
}
