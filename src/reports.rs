//! Daily reports

use std::io;

use jiff::{civil::Date, tz::TimeZone};
use rustc_hash::FxHashMap;
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{
    errors::ErrorKind,
    payments::PaymentClassification,
    pricing::Amount,
    transactions::TransactionRecord,
};

/// Errors that can occur while building or printing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// The report could not be written.
    #[error("failed to write report")]
    Io(#[source] io::Error),
}

impl ReportError {
    /// Flat error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReportError::Money(_) => ErrorKind::Money,
            ReportError::Io(_) => ErrorKind::Io,
        }
    }
}

/// Commission earned by one staff member over a report.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffCommission {
    /// Staff identifier
    pub staff_id: String,

    /// English display name
    pub name_en: String,

    /// Number of jobs
    pub jobs: usize,

    /// Total commission
    pub commission: Amount,
}

/// Sales and commissions for a single civil day.
#[derive(Debug, Clone)]
pub struct DailyReport {
    date: Date,
    tz: TimeZone,
    currency: &'static Currency,
    records: Vec<TransactionRecord>,
}

impl DailyReport {
    /// Collects the records created on `date` in `tz`, newest first.
    pub fn for_date(
        records: &[TransactionRecord],
        date: Date,
        tz: &TimeZone,
        currency: &'static Currency,
    ) -> Self {
        let mut records: Vec<TransactionRecord> = records
            .iter()
            .filter(|record| record.created_at().to_zoned(tz.clone()).date() == date)
            .cloned()
            .collect();

        records.sort_by_key(|record| std::cmp::Reverse(record.created_at()));

        Self {
            date,
            tz: tz.clone(),
            currency,
            records,
        }
    }

    /// Day covered by the report.
    pub fn date(&self) -> Date {
        self.date
    }

    /// Time zone the day and the printed times are in.
    pub fn time_zone(&self) -> &TimeZone {
        &self.tz
    }

    /// Records of the day, newest first.
    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    /// Sum of prices charged.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Money`] if a record is in another currency.
    pub fn total_sales(&self) -> Result<Amount, ReportError> {
        self.sum(TransactionRecord::price)
    }

    /// Sum of commissions earned.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Money`] if a record is in another currency.
    pub fn total_commission(&self) -> Result<Amount, ReportError> {
        self.sum(TransactionRecord::commission)
    }

    /// Sales split by payment classification, in [`PaymentClassification::ALL`] order.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Money`] if a record is in another currency.
    pub fn sales_by_payment(
        &self,
    ) -> Result<SmallVec<[(PaymentClassification, Amount); 4]>, ReportError> {
        PaymentClassification::ALL
            .into_iter()
            .map(|classification| {
                let total = self
                    .records
                    .iter()
                    .filter(|record| record.payment() == classification)
                    .try_fold(self.zero(), |acc, record| acc.add(record.price()))?;

                Ok((classification, total))
            })
            .collect()
    }

    /// Commission per staff member, ordered by staff identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Money`] if a record is in another currency.
    pub fn commission_by_staff(&self) -> Result<Vec<StaffCommission>, ReportError> {
        let mut totals: FxHashMap<&str, StaffCommission> = FxHashMap::default();

        for record in &self.records {
            let staff = record.staff();

            let total = totals
                .entry(staff.id.as_str())
                .or_insert_with(|| StaffCommission {
                    staff_id: staff.id.clone(),
                    name_en: staff.name_en.clone(),
                    jobs: 0,
                    commission: self.zero(),
                });

            total.jobs += 1;
            total.commission = total.commission.add(record.commission())?;
        }

        let mut totals: Vec<StaffCommission> = totals.into_values().collect();
        totals.sort_by(|a, b| a.staff_id.cmp(&b.staff_id));

        Ok(totals)
    }

    /// Prints the report as a table followed by totals.
    ///
    /// # Errors
    ///
    /// Returns an error if totals cannot be computed or the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReportError> {
        let mut builder = Builder::default();

        builder.push_record(["Time", "Service", "Size", "Staff", "Payment", "Price", "Commission"]);

        for record in &self.records {
            let service = if record.wax_add_on() {
                format!("{} + wax", record.service_type())
            } else {
                record.service_type().to_string()
            };

            builder.push_record([
                record
                    .created_at()
                    .to_zoned(self.tz.clone())
                    .strftime("%H:%M")
                    .to_string(),
                service,
                record
                    .car_size()
                    .map_or_else(|| "-".to_string(), |size| size.to_string()),
                record.staff().name_en.clone(),
                record.payment().to_string(),
                record.price().to_string(),
                record.commission().to_string(),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.modify(Columns::new(5..7), Alignment::right());

        writeln!(out, "Daily report {}", self.date).map_err(ReportError::Io)?;
        writeln!(out, "{table}").map_err(ReportError::Io)?;

        writeln!(out, " Sales:      {}", self.total_sales()?).map_err(ReportError::Io)?;
        writeln!(out, " Commission: {}", self.total_commission()?).map_err(ReportError::Io)?;

        for staff in self.commission_by_staff()? {
            writeln!(
                out,
                "   {} ({} jobs): {}",
                staff.name_en, staff.jobs, staff.commission
            )
            .map_err(ReportError::Io)?;
        }

        Ok(())
    }

    fn sum(&self, amount: impl Fn(&TransactionRecord) -> Amount) -> Result<Amount, ReportError> {
        let total = self
            .records
            .iter()
            .try_fold(self.zero(), |acc, record| acc.add(amount(record)))?;

        Ok(total)
    }

    fn zero(&self) -> Amount {
        Money::from_minor(0, self.currency)
    }
}
