//! Quote Example
//!
//! This example prices a single job, records it and prints the day's report.
//!
//! Use `-s` to pick the service type and `-z` the car size
//! Use `-p` to pick the payment and `-w` to add wax
//! Use `-c` to print the outreach link for a customer
//! Set `RUST_LOG=washbay=debug` to see the engine's logs

use std::io;

use anyhow::Result;

use clap::Parser;
use jiff::tz::TimeZone;
use tracing_subscriber::EnvFilter;
use washbay::{
    fixtures::Fixture,
    loyalty::aggregate,
    messaging::{DeepLink, compose},
    reports::DailyReport,
    transactions::{Staff, TransactionBuilder, TransactionRequest},
    utils::QuoteArgs,
};

/// Quote Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = QuoteArgs::parse();

    let catalog = match args.fixture.as_deref() {
        Some(name) => Fixture::new().catalog(name)?,
        None => Fixture::default_catalog()?,
    };

    let request = TransactionRequest {
        car_size: args.size,
        wax_add_on: args.wax,
        customer_contact: args.contact.clone(),
        ..TransactionRequest::new(&args.service, Staff::new(&args.staff, "", &args.staff))
            .with_payment(args.payment)
    };

    let record = TransactionBuilder::new(&catalog).build(request)?;

    println!(
        "{} ({}): price {}, commission {}",
        record.service_type(),
        record.payment(),
        record.price(),
        record.commission()
    );

    if let Some(contact) = record.customer_contact() {
        let profile = aggregate(contact, vec![record.clone()]);
        let outreach = compose(&profile, &Fixture::default_messages()?, &DeepLink::default())?;

        println!("Outreach: {}", outreach.link);
    }

    let tz = TimeZone::system();
    let today = record.created_at().to_zoned(tz.clone()).date();

    println!();

    DailyReport::for_date(&[record], today, &tz, catalog.currency()).write_to(io::stdout())?;

    Ok(())
}
