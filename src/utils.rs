//! Utils

use clap::Parser;

use crate::{cars::CarSize, payments::PaymentClassification};

/// Arguments for the quote demo
#[derive(Debug, Parser)]
pub struct QuoteArgs {
    /// Service type id, e.g. `whole-wash`
    #[clap(short, long, default_value = "whole-wash")]
    pub service: String,

    /// Car size tag, e.g. `medium`
    #[clap(short = 'z', long)]
    pub size: Option<CarSize>,

    /// Payment tag: voucher, cash, card-machine or unpaid
    #[clap(short, long, default_value = "cash")]
    pub payment: PaymentClassification,

    /// Add the wax add-on
    #[clap(short, long)]
    pub wax: bool,

    /// Staff member id
    #[clap(long, default_value = "staff-1")]
    pub staff: String,

    /// Customer contact, used to print an outreach link
    #[clap(short, long)]
    pub contact: Option<String>,

    /// Catalog fixture to load from `./fixtures/catalog` instead of the built-in one
    #[clap(short, long)]
    pub fixture: Option<String>,
}
