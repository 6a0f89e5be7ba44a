//! Washbay
//!
//! Washbay is the pricing, commission and customer loyalty engine of a car wash
//! point of sale: it resolves what a job costs and what the washer earns,
//! records the job, and picks the outreach message each customer should get.

pub mod cars;
pub mod catalog;
pub mod errors;
pub mod fixtures;
pub mod loyalty;
pub mod messaging;
pub mod payments;
pub mod prelude;
pub mod pricing;
pub mod reports;
pub mod services;
pub mod transactions;
pub mod utils;
