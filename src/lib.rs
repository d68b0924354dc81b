//! Checkout
//!
//! Checkout prices a retail basket against a product catalog and prints a receipt. Each line
//! gets at most one discount: a 10% wholesale discount for five or more units of a wholesale
//! product, otherwise the customer's discount card rate. Unknown card numbers get a default
//! 2% card.

pub mod basket;
pub mod cards;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod discounts;
pub mod loaders;
pub mod observability;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
