//! Storefront
//!
//! A console storefront: browse a catalog, fill a cart, pay and keep a log of
//! completed orders.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod console;
pub mod errors;
pub mod items;
pub mod observability;
pub mod orders;
pub mod payments;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod storefront;
