//! Errors

use thiserror::Error;

use crate::{orders::OrderStoreError, pricing::TotalPriceError};

/// Failures raised by storefront operations.
///
/// Every variant is recoverable: the console reports it and returns to the
/// nearest prompt.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Input could not be parsed (non-numeric, trailing garbage, not Y/N).
    #[error("Invalid input '{input}'. Please enter {expected}.")]
    InvalidInput {
        /// The offending input, trimmed.
        input: String,

        /// What the prompt expected, e.g. "a valid number".
        expected: &'static str,
    },

    /// Product id is not in the catalog.
    #[error("Invalid product ID: {0}")]
    InvalidId(i64),

    /// Total or checkout attempted on an empty cart.
    #[error("Shopping cart is empty")]
    EmptyCart,

    /// Order history requested with nothing recorded.
    #[error("No orders found")]
    NoOrders,

    /// Menu or payment selection out of range.
    #[error("Invalid choice {choice}. Please select 1-{max}.")]
    InvalidChoice {
        /// The number entered.
        choice: i64,

        /// Highest valid option; options start at 1.
        max: u32,
    },

    /// A cart or order total does not fit in minor units.
    #[error("Total amount is too large")]
    TotalOverflow,

    /// A product is priced in a different currency from the cart
    /// (product currency, cart currency).
    #[error("Currency mismatch: {0} product in a {1} cart")]
    CurrencyMismatch(&'static str, &'static str),

    /// Order persistence failed.
    #[error(transparent)]
    OrderStore(OrderStoreError),
}

impl StoreError {
    /// Builds an [`StoreError::InvalidInput`] for a prompt expecting a number.
    pub fn not_a_number(input: &str) -> Self {
        StoreError::InvalidInput {
            input: input.trim().to_string(),
            expected: "a valid number",
        }
    }
}

impl From<TotalPriceError> for StoreError {
    fn from(error: TotalPriceError) -> Self {
        match error {
            TotalPriceError::NoItems => StoreError::EmptyCart,
            TotalPriceError::Overflow => StoreError::TotalOverflow,
            TotalPriceError::CurrencyMismatch(line, total) => {
                StoreError::CurrencyMismatch(line, total)
            }
        }
    }
}

impl From<OrderStoreError> for StoreError {
    fn from(error: OrderStoreError) -> Self {
        match error {
            OrderStoreError::NoOrders => StoreError::NoOrders,
            other => StoreError::OrderStore(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_items_maps_to_empty_cart() {
        assert!(matches!(
            StoreError::from(TotalPriceError::NoItems),
            StoreError::EmptyCart
        ));
    }

    #[test]
    fn mixed_currency_total_maps_to_currency_mismatch() {
        let error = StoreError::from(TotalPriceError::CurrencyMismatch("GBP", "USD"));

        assert_eq!(error.to_string(), "Currency mismatch: GBP product in a USD cart");
    }

    #[test]
    fn store_no_orders_maps_to_no_orders() {
        assert!(matches!(
            StoreError::from(OrderStoreError::NoOrders),
            StoreError::NoOrders
        ));
    }

    #[test]
    fn store_full_stays_wrapped() {
        let error = StoreError::from(OrderStoreError::Full(3));

        assert!(matches!(error, StoreError::OrderStore(OrderStoreError::Full(3))));
        assert_eq!(error.to_string(), "Order store is full (3 orders)");
    }

    #[test]
    fn invalid_choice_message_names_range() {
        let error = StoreError::InvalidChoice { choice: 7, max: 4 };

        assert_eq!(error.to_string(), "Invalid choice 7. Please select 1-4.");
    }

    #[test]
    fn not_a_number_trims_input() {
        let error = StoreError::not_a_number(" 12abc\n");

        assert_eq!(
            error.to_string(),
            "Invalid input '12abc'. Please enter a valid number."
        );
    }
}
