//! Payments

use std::fmt;

use rusty_money::{Money, iso::Currency};
use tracing::debug;

use crate::errors::StoreError;

/// Payment method chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    /// Cash on hand.
    Cash,

    /// Credit or debit card.
    Card,

    /// GCash mobile wallet.
    GCash,
}

impl PaymentMethod {
    /// Every method, in menu order.
    pub const ALL: [PaymentMethod; 3] = [PaymentMethod::Cash, PaymentMethod::Card, PaymentMethod::GCash];

    /// Label shown to the customer and recorded on the order.
    pub const fn label(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Credit/Debit Card",
            PaymentMethod::GCash => "GCash",
        }
    }

    /// Map a 1-based menu choice to a payment method.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidChoice`] if `choice` is not between 1 and 3.
    pub fn from_choice(choice: i64) -> Result<Self, StoreError> {
        let invalid = || StoreError::InvalidChoice { choice, max: 3 };

        let idx = usize::try_from(choice)
            .ok()
            .and_then(|choice| choice.checked_sub(1))
            .ok_or_else(invalid)?;

        Self::ALL.get(idx).copied().ok_or_else(invalid)
    }

    /// Look up a method by its label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.label() == label)
    }

    /// Confirm payment of `amount`.
    ///
    /// No transaction takes place; the method only selects the label
    /// recorded on the order, so confirmation always succeeds.
    pub fn confirm(self, amount: &Money<'_, Currency>) {
        debug!(method = self.label(), %amount, "payment confirmed");
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
