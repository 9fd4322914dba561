//! Receipt
//!
//! Console tables for the catalog, the cart and order history.

use std::io;

use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    catalog::Catalog,
    orders::Order,
    pricing::{TotalPriceError, total_price},
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error calculating a line or cart total.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Write the product list.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_catalog(mut out: impl io::Write, catalog: &Catalog<'_>) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["ID", "Name", "Price"]);

    for product in catalog.iter() {
        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            format_money(&product.price),
        ]);
    }

    writeln!(out, "\nAvailable Products:")?;
    write_table(&mut out, builder, 2)
}

/// Write the cart contents with line totals and the cart total.
///
/// # Errors
///
/// Returns an error if a total overflows or writing to `out` fails.
pub fn write_cart(mut out: impl io::Write, cart: &Cart<'_>) -> Result<(), ReceiptError> {
    if cart.is_empty() {
        writeln!(out, "Your shopping cart is empty.")?;

        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Name", "Price", "Qty", "Total"]);

    for item in cart.iter() {
        builder.push_record([
            item.product().id.to_string(),
            item.product().name.clone(),
            format_money(item.price()),
            item.quantity().to_string(),
            format_money(&item.line_total()?),
        ]);
    }

    let total = total_price(cart.iter().map(|item| (item.price(), item.quantity())))?;

    writeln!(out, "\nShopping Cart:")?;
    write_table(&mut out, builder, 2)?;
    writeln!(out, "Total: {}", format_money(&total))?;

    Ok(())
}

/// Write a single order: id, payment method, lines and frozen total.
///
/// # Errors
///
/// Returns an error if a line total overflows or writing to `out` fails.
pub fn write_order(mut out: impl io::Write, order: &Order<'_>) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["ID", "Name", "Price", "Qty", "Total"]);

    for line in order.lines() {
        builder.push_record([
            line.product_id.to_string(),
            line.name.clone(),
            format_money(&line.price),
            line.quantity.to_string(),
            format_money(&line.line_total()?),
        ]);
    }

    writeln!(out, "\nOrder ID: {}", order.id())?;
    writeln!(out, "Payment Method: {}", order.payment())?;
    write_table(&mut out, builder, 2)?;
    writeln!(out, "Total Amount: {}", format_money(&order.total()))?;

    Ok(())
}

/// Write every order under an "Order History" heading.
///
/// # Errors
///
/// Returns an error if a line total overflows or writing to `out` fails.
pub fn write_order_history(
    mut out: impl io::Write,
    orders: &[Order<'_>],
) -> Result<(), ReceiptError> {
    writeln!(out, "\n===== Order History =====")?;

    for order in orders {
        write_order(&mut out, order)?;
    }

    Ok(())
}

/// Write the checkout confirmation.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_confirmation(mut out: impl io::Write, order: &Order<'_>) -> Result<(), ReceiptError> {
    writeln!(out, "\nYou have successfully checked out the products!")?;
    writeln!(out, "Order ID: {}", order.id())?;
    writeln!(out, "Payment Method: {}", order.payment())?;
    writeln!(out, "Total Amount: {}", format_money(&order.total()))?;

    Ok(())
}

fn format_money(money: &Money<'_, Currency>) -> String {
    format!("{money}")
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    first_amount_column: usize,
) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(first_amount_column..), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}
