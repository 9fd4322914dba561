//! Console
//!
//! Numbered menu loop driving a [`Storefront`]. Input and output are
//! generic so sessions can be scripted.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::{debug, error};

use crate::{
    errors::StoreError,
    payments::PaymentMethod,
    receipt::{
        ReceiptError, write_cart, write_catalog, write_confirmation, write_order_history,
    },
    storefront::Storefront,
};

/// Errors that end a console session.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Reading input or writing output failed.
    #[error("console IO error: {0}")]
    Io(#[from] io::Error),

    /// A table could not be rendered.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),
}

impl ConsoleError {
    /// Whether the session cannot continue after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ConsoleError::Io(_) | ConsoleError::Receipt(ReceiptError::Io(_))
        )
    }
}

/// Top level menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Browse the catalog and add products.
    ViewProducts,

    /// Show the cart and optionally check out.
    ViewCart,

    /// Show order history.
    ViewOrders,

    /// Leave the store.
    Exit,
}

impl MenuChoice {
    const ALL: [MenuChoice; 4] = [
        MenuChoice::ViewProducts,
        MenuChoice::ViewCart,
        MenuChoice::ViewOrders,
        MenuChoice::Exit,
    ];

    /// Map a 1-based menu number to an entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidChoice`] if `choice` is not between 1 and 4.
    pub fn from_choice(choice: i64) -> Result<Self, StoreError> {
        let invalid = || StoreError::InvalidChoice { choice, max: 4 };

        let idx = usize::try_from(choice)
            .ok()
            .and_then(|choice| choice.checked_sub(1))
            .ok_or_else(invalid)?;

        Self::ALL.get(idx).copied().ok_or_else(invalid)
    }
}

/// Parse a whole line as a number.
///
/// Leading whitespace is skipped. Anything after the digits other than the
/// line ending is rejected, including spaces.
///
/// # Errors
///
/// Returns [`StoreError::InvalidInput`] if the line is not an integer.
pub fn parse_number(input: &str) -> Result<i64, StoreError> {
    input
        .trim_end_matches(['\r', '\n'])
        .trim_start()
        .parse()
        .map_err(|_err| StoreError::not_a_number(input))
}

/// Parse a Y/N answer from the first character of the line.
///
/// # Errors
///
/// Returns [`StoreError::InvalidInput`] if the answer does not start with Y or N.
pub fn parse_yes_no(input: &str) -> Result<bool, StoreError> {
    match input.trim().chars().next().map(|c| c.to_ascii_uppercase()) {
        Some('Y') => Ok(true),
        Some('N') => Ok(false),
        _ => Err(StoreError::InvalidInput {
            input: input.trim().to_string(),
            expected: "Y or N",
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Interactive console over an input reader and output/error writers.
#[derive(Debug)]
pub struct Console<R, W, E> {
    input: R,
    out: W,
    err: E,
}

impl<R: BufRead, W: Write, E: Write> Console<R, W, E> {
    /// Create a console.
    pub fn new(input: R, out: W, err: E) -> Self {
        Self { input, out, err }
    }

    /// Run the menu loop until Exit is chosen or input ends.
    ///
    /// Recoverable errors are written to the error stream and the loop
    /// carries on.
    ///
    /// # Errors
    ///
    /// Returns a [`ConsoleError`] if the terminal can no longer be read or written.
    pub fn run(&mut self, shop: &mut Storefront<'_>) -> Result<(), ConsoleError> {
        loop {
            match self.menu(shop) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(error) if error.is_fatal() => return Err(error),
                Err(error) => {
                    error!(%error, "menu action failed");
                    writeln!(self.err, "Error: {error}")?;
                }
            }
        }

        Ok(())
    }

    /// Give back the input reader and the output and error writers.
    pub fn into_parts(self) -> (R, W, E) {
        (self.input, self.out, self.err)
    }

    fn menu(&mut self, shop: &mut Storefront<'_>) -> Result<Flow, ConsoleError> {
        writeln!(self.out, "\n===== Online Store Menu =====")?;
        writeln!(self.out, "1. View Products")?;
        writeln!(self.out, "2. View Shopping Cart")?;
        writeln!(self.out, "3. View Orders")?;
        writeln!(self.out, "4. Exit")?;

        let Some(line) = self.prompt("Enter your choice (1-4): ")? else {
            return Ok(Flow::Exit);
        };

        let choice = match parse_number(&line).and_then(MenuChoice::from_choice) {
            Ok(choice) => choice,
            Err(error) => {
                self.report(&error)?;
                return Ok(Flow::Continue);
            }
        };

        match choice {
            MenuChoice::ViewProducts => self.view_products(shop),
            MenuChoice::ViewCart => self.view_cart(shop),
            MenuChoice::ViewOrders => self.view_orders(shop),
            MenuChoice::Exit => {
                writeln!(self.out, "Thank you for shopping with us!")?;
                Ok(Flow::Exit)
            }
        }
    }

    fn view_products(&mut self, shop: &mut Storefront<'_>) -> Result<Flow, ConsoleError> {
        loop {
            write_catalog(&mut self.out, shop.catalog())?;

            let Some(line) =
                self.prompt("Enter the ID of the product you want to add to the shopping cart: ")?
            else {
                return Ok(Flow::Exit);
            };

            match parse_number(&line).and_then(|id| shop.add_to_cart(id, 1)) {
                Ok(product) => {
                    debug!(product_id = %product.id, "product added from console");
                    writeln!(self.out, "Product added successfully!")?;
                }
                Err(error) => {
                    self.report(&error)?;
                    continue;
                }
            }

            let Some(answer) = self.prompt("Do you want to add another product? (Y/N): ")? else {
                return Ok(Flow::Exit);
            };

            match parse_yes_no(&answer) {
                Ok(true) => {}
                Ok(false) => return Ok(Flow::Continue),
                Err(error) => {
                    self.report(&error)?;
                    return Ok(Flow::Continue);
                }
            }
        }
    }

    fn view_cart(&mut self, shop: &mut Storefront<'_>) -> Result<Flow, ConsoleError> {
        write_cart(&mut self.out, shop.cart())?;

        if shop.cart().is_empty() {
            return Ok(Flow::Continue);
        }

        let Some(answer) = self.prompt("Do you want to check out all the products? (Y/N): ")? else {
            return Ok(Flow::Exit);
        };

        match parse_yes_no(&answer) {
            Ok(true) => {}
            Ok(false) => return Ok(Flow::Continue),
            Err(error) => {
                self.report(&error)?;
                return Ok(Flow::Continue);
            }
        }

        writeln!(self.out, "\nSelect payment method:")?;

        for (idx, method) in PaymentMethod::ALL.iter().enumerate() {
            writeln!(self.out, "{}. {method}", idx + 1)?;
        }

        let Some(line) = self.prompt("Enter your choice (1-3): ")? else {
            return Ok(Flow::Exit);
        };

        let result = parse_number(&line)
            .and_then(PaymentMethod::from_choice)
            .and_then(|payment| shop.checkout(payment));

        match result {
            Ok(order) => write_confirmation(&mut self.out, &order)?,
            Err(error) => self.report(&error)?,
        }

        Ok(Flow::Continue)
    }

    fn view_orders(&mut self, shop: &Storefront<'_>) -> Result<Flow, ConsoleError> {
        match shop.orders() {
            Ok(orders) => write_order_history(&mut self.out, &orders)?,
            Err(error) => self.report(&error)?,
        }

        Ok(Flow::Continue)
    }

    fn prompt(&mut self, text: &str) -> Result<Option<String>, ConsoleError> {
        write!(self.out, "{text}")?;
        self.out.flush()?;

        let mut line = String::new();

        if self.input.read_line(&mut line)? == 0 {
            debug!("input closed");
            return Ok(None);
        }

        Ok(Some(line))
    }

    fn report(&mut self, error: &StoreError) -> Result<(), ConsoleError> {
        debug!(%error, "rejected input");
        writeln!(self.err, "Error: {error}")?;

        Ok(())
    }
}
