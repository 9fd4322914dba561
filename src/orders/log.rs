//! Order log
//!
//! Append-only text log with one stanza per order:
//!
//! ```text
//! [LOG] -> Order ID: ORD1 has been successfully checked out and paid using Cash.
//! 1	Laptop	999.99	1
//! Total Amount: $999.99
//!
//! ```
//!
//! Item records are tab separated, so product names must not contain tabs
//! or newlines. Nothing is escaped.

use std::{
    borrow::Cow,
    fs::{File, OpenOptions},
    io::{self, BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use rusty_money::{Money, iso::Currency};
use tracing::{debug, info, warn};

use crate::{
    orders::{Order, OrderId, OrderLine, OrderStore, OrderStoreError},
    payments::PaymentMethod,
    pricing::{format_amount, parse_amount, total_price},
    products::ProductId,
};

const STANZA_MARKER: &str = "[LOG] -> Order ID: ";
const ID_END: &str = " has been";
const PAYMENT_START: &str = "using ";
const TOTAL_PREFIX: &str = "Total Amount: $";

/// Order store backed by an append-only text file.
#[derive(Debug)]
pub struct OrderLog {
    path: PathBuf,
    currency: &'static Currency,
    next_id: Option<OrderId>,
}

impl OrderLog {
    /// Open the log at `path`, creating nothing until the first append.
    ///
    /// Existing stanzas are scanned so new ids continue after the highest one on file.
    ///
    /// # Errors
    ///
    /// Returns [`OrderStoreError::Io`] if an existing log cannot be read.
    pub fn open(path: impl Into<PathBuf>, currency: &'static Currency) -> Result<Self, OrderStoreError> {
        let path = path.into();

        let next_id = match File::open(&path) {
            Ok(file) => parse_log(BufReader::new(file), currency)?
                .iter()
                .map(Order::id)
                .max()
                .map_or(Some(OrderId::FIRST), OrderId::next),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Some(OrderId::FIRST),
            Err(error) => return Err(error.into()),
        };

        info!(path = %path.display(), ?next_id, "opened order log");

        Ok(Self {
            path,
            currency,
            next_id,
        })
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<'a> OrderStore<'a> for OrderLog {
    fn next_order_id(&self) -> Result<OrderId, OrderStoreError> {
        self.next_id.ok_or(OrderStoreError::IdsExhausted)
    }

    fn append(&mut self, order: &Order<'a>) -> Result<(), OrderStoreError> {
        let mut stanza = Vec::new();
        write_stanza(&mut stanza, order)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.write_all(&stanza)?;
        file.flush()?;

        self.next_id = match (self.next_id, order.id().next()) {
            (Some(current), Some(next)) => Some(current.max(next)),
            _ => None,
        };

        info!(order_id = %order.id(), path = %self.path.display(), "appended order to log");

        Ok(())
    }

    fn orders(&self) -> Result<Vec<Order<'a>>, OrderStoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Err(OrderStoreError::NoOrders);
            }
            Err(error) => return Err(error.into()),
        };

        let orders = parse_log(BufReader::new(file), self.currency)?;

        if orders.is_empty() {
            return Err(OrderStoreError::NoOrders);
        }

        Ok(orders)
    }
}

/// Write one order stanza, including the trailing blank line.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_stanza(mut out: impl Write, order: &Order<'_>) -> io::Result<()> {
    writeln!(
        out,
        "{STANZA_MARKER}{}{ID_END} successfully checked out and paid using {}.",
        order.id(),
        order.payment().label()
    )?;

    for line in order.lines() {
        writeln!(out, "{}", line.log_line())?;
    }

    writeln!(out, "{TOTAL_PREFIX}{}", format_amount(&order.total()))?;
    writeln!(out)
}

/// Rebuild orders from log text.
///
/// Lines outside a stanza are ignored. Inside a stanza, item records that
/// do not have exactly four tab-separated fields are skipped, as are
/// stanzas whose id or payment label cannot be read. A stanza without a
/// total line is totalled from its items. Bytes that are not UTF-8 are
/// replaced, so such a line is skipped like any other malformed line.
///
/// # Errors
///
/// Returns an error if reading from `reader` fails.
pub fn parse_log<'a>(reader: impl BufRead, currency: &'a Currency) -> io::Result<Vec<Order<'a>>> {
    let mut parser = LogParser::new(currency);

    for (idx, raw) in reader.split(b'\n').enumerate() {
        let raw = raw?;
        let line = String::from_utf8_lossy(raw.strip_suffix(b"\r").unwrap_or(&raw));
        let line_no = idx + 1;

        if matches!(line, Cow::Owned(_)) {
            warn!(line_no, "order log line is not valid UTF-8");
        }

        parser.feed(line_no, &line);
    }

    Ok(parser.finish())
}

#[derive(Debug)]
struct PartialOrder<'a> {
    id: OrderId,
    payment: PaymentMethod,
    lines: Vec<OrderLine<'a>>,
    total: Option<Money<'a, Currency>>,
}

#[derive(Debug)]
enum ParseState<'a> {
    Between,
    Skipping,
    InStanza(PartialOrder<'a>),
}

#[derive(Debug)]
struct LogParser<'a> {
    currency: &'a Currency,
    state: ParseState<'a>,
    orders: Vec<Order<'a>>,
}

impl<'a> LogParser<'a> {
    fn new(currency: &'a Currency) -> Self {
        Self {
            currency,
            state: ParseState::Between,
            orders: Vec::new(),
        }
    }

    fn feed(&mut self, line_no: usize, line: &str) {
        if line.contains(STANZA_MARKER) {
            self.finish_stanza();

            self.state = match parse_header(line) {
                Some((id, payment)) => ParseState::InStanza(PartialOrder {
                    id,
                    payment,
                    lines: Vec::new(),
                    total: None,
                }),
                None => {
                    warn!(line_no, "skipping order with unreadable header");
                    ParseState::Skipping
                }
            };

            return;
        }

        match &mut self.state {
            ParseState::Between => {}
            ParseState::Skipping => {
                if line.is_empty() {
                    self.state = ParseState::Between;
                }
            }
            ParseState::InStanza(partial) => {
                if line.is_empty() {
                    self.finish_stanza();
                } else if let Some(total) = line.strip_prefix(TOTAL_PREFIX) {
                    partial.total = parse_amount(total, self.currency);

                    if partial.total.is_none() {
                        warn!(line_no, "unreadable order total");
                    }
                } else if let Some(order_line) = parse_item(line, self.currency) {
                    partial.lines.push(order_line);
                } else {
                    warn!(line_no, "skipping malformed order item");
                }
            }
        }
    }

    fn finish_stanza(&mut self) {
        let ParseState::InStanza(partial) = std::mem::replace(&mut self.state, ParseState::Between)
        else {
            return;
        };

        let total = match partial.total {
            Some(total) => total,
            None => {
                let summed = total_price(
                    partial
                        .lines
                        .iter()
                        .map(|line| (&line.price, line.quantity)),
                );

                match summed {
                    Ok(total) => total,
                    Err(error) => {
                        debug!(order_id = %partial.id, %error, "order has no usable total");
                        Money::from_minor(0, self.currency)
                    }
                }
            }
        };

        self.orders
            .push(Order::new(partial.id, partial.payment, partial.lines, total));
    }

    fn finish(mut self) -> Vec<Order<'a>> {
        self.finish_stanza();
        self.orders
    }
}

fn parse_header(line: &str) -> Option<(OrderId, PaymentMethod)> {
    let (_, rest) = line.split_once(STANZA_MARKER)?;
    let (id, rest) = rest.split_once(ID_END)?;
    let (_, label) = rest.split_once(PAYMENT_START)?;

    let label = label.trim_end();
    let label = label.strip_suffix('.').unwrap_or(label);

    Some((id.parse().ok()?, PaymentMethod::from_label(label)?))
}

fn parse_item<'a>(line: &str, currency: &'a Currency) -> Option<OrderLine<'a>> {
    let fields: Vec<&str> = line.split('\t').collect();

    let [id, name, price, quantity] = fields.as_slice() else {
        return None;
    };

    Some(OrderLine {
        product_id: ProductId::new(id.trim().parse().ok()?),
        name: (*name).to_string(),
        price: parse_amount(price, currency)?,
        quantity: quantity.trim().parse().ok()?,
    })
}
