//! Checkout

use tracing::{info, warn};

use crate::{
    cart::Cart,
    errors::StoreError,
    orders::{Order, OrderStore},
    payments::PaymentMethod,
};

/// Convert the cart into a stored order and empty the cart.
///
/// The cart is only cleared once the order has been stored. If the store
/// rejects the order the cart is left as it was.
///
/// # Errors
///
/// - [`StoreError::EmptyCart`]: The cart has no items.
/// - [`StoreError::TotalOverflow`]: The total does not fit in minor units.
/// - [`StoreError::OrderStore`]: The order could not be stored.
#[tracing::instrument(skip(cart, store), fields(items = cart.len()))]
pub fn checkout<'a, S>(
    cart: &mut Cart<'a>,
    payment: PaymentMethod,
    store: &mut S,
) -> Result<Order<'a>, StoreError>
where
    S: OrderStore<'a> + ?Sized,
{
    let total = cart.total()?;

    payment.confirm(&total);

    let order = Order::from_cart(store.next_order_id()?, payment, cart)?;

    if let Err(error) = store.append(&order) {
        warn!(order_id = %order.id(), %error, "order not stored; cart kept");

        return Err(error.into());
    }

    cart.clear();

    info!(order_id = %order.id(), total = %order.total(), "checked out");

    Ok(order)
}
