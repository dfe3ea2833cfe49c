//! Order history command.

use std::fmt::Write as _;
use std::path::Path;

use ampkicks_core::Order;
use ampkicks_storefront::store::StoreError;

/// Print every order kept in a storefront file store, oldest first.
///
/// # Errors
///
/// Returns an error if the store file cannot be read or its order history
/// is unreadable.
pub fn list(store: &Path) -> Result<(), StoreError> {
    let orders = super::open_session(store)?.orders()?;

    #[allow(clippy::print_stdout)]
    {
        print!("{}", render(&orders));
    }
    Ok(())
}

fn render(orders: &[Order]) -> String {
    let mut out = String::new();
    for order in orders {
        let units: u64 = order.items.iter().map(|l| u64::from(l.quantity.get())).sum();
        let _ = writeln!(
            out,
            "{}  {}  {:<24} {:>3} item(s)  {:>10}  {}",
            order.order_number,
            order.date.format("%Y-%m-%d %H:%M"),
            order.customer.full_name,
            units,
            order.total.to_string(),
            order.customer.payment_method,
        );
    }
    let _ = writeln!(out, "{} order(s)", orders.len());
    out
}
