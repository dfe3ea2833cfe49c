//! Cart inspection command.

use std::fmt::Write as _;
use std::path::Path;

use ampkicks_core::Cart;
use ampkicks_storefront::store::StoreError;

/// Print the cart kept in a storefront file store.
///
/// # Errors
///
/// Returns an error if the store file cannot be read.
pub fn show(store: &Path) -> Result<(), StoreError> {
    let cart = super::open_session(store)?.load_cart()?;

    #[allow(clippy::print_stdout)]
    {
        print!("{}", render(&cart));
    }
    Ok(())
}

fn render(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out = String::new();
    for (index, line) in cart.lines().iter().enumerate() {
        let _ = writeln!(
            out,
            "[{index}] {} (size {}) x{} @ {} = {}",
            line.name,
            line.size,
            line.quantity,
            line.price,
            line.line_total(),
        );
    }

    let totals = cart.totals();
    let _ = writeln!(out, "Items:    {}", cart.item_count());
    let _ = writeln!(out, "Subtotal: {}", totals.subtotal);
    let _ = writeln!(out, "Shipping: {}", totals.shipping);
    let _ = writeln!(out, "Total:    {}", totals.total);
    out
}
