//! Typed access to the shopper's cart and order history.

use ampkicks_core::{Cart, Order};

use super::{KeyValueStore, StoreError};

/// Key holding the serialized cart.
pub const CART_KEY: &str = "ampkicksCart";

/// Key holding the list of placed orders.
pub const ORDERS_KEY: &str = "ampkicksOrders";

/// The shopper's persisted state.
///
/// Each request loads the cart, runs one ledger operation on it, and saves it
/// back while holding the session lock in [`crate::state::AppState`].
pub struct Session {
    store: Box<dyn KeyValueStore>,
}

impl Session {
    #[must_use]
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The stored cart, or an empty one if none was saved.
    ///
    /// A cart that no longer parses is discarded with a warning; losing a cart
    /// is recoverable, refusing to serve the shop is not.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store itself cannot be read.
    pub fn load_cart(&self) -> Result<Cart, StoreError> {
        let Some(raw) = self.store.get(CART_KEY)? else {
            return Ok(Cart::new());
        };

        match serde_json::from_str(&raw) {
            Ok(cart) => Ok(cart),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable stored cart");
                Ok(Cart::new())
            }
        }
    }

    /// Persist `cart`, replacing the stored one.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn save_cart(&mut self, cart: &Cart) -> Result<(), StoreError> {
        let raw = serde_json::to_string(cart)?;
        self.store.set(CART_KEY, raw)
    }

    /// Drop the stored cart. The next [`Session::load_cart`] returns an empty one.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn clear_cart(&mut self) -> Result<(), StoreError> {
        self.store.remove(CART_KEY)
    }

    /// Orders placed so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Json`] if the stored list is unreadable. Unlike
    /// the cart, order history is never silently dropped.
    pub fn orders(&self) -> Result<Vec<Order>, StoreError> {
        match self.store.get(ORDERS_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Append `order` to the order history.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read or written.
    pub fn append_order(&mut self, order: &Order) -> Result<(), StoreError> {
        let raw = self.history_with(order)?;
        self.store.set(ORDERS_KEY, raw)
    }

    /// Append `order` to the history and replace the cart with `cart` in a
    /// single store write, so a placed order never leaves its cart behind.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read or the store cannot be
    /// written. Neither key changes in that case.
    pub fn record_order(&mut self, order: &Order, cart: &Cart) -> Result<(), StoreError> {
        let orders = self.history_with(order)?;
        let cart = serde_json::to_string(cart)?;
        self.store.set_many(vec![(ORDERS_KEY, orders), (CART_KEY, cart)])
    }

    fn history_with(&self, order: &Order) -> Result<String, StoreError> {
        let mut orders = self.orders()?;
        orders.push(order.clone());
        Ok(serde_json::to_string(&orders)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ampkicks_core::{CheckoutForm, Price, ProductId, ProductSnapshot, Quantity};

    use super::*;
    use crate::store::MemoryStore;

    /// Accepts reads but rejects every write.
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.0.get(key)
        }

        fn set(&mut self, _key: &str, _value: String) -> Result<(), StoreError> {
            Err(read_only())
        }

        fn set_many(&mut self, _entries: Vec<(&str, String)>) -> Result<(), StoreError> {
            Err(read_only())
        }

        fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
            Err(read_only())
        }
    }

    fn read_only() -> StoreError {
        StoreError::Io {
            path: "read-only".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        }
    }

    fn cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(
            ProductSnapshot {
                id: ProductId::new(1),
                name: "Air Runner".to_string(),
                price: Price::new(1000),
                image: "images/1.jpg".to_string(),
            },
            "9",
            Quantity::ONE,
        );
        cart
    }

    fn form() -> CheckoutForm {
        CheckoutForm {
            full_name: "Juan Dela Cruz".to_string(),
            email: "juan@example.com".to_string(),
            phone: "09171234567".to_string(),
            address: "123 Rizal St".to_string(),
            city: "Quezon City".to_string(),
            province: "Metro Manila".to_string(),
            zip_code: "1100".to_string(),
            payment_method: "cod".to_string(),
        }
    }

    #[test]
    fn test_missing_cart_is_empty() {
        let session = Session::new(Box::new(MemoryStore::new()));
        assert!(session.load_cart().unwrap().is_empty());
        assert!(session.orders().unwrap().is_empty());
    }

    #[test]
    fn test_cart_round_trip() {
        let mut session = Session::new(Box::new(MemoryStore::new()));
        session.save_cart(&cart()).unwrap();
        assert_eq!(session.load_cart().unwrap(), cart());
    }

    #[test]
    fn test_clear_cart() {
        let mut session = Session::new(Box::new(MemoryStore::new()));
        session.save_cart(&cart()).unwrap();
        session.clear_cart().unwrap();
        assert!(session.load_cart().unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_cart_is_discarded() {
        let mut store = MemoryStore::new();
        store.set(CART_KEY, "{broken".to_string()).unwrap();
        let session = Session::new(Box::new(store));
        assert!(session.load_cart().unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_orders_are_an_error() {
        let mut store = MemoryStore::new();
        store.set(ORDERS_KEY, "{broken".to_string()).unwrap();
        let mut session = Session::new(Box::new(store));

        let (order, _) = cart().checkout(&form()).unwrap();
        assert!(session.append_order(&order).is_err());
    }

    #[test]
    fn test_record_order_writes_history_and_cart_together() {
        let mut session = Session::new(Box::new(MemoryStore::new()));
        session.save_cart(&cart()).unwrap();

        let (order, emptied) = cart().checkout(&form()).unwrap();
        session.record_order(&order, &emptied).unwrap();

        assert_eq!(session.orders().unwrap(), vec![order]);
        assert!(session.load_cart().unwrap().is_empty());
    }

    #[test]
    fn test_failed_record_order_changes_nothing() {
        let mut store = MemoryStore::new();
        store
            .set(CART_KEY, serde_json::to_string(&cart()).unwrap())
            .unwrap();
        let mut session = Session::new(Box::new(ReadOnlyStore(store)));

        let (order, emptied) = cart().checkout(&form()).unwrap();
        assert!(session.record_order(&order, &emptied).is_err());

        assert!(session.orders().unwrap().is_empty());
        assert_eq!(session.load_cart().unwrap(), cart());
    }

    #[test]
    fn test_append_order_keeps_history() {
        let mut session = Session::new(Box::new(MemoryStore::new()));
        let (first, _) = cart().checkout(&form()).unwrap();
        let (second, _) = cart().checkout(&form()).unwrap();

        session.append_order(&first).unwrap();
        session.append_order(&second).unwrap();

        let orders = session.orders().unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders, vec![first, second]);
    }
}
