//! Client-side shopping cart.
//!
//! The cart lives with the shopper, not on the server. Persistence goes
//! through [`CartStorage`] so the same store works over browser-like local
//! storage, a directory on disk, or plain memory in tests.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::order::OrderItemIntent;
use crate::domain::product::Product;
use crate::pricing::{self, PriceQuote, Priced, MAX_QUANTITY};

pub const CART_KEY: &str = "cart";
pub const PROMO_KEY: &str = "appliedPromo";

/// Key/value persistence port for the cart.
pub trait CartStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Stores each key as a file in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CartStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        let result = fs::create_dir_all(&self.dir).and_then(|_| fs::write(self.path(key), value));
        if let Err(e) = result {
            log::warn!("Failed to persist cart key '{}': {}", key, e);
        }
    }

    fn remove(&mut self, key: &str) {
        match fs::remove_file(self.path(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => {
                log::warn!("Failed to remove cart key '{}': {}", key, e);
            }
            _ => {}
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("The promo code you entered is not valid")]
    InvalidPromo,
}

/// Product details captured when a product is put into the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartProduct {
    pub product_id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub image: String,
}

impl From<&Product> for CartProduct {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.effective_price().clone(),
            image: product.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub quantity: i32,
    pub image: String,
}

impl Priced for CartLine {
    fn unit_price(&self) -> &BigDecimal {
        &self.price
    }

    fn quantity(&self) -> i32 {
        self.quantity
    }
}

pub struct CartStore<S> {
    storage: S,
    items: Vec<CartLine>,
    promo: Option<String>,
}

impl<S: CartStorage> CartStore<S> {
    /// Restores the cart from `storage`. Missing or unreadable state yields
    /// an empty cart; stored lines are brought back to one line per product
    /// with a quantity in `1..=MAX_QUANTITY`.
    pub fn load(storage: S) -> Self {
        let items = match storage.get(CART_KEY) {
            Some(raw) => serde_json::from_str(&raw)
                .map(normalize_lines)
                .unwrap_or_else(|e| {
                    log::warn!("Discarding unreadable cart state: {}", e);
                    Vec::new()
                }),
            None => Vec::new(),
        };
        let promo = storage
            .get(PROMO_KEY)
            .and_then(|code| pricing::normalize_promo(&code).map(str::to_string));

        Self {
            storage,
            items,
            promo,
        }
    }

    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    pub fn applied_promo(&self) -> Option<&str> {
        self.promo.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Adds one unit; a product already in the cart has its quantity bumped.
    pub fn add(&mut self, product: CartProduct) {
        match self
            .items
            .iter_mut()
            .find(|line| line.product_id == product.product_id)
        {
            Some(line) => line.quantity = line.quantity.saturating_add(1).min(MAX_QUANTITY),
            None => self.items.push(CartLine {
                product_id: product.product_id,
                name: product.name,
                price: product.price,
                quantity: 1,
                image: product.image,
            }),
        }
        self.persist_items();
    }

    pub fn remove(&mut self, product_id: Uuid) {
        self.items.retain(|line| line.product_id != product_id);
        self.persist_items();
    }

    pub fn set_quantity(&mut self, product_id: Uuid, quantity: i32) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }
        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.product_id == product_id)
        {
            line.quantity = quantity.min(MAX_QUANTITY);
        }
        self.persist_items();
    }

    pub fn apply_promo(&mut self, code: &str) -> Result<(), CartError> {
        let code = pricing::normalize_promo(code).ok_or(CartError::InvalidPromo)?;
        self.promo = Some(code.to_string());
        self.persist_promo();
        Ok(())
    }

    pub fn clear_promo(&mut self) {
        self.promo = None;
        self.persist_promo();
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.persist_items();
        self.clear_promo();
    }

    pub fn total_item_count(&self) -> i32 {
        self.items
            .iter()
            .fold(0, |acc: i32, line| acc.saturating_add(line.quantity))
    }

    pub fn quote(&self) -> PriceQuote {
        pricing::quote(&self.items, self.applied_promo())
    }

    /// What gets sent at checkout: product ids and quantities only.
    pub fn order_intents(&self) -> Vec<OrderItemIntent> {
        self.items
            .iter()
            .map(|line| OrderItemIntent {
                product_id: line.product_id,
                quantity: line.quantity,
            })
            .collect()
    }

    fn persist_items(&mut self) {
        match serde_json::to_string(&self.items) {
            Ok(raw) => self.storage.set(CART_KEY, &raw),
            Err(e) => log::warn!("Failed to serialize cart: {}", e),
        }
    }

    fn persist_promo(&mut self) {
        match &self.promo {
            Some(code) => self.storage.set(PROMO_KEY, code),
            None => self.storage.remove(PROMO_KEY),
        }
    }
}

fn normalize_lines(lines: Vec<CartLine>) -> Vec<CartLine> {
    let mut merged: Vec<CartLine> = Vec::with_capacity(lines.len());
    for line in lines.into_iter().filter(|line| line.quantity > 0) {
        match merged.iter_mut().find(|m| m.product_id == line.product_id) {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .saturating_add(line.quantity)
                    .min(MAX_QUANTITY)
            }
            None => merged.push(CartLine {
                quantity: line.quantity.min(MAX_QUANTITY),
                ..line
            }),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, price: i32) -> CartProduct {
        CartProduct {
            product_id: Uuid::new_v4(),
            name: name.to_string(),
            price: BigDecimal::from(price),
            image: format!("/img/{name}.png"),
        }
    }

    fn cart() -> CartStore<MemoryStorage> {
        CartStore::load(MemoryStorage::new())
    }

    #[test]
    fn adding_same_product_twice_bumps_quantity() {
        let mut cart = cart();
        let rajma = product("rajma", 120);
        cart.add(rajma.clone());
        cart.add(rajma.clone());

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.total_item_count(), 2);
    }

    #[test]
    fn set_quantity_zero_removes_line() {
        let mut cart = cart();
        let dal = product("dal", 100);
        cart.add(dal.clone());
        cart.set_quantity(dal.product_id, 0);

        assert!(cart.is_empty());
        assert_eq!(cart.quote().total, BigDecimal::from(0));
    }

    #[test]
    fn set_quantity_on_unknown_product_is_ignored() {
        let mut cart = cart();
        cart.add(product("dal", 100));
        cart.set_quantity(Uuid::new_v4(), 5);
        assert_eq!(cart.total_item_count(), 1);
    }

    #[test]
    fn quote_reads_through_to_pricing() {
        let mut cart = cart();
        let rajma = product("rajma", 120);
        cart.add(rajma.clone());
        cart.set_quantity(rajma.product_id, 2);
        cart.add(product("dal", 100));

        let q = cart.quote();
        assert_eq!(q.subtotal, BigDecimal::from(340));
        assert_eq!(q.total, BigDecimal::from(380));

        cart.apply_promo("tiffin").unwrap();
        assert_eq!(cart.quote().total, BigDecimal::from(70));
    }

    #[test]
    fn rejected_promo_never_enters_state() {
        let mut cart = cart();
        cart.add(product("dosa", 90));
        assert_eq!(cart.apply_promo("HALFOFF"), Err(CartError::InvalidPromo));
        assert_eq!(cart.applied_promo(), None);
        assert!(cart.storage().get(PROMO_KEY).is_none());
    }

    #[test]
    fn clear_empties_items_and_promo() {
        let mut cart = cart();
        cart.add(product("biryani", 180));
        cart.apply_promo("TIFFIN").unwrap();
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.applied_promo(), None);
        assert_eq!(cart.storage().get(CART_KEY).as_deref(), Some("[]"));
        assert!(cart.storage().get(PROMO_KEY).is_none());
    }

    #[test]
    fn state_survives_reload() {
        let mut cart = cart();
        let paneer = product("paneer", 160);
        cart.add(paneer.clone());
        cart.add(paneer.clone());
        cart.apply_promo("TIFFIN").unwrap();

        let reloaded = CartStore::load(cart.storage().clone());
        assert_eq!(reloaded.items(), cart.items());
        assert_eq!(reloaded.applied_promo(), Some("TIFFIN"));
    }

    #[test]
    fn corrupt_storage_loads_as_empty_cart() {
        let mut storage = MemoryStorage::new();
        storage.set(CART_KEY, "{not json");
        let cart = CartStore::load(storage);
        assert!(cart.is_empty());
    }

    #[test]
    fn stored_lines_are_normalized_on_load() {
        let thali = Uuid::new_v4();
        let dosa = Uuid::new_v4();
        let line = |id: Uuid, quantity: i32| CartLine {
            product_id: id,
            name: "dish".into(),
            price: BigDecimal::from(100),
            quantity,
            image: "/img/dish.png".into(),
        };
        let stored = vec![line(thali, 2), line(dosa, 0), line(thali, i32::MAX), line(dosa, -3)];

        let mut storage = MemoryStorage::new();
        storage.set(CART_KEY, &serde_json::to_string(&stored).unwrap());
        let cart = CartStore::load(storage);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].product_id, thali);
        assert_eq!(cart.items()[0].quantity, MAX_QUANTITY);
    }

    #[test]
    fn quantities_are_capped() {
        let mut cart = cart();
        let kheer = product("kheer", 60);
        cart.add(kheer.clone());
        cart.set_quantity(kheer.product_id, i32::MAX);
        cart.add(kheer.clone());

        assert_eq!(cart.items()[0].quantity, MAX_QUANTITY);
        assert_eq!(cart.total_item_count(), MAX_QUANTITY);
    }

    #[test]
    fn file_storage_remove_of_missing_key_is_quiet() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path());
        storage.remove(PROMO_KEY);
        storage.set(PROMO_KEY, "TIFFIN");
        storage.remove(PROMO_KEY);
        assert!(storage.get(PROMO_KEY).is_none());
    }

    #[test]
    fn order_intents_carry_ids_and_quantities() {
        let mut cart = cart();
        let chole = product("chole", 140);
        cart.add(chole.clone());
        cart.set_quantity(chole.product_id, 3);

        let intents = cart.order_intents();
        assert_eq!(
            intents,
            vec![OrderItemIntent {
                product_id: chole.product_id,
                quantity: 3
            }]
        );
    }

    #[test]
    fn file_storage_persists_between_stores() {
        let dir = tempfile::tempdir().unwrap();
        let aloo = product("aloo", 95);
        {
            let mut cart = CartStore::load(FileStorage::new(dir.path()));
            cart.add(aloo.clone());
            cart.apply_promo("TIFFIN").unwrap();
        }

        let cart = CartStore::load(FileStorage::new(dir.path()));
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].product_id, aloo.product_id);
        assert_eq!(cart.applied_promo(), Some("TIFFIN"));
    }
}
