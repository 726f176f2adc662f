//! In-memory repositories for service tests.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, Order, OrderFilter, OrderStatus};
use crate::domain::ports::{OrderRepository, ProductRepository, UserRepository};
use crate::domain::product::{NewProduct, Product, ProductStats};
use crate::domain::user::{NewUser, User};

/// Clones share storage, so a test can keep a handle after moving one
/// into a service.
#[derive(Default, Clone)]
pub struct FakeProducts(Arc<Mutex<Vec<Product>>>);

impl FakeProducts {
    pub fn set_in_stock(&self, id: Uuid, in_stock: bool) {
        let mut rows = self.0.lock().unwrap();
        if let Some(p) = rows.iter_mut().find(|p| p.id == id) {
            p.in_stock = in_stock;
        }
    }
}

fn to_product(id: Uuid, p: NewProduct) -> Product {
    let now = Utc::now();
    Product {
        id,
        name: p.name,
        description: p.description,
        price: p.price,
        offer_price: p.offer_price,
        category: p.category,
        image: p.image,
        in_stock: p.in_stock,
        created_at: now,
        updated_at: now,
    }
}

impl ProductRepository for FakeProducts {
    fn create(&self, product: NewProduct) -> Result<Uuid, DomainError> {
        let id = Uuid::new_v4();
        self.0.lock().unwrap().push(to_product(id, product));
        Ok(id)
    }

    fn update(&self, id: Uuid, product: NewProduct) -> Result<bool, DomainError> {
        let mut rows = self.0.lock().unwrap();
        match rows.iter_mut().find(|p| p.id == id) {
            Some(existing) => {
                let created_at = existing.created_at;
                *existing = to_product(id, product);
                existing.created_at = created_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut rows = self.0.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        Ok(rows.len() != before)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        Ok(self.0.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError> {
        let rows = self.0.lock().unwrap();
        Ok(rows.iter().filter(|p| ids.contains(&p.id)).cloned().collect())
    }

    fn list(&self, in_stock_only: bool) -> Result<Vec<Product>, DomainError> {
        let rows = self.0.lock().unwrap();
        Ok(rows
            .iter()
            .rev()
            .filter(|p| !in_stock_only || p.in_stock)
            .cloned()
            .collect())
    }

    fn stats(&self) -> Result<ProductStats, DomainError> {
        let rows = self.0.lock().unwrap();
        let in_stock = rows.iter().filter(|p| p.in_stock).count() as i64;
        Ok(ProductStats {
            total_products: rows.len() as i64,
            in_stock_products: in_stock,
            out_of_stock_products: rows.len() as i64 - in_stock,
        })
    }
}

#[derive(Default, Clone)]
pub struct FakeOrders(Arc<Mutex<Vec<Order>>>);

impl OrderRepository for FakeOrders {
    fn create(&self, order: NewOrder) -> Result<Uuid, DomainError> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        self.0.lock().unwrap().push(Order {
            id,
            user_id: order.user_id,
            customer_info: order.customer_info,
            items: order.items,
            subtotal: order.subtotal,
            delivery_fee: order.delivery_fee,
            discount_amount: order.discount_amount,
            total_amount: order.total_amount,
            promo_code: order.promo_code,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        Ok(self.0.lock().unwrap().iter().find(|o| o.id == id).cloned())
    }

    fn list(&self, filter: OrderFilter) -> Result<Vec<Order>, DomainError> {
        let rows = self.0.lock().unwrap();
        Ok(rows
            .iter()
            .rev()
            .filter(|o| match filter {
                OrderFilter::All => true,
                OrderFilter::User(user_id) => o.user_id == Some(user_id),
            })
            .cloned()
            .collect())
    }

    fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<bool, DomainError> {
        let mut rows = self.0.lock().unwrap();
        match rows.iter_mut().find(|o| o.id == id) {
            Some(order) => {
                order.status = status;
                order.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default, Clone)]
pub struct FakeUsers(Arc<Mutex<Vec<User>>>);

impl UserRepository for FakeUsers {
    fn create(&self, user: NewUser) -> Result<Uuid, DomainError> {
        let mut rows = self.0.lock().unwrap();
        if rows.iter().any(|u| u.email == user.email) {
            return Err(DomainError::validation("User already exists"));
        }
        let id = Uuid::new_v4();
        rows.push(User {
            id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self.0.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.0.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }
}
