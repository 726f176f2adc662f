use uuid::Uuid;

use super::errors::DomainError;
use super::order::{NewOrder, Order, OrderFilter, OrderStatus};
use super::product::{NewProduct, Product, ProductStats};
use super::user::{NewUser, User};

pub trait ProductRepository: Send + Sync + 'static {
    fn create(&self, product: NewProduct) -> Result<Uuid, DomainError>;
    /// Returns `false` when no product has this id.
    fn update(&self, id: Uuid, product: NewProduct) -> Result<bool, DomainError>;
    /// Returns `false` when no product has this id.
    fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError>;
    fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError>;
    /// Newest first.
    fn list(&self, in_stock_only: bool) -> Result<Vec<Product>, DomainError>;
    fn stats(&self) -> Result<ProductStats, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    fn create(&self, order: NewOrder) -> Result<Uuid, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError>;
    /// Newest first.
    fn list(&self, filter: OrderFilter) -> Result<Vec<Order>, DomainError>;
    /// Returns `false` when no order has this id.
    fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<bool, DomainError>;
}

pub trait UserRepository: Send + Sync + 'static {
    /// Fails with a validation error when the email is already taken.
    fn create(&self, user: NewUser) -> Result<Uuid, DomainError>;
    fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;
}
