use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pricing::Priced;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Delivered,
}

use OrderStatus::*;

/// Legal status moves. Staff may correct any status in either direction,
/// so every state reaches every other one; a same-state update is a no-op.
const TRANSITIONS: &[(OrderStatus, &[OrderStatus])] = &[
    (Pending, &[Confirmed, Preparing, Delivered]),
    (Confirmed, &[Pending, Preparing, Delivered]),
    (Preparing, &[Pending, Confirmed, Delivered]),
    (Delivered, &[Pending, Confirmed, Preparing]),
];

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [Pending, Confirmed, Preparing, Delivered];

    pub fn as_str(self) -> &'static str {
        match self {
            Pending => "pending",
            Confirmed => "confirmed",
            Preparing => "preparing",
            Delivered => "delivered",
        }
    }

    pub fn allowed_transitions(self) -> &'static [OrderStatus] {
        TRANSITIONS
            .iter()
            .find(|(from, _)| *from == self)
            .map(|(_, to)| *to)
            .unwrap_or(&[])
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        self == next || self.allowed_transitions().contains(&next)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Invalid status: {s}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// A line of an order, copied by value from the catalog at checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub product_id: Uuid,
    pub name: String,
    pub unit_price: BigDecimal,
    pub image: String,
    pub quantity: i32,
}

impl Priced for OrderItem {
    fn unit_price(&self) -> &BigDecimal {
        &self.unit_price
    }

    fn quantity(&self) -> i32 {
        self.quantity
    }
}

/// What a shopper asks for: a product and how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderItemIntent {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct Checkout {
    pub customer_info: CustomerInfo,
    pub items: Vec<OrderItemIntent>,
    pub promo_code: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Option<Uuid>,
    pub customer_info: CustomerInfo,
    pub items: Vec<OrderItem>,
    pub subtotal: BigDecimal,
    pub delivery_fee: BigDecimal,
    pub discount_amount: BigDecimal,
    pub total_amount: BigDecimal,
    pub promo_code: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub customer_info: CustomerInfo,
    pub items: Vec<OrderItem>,
    pub subtotal: BigDecimal,
    pub delivery_fee: BigDecimal,
    pub discount_amount: BigDecimal,
    pub total_amount: BigDecimal,
    pub promo_code: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderFilter {
    All,
    User(Uuid),
}
