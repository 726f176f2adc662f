use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{
    Checkout, CustomerInfo, NewOrder, Order, OrderFilter, OrderItem, OrderItemIntent, OrderStatus,
};
use crate::domain::ports::{OrderRepository, ProductRepository};
use crate::pricing::{self, PriceQuote};

#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub id: Uuid,
    pub quote: PriceQuote,
}

pub struct OrderService<O, P> {
    orders: O,
    products: P,
}

impl<O: OrderRepository, P: ProductRepository> OrderService<O, P> {
    pub fn new(orders: O, products: P) -> Self {
        Self { orders, products }
    }

    /// Places an order for `user_id`. Prices come from the current catalog;
    /// the client only decides which products and how many.
    pub fn create_order(
        &self,
        user_id: Option<Uuid>,
        checkout: Checkout,
    ) -> Result<PlacedOrder, DomainError> {
        let customer_info = validate_customer(checkout.customer_info)?;
        let intents = merge_intents(checkout.items)?;
        let promo_code = match checkout.promo_code.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(code) => Some(
                pricing::normalize_promo(code)
                    .ok_or_else(|| DomainError::validation("Invalid promo code"))?
                    .to_string(),
            ),
        };

        let ids: Vec<Uuid> = intents.iter().map(|i| i.product_id).collect();
        let catalog: HashMap<Uuid, _> = self
            .products
            .find_by_ids(&ids)?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let items = intents
            .iter()
            .map(|intent| {
                let product = catalog.get(&intent.product_id).ok_or_else(|| {
                    DomainError::validation(format!("Unknown product: {}", intent.product_id))
                })?;
                if !product.in_stock {
                    return Err(DomainError::validation(format!(
                        "Product is out of stock: {}",
                        product.name
                    )));
                }
                Ok(OrderItem {
                    product_id: product.id,
                    name: product.name.clone(),
                    unit_price: product.effective_price().clone(),
                    image: product.image.clone(),
                    quantity: intent.quantity,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        let quote = pricing::quote(&items, promo_code.as_deref());
        if !pricing::fits_money_column(&quote.subtotal) || !pricing::fits_money_column(&quote.total)
        {
            return Err(DomainError::validation("Order total is too large"));
        }
        let id = self.orders.create(NewOrder {
            user_id,
            customer_info,
            items,
            subtotal: quote.subtotal.clone(),
            delivery_fee: quote.delivery_fee.clone(),
            discount_amount: quote.discount.clone(),
            total_amount: quote.total.clone(),
            promo_code,
        })?;

        log::info!("Order {} placed, total {}", id, quote.total);
        Ok(PlacedOrder { id, quote })
    }

    pub fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, DomainError> {
        self.orders.list(filter)
    }

    pub fn get_order(&self, id: Uuid) -> Result<Order, DomainError> {
        self.orders
            .find_by_id(id)?
            .ok_or(DomainError::NotFound("Order not found"))
    }

    pub fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<(), DomainError> {
        let current = self.get_order(id)?.status;
        if !current.can_transition_to(status) {
            return Err(DomainError::validation(format!(
                "Cannot move order from {current} to {status}"
            )));
        }
        if !self.orders.update_status(id, status)? {
            return Err(DomainError::NotFound("Order not found"));
        }
        log::info!("Order {} status {} -> {}", id, current, status);
        Ok(())
    }
}

fn validate_customer(info: CustomerInfo) -> Result<CustomerInfo, DomainError> {
    let field = |value: String, name: &str| {
        let value = value.trim().to_string();
        if value.is_empty() {
            Err(DomainError::validation(format!(
                "Missing required field: customerInfo.{name}"
            )))
        } else {
            Ok(value)
        }
    };
    Ok(CustomerInfo {
        name: field(info.name, "name")?,
        email: field(info.email, "email")?,
        phone: field(info.phone, "phone")?,
        address: field(info.address, "address")?,
    })
}

/// Rejects empty carts and quantities outside `1..=MAX_QUANTITY`; repeated
/// products are folded into their first line, and the folded quantity is
/// held to the same bound.
fn merge_intents(items: Vec<OrderItemIntent>) -> Result<Vec<OrderItemIntent>, DomainError> {
    if items.is_empty() {
        return Err(DomainError::validation("Cart is empty"));
    }
    let mut merged: Vec<OrderItemIntent> = Vec::with_capacity(items.len());
    for item in items {
        let product_id = item.product_id;
        let invalid =
            move || DomainError::validation(format!("Invalid quantity for product {product_id}"));
        if !(1..=pricing::MAX_QUANTITY).contains(&item.quantity) {
            return Err(invalid());
        }
        match merged.iter_mut().find(|m| m.product_id == item.product_id) {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(item.quantity)
                    .filter(|q| *q <= pricing::MAX_QUANTITY)
                    .ok_or_else(invalid)?;
            }
            None => merged.push(item),
        }
    }
    Ok(merged)
}
