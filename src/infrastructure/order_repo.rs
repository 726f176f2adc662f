use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{CustomerInfo, NewOrder, Order, OrderFilter, OrderItem, OrderStatus};
use crate::domain::ports::OrderRepository;
use crate::schema::{order_items, orders};

use super::models::{NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow};

fn to_order(row: OrderRow, items: Vec<OrderItemRow>) -> Result<Order, DomainError> {
    let status: OrderStatus = row
        .status
        .parse()
        .map_err(|e: String| DomainError::Internal(format!("order {}: {}", row.id, e)))?;

    Ok(Order {
        id: row.id,
        user_id: row.user_id,
        customer_info: CustomerInfo {
            name: row.customer_name,
            email: row.customer_email,
            phone: row.customer_phone,
            address: row.customer_address,
        },
        items: items
            .into_iter()
            .map(|i| OrderItem {
                product_id: i.product_id,
                name: i.name,
                unit_price: i.unit_price,
                image: i.image,
                quantity: i.quantity,
            })
            .collect(),
        subtotal: row.subtotal,
        delivery_fee: row.delivery_fee,
        discount_amount: row.discount_amount,
        total_amount: row.total_amount,
        promo_code: row.promo_code,
        status,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

// ── Repository ────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, order: NewOrder) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Insert the order
            let order_id = Uuid::new_v4();
            diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: order_id,
                    user_id: order.user_id,
                    customer_name: order.customer_info.name,
                    customer_email: order.customer_info.email,
                    customer_phone: order.customer_info.phone,
                    customer_address: order.customer_info.address,
                    subtotal: order.subtotal,
                    delivery_fee: order.delivery_fee,
                    discount_amount: order.discount_amount,
                    total_amount: order.total_amount,
                    promo_code: order.promo_code,
                    status: OrderStatus::Pending.as_str().to_string(),
                })
                .execute(conn)?;

            // 2. Insert the item snapshots, keeping cart order
            let new_items: Vec<NewOrderItemRow> = order
                .items
                .into_iter()
                .enumerate()
                .map(|(position, item)| NewOrderItemRow {
                    id: Uuid::new_v4(),
                    order_id,
                    position: position as i32,
                    product_id: item.product_id,
                    name: item.name,
                    unit_price: item.unit_price,
                    image: item.image,
                    quantity: item.quantity,
                })
                .collect();
            diesel::insert_into(order_items::table)
                .values(&new_items)
                .execute(conn)?;

            Ok(order_id)
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = order_items::table
            .filter(order_items::order_id.eq(order.id))
            .order(order_items::position.asc())
            .select(OrderItemRow::as_select())
            .load(&mut conn)?;

        to_order(order, items).map(Some)
    }

    fn list(&self, filter: OrderFilter) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let mut query = orders::table
                .select(OrderRow::as_select())
                .order(orders::created_at.desc())
                .into_boxed();
            if let OrderFilter::User(user_id) = filter {
                query = query.filter(orders::user_id.eq(user_id));
            }
            let rows = query.load(conn)?;

            let items = OrderItemRow::belonging_to(&rows)
                .order(order_items::position.asc())
                .select(OrderItemRow::as_select())
                .load(conn)?;

            items
                .grouped_by(&rows)
                .into_iter()
                .zip(rows)
                .map(|(items, row)| to_order(row, items))
                .collect()
        })
    }

    fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        let changed = diesel::update(orders::table.find(id))
            .set((
                orders::status.eq(status.as_str()),
                orders::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;
        Ok(changed > 0)
    }
}
