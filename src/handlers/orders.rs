use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::order::{
    Checkout, CustomerInfo, Order, OrderFilter, OrderItem, OrderItemIntent, OrderStatus,
};
use crate::domain::product::RawAmount;
use crate::errors::AppError;
use crate::state::AppState;

use super::extract::{AdminOnly, Authenticated};
use super::run;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CustomerInfoDto {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl From<CustomerInfoDto> for CustomerInfo {
    fn from(dto: CustomerInfoDto) -> Self {
        CustomerInfo {
            name: dto.name,
            email: dto.email,
            phone: dto.phone,
            address: dto.address,
        }
    }
}

impl From<CustomerInfo> for CustomerInfoDto {
    fn from(info: CustomerInfo) -> Self {
        CustomerInfoDto {
            name: info.name,
            email: info.email,
            phone: info.phone,
            address: info.address,
        }
    }
}

/// One cart line. Extra fields such as `name` or `price` are accepted and
/// ignored; the price always comes from the catalog.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub customer_info: CustomerInfoDto,
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
    pub promo_code: Option<String>,
    /// What the client computed. Only compared against the server's total.
    #[schema(value_type = Option<String>)]
    pub total_amount: Option<RawAmount>,
    #[schema(value_type = Option<String>)]
    pub discount_amount: Option<RawAmount>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub message: String,
    pub order_id: Uuid,
    pub total_amount: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub product_id: Uuid,
    pub name: String,
    pub price: String,
    pub image: String,
    pub quantity: i32,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        OrderItemResponse {
            product_id: item.product_id,
            name: item.name,
            price: item.unit_price.to_string(),
            image: item.image,
            quantity: item.quantity,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub customer_info: CustomerInfoDto,
    pub items: Vec<OrderItemResponse>,
    pub subtotal: String,
    pub delivery_fee: String,
    pub discount_amount: String,
    pub total_amount: String,
    pub promo_code: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            id: order.id,
            user_id: order.user_id,
            customer_info: order.customer_info.into(),
            items: order.items.into_iter().map(OrderItemResponse::from).collect(),
            subtotal: order.subtotal.to_string(),
            delivery_fee: order.delivery_fee.to_string(),
            discount_amount: order.discount_amount.to_string(),
            total_amount: order.total_amount.to_string(),
            promo_code: order.promo_code,
            status: order.status.to_string(),
            created_at: order.created_at.to_rfc3339(),
            updated_at: order.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserOrdersResponse {
    pub orders: Vec<OrderResponse>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// One of `pending`, `confirmed`, `preparing`, `delivered`.
    pub status: String,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/orders
///
/// Places an order for the signed-in shopper. Items are re-priced from the
/// catalog and the delivery fee and promo discount are recomputed, so the
/// stored amounts never depend on what the client sent.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = CreateOrderResponse),
        (status = 400, description = "Invalid cart, customer details or promo code"),
        (status = 401, description = "Sign-in required"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    Authenticated(principal): Authenticated,
    state: web::Data<AppState>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = principal.require_user_id()?;
    let body = body.into_inner();
    let client_total = body.total_amount.as_ref().and_then(RawAmount::parse);

    let checkout = Checkout {
        customer_info: body.customer_info.into(),
        items: body
            .items
            .into_iter()
            .map(|i| OrderItemIntent {
                product_id: i.product_id,
                quantity: i.quantity,
            })
            .collect(),
        promo_code: body.promo_code,
    };

    let placed = run(move || state.orders.create_order(Some(user_id), checkout)).await?;

    if let Some(client_total) = client_total.filter(|t| *t != placed.quote.total) {
        log::debug!(
            "Order {}: client total {} replaced by {}",
            placed.id,
            client_total,
            placed.quote.total
        );
    }

    Ok(HttpResponse::Created().json(CreateOrderResponse {
        message: "Order placed successfully".into(),
        order_id: placed.id,
        total_amount: placed.quote.total.to_string(),
    }))
}

/// GET /api/user/orders
///
/// The caller's own orders, newest first.
#[utoipa::path(
    get,
    path = "/api/user/orders",
    responses(
        (status = 200, description = "Orders of the signed-in shopper", body = UserOrdersResponse),
        (status = 401, description = "Sign-in required"),
    ),
    tag = "orders"
)]
pub async fn list_user_orders(
    Authenticated(principal): Authenticated,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = principal.require_user_id()?;
    let orders = run(move || state.orders.list_orders(OrderFilter::User(user_id))).await?;

    Ok(HttpResponse::Ok().json(UserOrdersResponse {
        orders: orders.into_iter().map(OrderResponse::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    responses(
        (status = 200, description = "Every order, newest first", body = [OrderResponse]),
        (status = 401, description = "Admin access required"),
    ),
    tag = "admin"
)]
pub async fn list_orders(
    _admin: AdminOnly,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let orders = run(move || state.orders.list_orders(OrderFilter::All)).await?;
    let body: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 401, description = "Admin access required"),
        (status = 404, description = "Order not found"),
    ),
    tag = "admin"
)]
pub async fn get_order(
    _admin: AdminOnly,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let order = run(move || state.orders.get_order(id)).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// PUT /api/admin/orders/{id}
///
/// Also accepted as PATCH.
#[utoipa::path(
    put,
    path = "/api/admin/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated"),
        (status = 400, description = "Unknown status or illegal transition"),
        (status = 401, description = "Admin access required"),
        (status = 404, description = "Order not found"),
    ),
    tag = "admin"
)]
pub async fn update_order_status(
    _admin: AdminOnly,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let status: OrderStatus = body.status.parse().map_err(AppError::BadRequest)?;
    run(move || state.orders.update_status(id, status)).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Order status updated successfully" })))
}
