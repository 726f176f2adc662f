use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::product::{Product, ProductDraft, RawAmount, Visibility};
use crate::errors::AppError;
use crate::state::AppState;

use super::extract::AdminOnly;
use super::run;

// ── Request / response DTOs ──────────────────────────────────────────────────

/// Create/update body. Amounts may be sent as numbers or numeric strings.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>, example = "120.00")]
    pub price: Option<RawAmount>,
    #[schema(value_type = Option<String>, example = "99.00")]
    pub offer_price: Option<RawAmount>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub in_stock: Option<bool>,
}

impl From<ProductRequest> for ProductDraft {
    fn from(req: ProductRequest) -> Self {
        ProductDraft {
            name: req.name,
            description: req.description,
            price: req.price,
            offer_price: req.offer_price,
            category: req.category,
            image: req.image,
            in_stock: req.in_stock,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: String,
    pub offer_price: Option<String>,
    pub category: String,
    pub image: String,
    pub in_stock: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        ProductResponse {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price.to_string(),
            offer_price: p.offer_price.map(|o| o.to_string()),
            category: p.category,
            image: p.image,
            in_stock: p.in_stock,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductResponse {
    pub message: String,
    pub product_id: Uuid,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/products
///
/// The storefront menu: in-stock products, newest first.
#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "In-stock products", body = [ProductResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn list_products(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let products = run(move || state.catalog.list(Visibility::Public)).await?;
    Ok(HttpResponse::Ok().json(to_responses(products)))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found or out of stock"),
    ),
    tag = "products"
)]
pub async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let product = run(move || state.catalog.get(id, Visibility::Public)).await?;
    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// GET /api/admin/products
///
/// Every product, including those out of stock.
#[utoipa::path(
    get,
    path = "/api/admin/products",
    responses(
        (status = 200, description = "All products", body = [ProductResponse]),
        (status = 401, description = "Admin access required"),
    ),
    tag = "admin"
)]
pub async fn list_admin_products(
    _admin: AdminOnly,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let products = run(move || state.catalog.list(Visibility::Admin)).await?;
    Ok(HttpResponse::Ok().json(to_responses(products)))
}

#[utoipa::path(
    get,
    path = "/api/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 401, description = "Admin access required"),
        (status = 404, description = "Product not found"),
    ),
    tag = "admin"
)]
pub async fn get_admin_product(
    _admin: AdminOnly,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let product = run(move || state.catalog.get(id, Visibility::Admin)).await?;
    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// POST /api/products
///
/// Also mounted at `/api/admin/products`.
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = CreateProductResponse),
        (status = 400, description = "Missing or invalid field"),
        (status = 401, description = "Admin access required"),
    ),
    tag = "products"
)]
pub async fn create_product(
    _admin: AdminOnly,
    state: web::Data<AppState>,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    let draft = ProductDraft::from(body.into_inner());
    let product_id = run(move || state.catalog.create(draft)).await?;

    Ok(HttpResponse::Created().json(CreateProductResponse {
        message: "Product created successfully".into(),
        product_id,
    }))
}

/// PUT /api/products/{id}
///
/// Replaces every editable field. Also mounted under `/api/admin`.
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated"),
        (status = 400, description = "Missing or invalid field"),
        (status = 401, description = "Admin access required"),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn update_product(
    _admin: AdminOnly,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let draft = ProductDraft::from(body.into_inner());
    run(move || state.catalog.update(id, draft)).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Product updated successfully" })))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 401, description = "Admin access required"),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn delete_product(
    _admin: AdminOnly,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    run(move || state.catalog.delete(id)).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Product deleted successfully" })))
}

fn to_responses(products: Vec<Product>) -> Vec<ProductResponse> {
    products.into_iter().map(ProductResponse::from).collect()
}
