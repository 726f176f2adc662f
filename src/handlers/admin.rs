use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::product::ProductStats;
use crate::errors::AppError;
use crate::state::AppState;

use super::extract::AdminOnly;
use super::run;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_products: i64,
    pub in_stock_products: i64,
    pub out_of_stock_products: i64,
}

impl From<ProductStats> for StatsResponse {
    fn from(s: ProductStats) -> Self {
        StatsResponse {
            total_products: s.total_products,
            in_stock_products: s.in_stock_products,
            out_of_stock_products: s.out_of_stock_products,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub role: String,
    /// Absent when admitted by PIN.
    pub user_id: Option<Uuid>,
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Catalog counts", body = StatsResponse),
        (status = 401, description = "Admin access required"),
    ),
    tag = "admin"
)]
pub async fn stats(
    _admin: AdminOnly,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let stats = run(move || state.catalog.stats()).await?;
    Ok(HttpResponse::Ok().json(StatsResponse::from(stats)))
}

/// GET /api/admin/session
///
/// Guard for the admin pages: succeeds only for admin callers.
#[utoipa::path(
    get,
    path = "/api/admin/session",
    responses(
        (status = 200, description = "Caller is an admin", body = SessionResponse),
        (status = 401, description = "Admin access required"),
    ),
    tag = "admin"
)]
pub async fn session(AdminOnly(principal): AdminOnly) -> HttpResponse {
    HttpResponse::Ok().json(SessionResponse {
        role: principal.role.to_string(),
        user_id: principal.user_id,
    })
}
