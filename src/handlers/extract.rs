//! Request extractors that run every protected route through the auth gate.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};

use crate::auth::{Credentials, Principal};
use crate::domain::user::Role;
use crate::errors::AppError;
use crate::state::AppState;

pub const TOKEN_COOKIE: &str = "token";
pub const ADMIN_PIN_HEADER: &str = "x-admin-pin";
pub const ADMIN_PIN_COOKIE: &str = "adminPin";

/// Collects whatever credentials the request carries. The bearer header
/// takes precedence over the token cookie, and the PIN header over the PIN
/// cookie.
pub fn credentials(req: &HttpRequest) -> Credentials {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| req.cookie(TOKEN_COOKIE).map(|c| c.value().to_string()));

    let admin_pin = req
        .headers()
        .get(ADMIN_PIN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| req.cookie(ADMIN_PIN_COOKIE).map(|c| c.value().to_string()));

    Credentials { token, admin_pin }
}

fn authorize(req: &HttpRequest, role: Role) -> Result<Principal, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("application state is not registered".into()))?;

    state.gate.require(&credentials(req), role).map_err(|e| {
        log::warn!("Rejected {} {}: {}", req.method(), req.path(), e);
        AppError::from(e)
    })
}

/// Any signed-in caller, shopper or admin.
pub struct Authenticated(pub Principal);

impl FromRequest for Authenticated {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authorize(req, Role::User).map(Authenticated))
    }
}

/// An admin, by token or by PIN.
pub struct AdminOnly(pub Principal);

impl FromRequest for AdminOnly {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authorize(req, Role::Admin).map(AdminOnly))
    }
}
