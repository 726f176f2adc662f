use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::account_service::{Registration, Session};
use crate::domain::user::{Role, User};
use crate::errors::AppError;
use crate::state::AppState;

use super::extract::Authenticated;
use super::run;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Registration {
            name: req.name,
            email: req.email,
            password: req.password,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// `user` or `admin`.
    pub role: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserResponse,
}

impl AuthResponse {
    fn new(message: &str, session: Session) -> Self {
        AuthResponse {
            message: message.to_string(),
            token: session.token,
            user: session.user.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyResponse {
    pub user: UserResponse,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/auth/register
///
/// Also mounted at `/api/auth/signup`.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Missing field or user already exists"),
    ),
    tag = "auth"
)]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    create_account(state, body.into_inner(), Role::User).await
}

#[utoipa::path(
    post,
    path = "/api/auth/admin-register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Admin account created", body = AuthResponse),
        (status = 400, description = "Missing field or user already exists"),
    ),
    tag = "auth"
)]
pub async fn admin_register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    create_account(state, body.into_inner(), Role::Admin).await
}

async fn create_account(
    state: web::Data<AppState>,
    body: RegisterRequest,
    role: Role,
) -> Result<HttpResponse, AppError> {
    let registration = Registration::from(body);
    let session = run(move || state.accounts.register(registration, role)).await?;
    Ok(HttpResponse::Created().json(AuthResponse::new("User created successfully", session)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "auth"
)]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let LoginRequest { email, password } = body.into_inner();
    let session = run(move || state.accounts.login(&email, &password)).await?;
    Ok(HttpResponse::Ok().json(AuthResponse::new("Login successful", session)))
}

/// GET /api/auth/verify
///
/// Resolves the presented token back to its account.
#[utoipa::path(
    get,
    path = "/api/auth/verify",
    responses(
        (status = 200, description = "Token is valid", body = VerifyResponse),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 404, description = "Account no longer exists"),
    ),
    tag = "auth"
)]
pub async fn verify(
    Authenticated(principal): Authenticated,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = run(move || state.accounts.current_user(&principal)).await?;
    Ok(HttpResponse::Ok().json(VerifyResponse { user: user.into() }))
}
