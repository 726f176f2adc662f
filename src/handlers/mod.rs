pub mod admin;
pub mod auth;
pub mod extract;
pub mod orders;
pub mod products;

use actix_web::{web, HttpResponse};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::domain::errors::DomainError;
use crate::errors::AppError;

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        products::list_products,
        products::get_product,
        products::list_admin_products,
        products::get_admin_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        orders::create_order,
        orders::list_user_orders,
        orders::list_orders,
        orders::get_order,
        orders::update_order_status,
        auth::register,
        auth::admin_register,
        auth::login,
        auth::verify,
        admin::stats,
        admin::session,
    ),
    tags(
        (name = "products", description = "Menu browsing and product management"),
        (name = "orders", description = "Checkout and order history"),
        (name = "auth", description = "Accounts and tokens"),
        (name = "admin", description = "Back office"),
    )
)]
pub struct ApiDoc;

/// Runs blocking service code (diesel, argon2) on the actix blocking pool.
pub(crate) async fn run<F, T>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(AppError::from)
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up")),
    tag = "admin"
)]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Registers every route plus the body/path error handlers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid request body: {err}")).into()
    }))
    .app_data(
        web::PathConfig::default()
            .error_handler(|_err, _req| AppError::BadRequest("Invalid id".into()).into()),
    )
    .route("/health", web::get().to(health))
    .service(
        web::scope("/api")
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/signup", web::post().to(auth::register))
                    .route("/admin-register", web::post().to(auth::admin_register))
                    .route("/login", web::post().to(auth::login))
                    .route("/verify", web::get().to(auth::verify)),
            )
            .service(
                web::resource("/products")
                    .route(web::get().to(products::list_products))
                    .route(web::post().to(products::create_product)),
            )
            .service(
                web::resource("/products/{id}")
                    .route(web::get().to(products::get_product))
                    .route(web::put().to(products::update_product))
                    .route(web::delete().to(products::delete_product)),
            )
            .route("/orders", web::post().to(orders::create_order))
            .route("/user/orders", web::get().to(orders::list_user_orders))
            .service(
                web::scope("/admin")
                    .route("/stats", web::get().to(admin::stats))
                    .route("/session", web::get().to(admin::session))
                    .service(
                        web::resource("/products")
                            .route(web::get().to(products::list_admin_products))
                            .route(web::post().to(products::create_product)),
                    )
                    .service(
                        web::resource("/products/{id}")
                            .route(web::get().to(products::get_admin_product))
                            .route(web::put().to(products::update_product))
                            .route(web::delete().to(products::delete_product)),
                    )
                    .route("/orders", web::get().to(orders::list_orders))
                    .service(
                        web::resource("/orders/{id}")
                            .route(web::get().to(orders::get_order))
                            .route(web::put().to(orders::update_order_status))
                            .route(web::patch().to(orders::update_order_status)),
                    ),
            ),
    )
    .service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}
