use crate::application::account_service::AccountService;
use crate::application::catalog_service::CatalogService;
use crate::application::order_service::OrderService;
use crate::auth::AuthGate;
use crate::config::AuthConfig;
use crate::db::DbPool;
use crate::infrastructure::order_repo::DieselOrderRepository;
use crate::infrastructure::product_repo::DieselProductRepository;
use crate::infrastructure::user_repo::DieselUserRepository;

/// Services shared by every handler.
pub struct AppState {
    pub catalog: CatalogService<DieselProductRepository>,
    pub orders: OrderService<DieselOrderRepository, DieselProductRepository>,
    pub accounts: AccountService<DieselUserRepository>,
    pub gate: AuthGate,
}

impl AppState {
    pub fn new(pool: DbPool, auth: AuthConfig) -> Self {
        let products = DieselProductRepository::new(pool.clone());
        Self {
            catalog: CatalogService::new(products.clone()),
            orders: OrderService::new(DieselOrderRepository::new(pool.clone()), products),
            accounts: AccountService::new(DieselUserRepository::new(pool), auth.clone()),
            gate: AuthGate::new(auth),
        }
    }
}
