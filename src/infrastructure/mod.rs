pub mod models;
pub mod order_repo;
pub mod product_repo;
pub mod user_repo;

#[cfg(test)]
pub(crate) mod test_db;

use crate::domain::errors::DomainError;

// Storage failures surface as internal errors; the handlers never echo them.
impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(format!("connection pool: {e}"))
    }
}
