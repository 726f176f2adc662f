//! Token issuance, password hashing, and the single authorization gate used
//! by every protected route.

pub mod error;
pub mod gate;
pub mod password;
pub mod token;

pub use error::AuthError;
pub use gate::{AuthGate, Credentials, Principal};
