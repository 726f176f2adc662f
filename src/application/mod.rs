pub mod account_service;
pub mod catalog_service;
pub mod order_service;
pub mod seed;

#[cfg(test)]
pub(crate) mod fakes;
