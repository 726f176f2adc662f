use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::errors::DomainError;
use crate::pricing::fits_money_column;

#[derive(Debug, Clone)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub offer_price: Option<BigDecimal>,
    pub category: String,
    pub image: String,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The price a customer pays for one unit: the offer price when one is
    /// set and positive, the list price otherwise.
    pub fn effective_price(&self) -> &BigDecimal {
        match &self.offer_price {
            Some(offer) if *offer > BigDecimal::zero() => offer,
            _ => &self.price,
        }
    }
}

/// A validated product body, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub offer_price: Option<BigDecimal>,
    pub category: String,
    pub image: String,
    pub in_stock: bool,
}

/// An amount as clients send it: either a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(serde_json::Number),
    Text(String),
}

impl RawAmount {
    fn is_blank(&self) -> bool {
        matches!(self, RawAmount::Text(s) if s.trim().is_empty())
    }

    /// `None` when the value is not a non-negative decimal.
    pub fn parse(&self) -> Option<BigDecimal> {
        let parsed = match self {
            RawAmount::Number(n) => BigDecimal::from_str(&n.to_string()).ok()?,
            RawAmount::Text(s) => BigDecimal::from_str(s.trim()).ok()?,
        };
        (parsed >= BigDecimal::zero()).then_some(parsed)
    }
}

/// Unvalidated create/update input for a product.
#[derive(Debug, Clone, Default)]
pub struct ProductDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<RawAmount>,
    pub offer_price: Option<RawAmount>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub in_stock: Option<bool>,
}

impl ProductDraft {
    /// Checks fields in a fixed order (name, description, price, category,
    /// image, then offer price) and reports the first one that is missing
    /// or malformed.
    pub fn validate(self) -> Result<NewProduct, DomainError> {
        let name = required_text(self.name, "name")?;
        let description = required_text(self.description, "description")?;
        let price = match self.price {
            Some(raw) if !raw.is_blank() => raw
                .parse()
                .filter(fits_money_column)
                .ok_or_else(|| DomainError::validation("Invalid field: price"))?,
            _ => return Err(DomainError::validation("Missing required field: price")),
        };
        let category = required_text(self.category, "category")?;
        let image = required_text(self.image, "image")?;

        // A zero or empty offer price means "no offer".
        let offer_price = match self.offer_price {
            Some(raw) if !raw.is_blank() => {
                let offer = raw
                    .parse()
                    .filter(fits_money_column)
                    .ok_or_else(|| DomainError::validation("Invalid field: offerPrice"))?;
                (!offer.is_zero()).then_some(offer)
            }
            _ => None,
        };

        Ok(NewProduct {
            name,
            description,
            price,
            offer_price,
            category,
            image,
            in_stock: self.in_stock.unwrap_or(true),
        })
    }
}

fn required_text(value: Option<String>, field: &str) -> Result<String, DomainError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(DomainError::validation(format!(
            "Missing required field: {field}"
        ))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductStats {
    pub total_products: i64,
    pub in_stock_products: i64,
    pub out_of_stock_products: i64,
}

/// Which slice of the catalog a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Admin,
}
