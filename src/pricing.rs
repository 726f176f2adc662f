//! Cart and order totals.
//!
//! Pure arithmetic shared by the cart store and the order service so the
//! amount a shopper sees is the amount that gets persisted.

use bigdecimal::{BigDecimal, Zero};

/// Flat delivery charge applied to any non-empty order.
pub const DELIVERY_FEE: i32 = 40;

/// The only promo code the storefront recognises.
pub const PROMO_CODE: &str = "TIFFIN";

/// With the promo applied the order total is capped at this amount.
pub const PROMO_FIXED_TOTAL: i32 = 70;

/// Largest quantity of one product a single order or cart line may hold.
pub const MAX_QUANTITY: i32 = 999;

/// Money columns are `NUMERIC(10, 2)`.
const MAX_AMOUNT_CENTS: i64 = 9_999_999_999;
const MONEY_SCALE: i64 = 2;

/// Whether `value` fits a money column: non-negative, at most two decimal
/// places, and no larger than 99,999,999.99.
pub fn fits_money_column(value: &BigDecimal) -> bool {
    let (_, scale) = value.normalized().as_bigint_and_exponent();
    *value >= BigDecimal::zero()
        && scale <= MONEY_SCALE
        && *value <= BigDecimal::new(MAX_AMOUNT_CENTS.into(), MONEY_SCALE)
}

/// Anything with a captured unit price and a quantity.
pub trait Priced {
    fn unit_price(&self) -> &BigDecimal;
    fn quantity(&self) -> i32;
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub subtotal: BigDecimal,
    pub delivery_fee: BigDecimal,
    pub discount: BigDecimal,
    pub total: BigDecimal,
}

/// Returns the canonical promo code if `code` is recognised.
pub fn normalize_promo(code: &str) -> Option<&'static str> {
    code.trim()
        .eq_ignore_ascii_case(PROMO_CODE)
        .then_some(PROMO_CODE)
}

pub fn subtotal<P: Priced>(items: &[P]) -> BigDecimal {
    items.iter().fold(BigDecimal::zero(), |acc, item| {
        acc + item.unit_price() * BigDecimal::from(item.quantity())
    })
}

pub fn quote<P: Priced>(items: &[P], promo: Option<&str>) -> PriceQuote {
    let subtotal = subtotal(items);
    let delivery_fee = if subtotal > BigDecimal::zero() {
        BigDecimal::from(DELIVERY_FEE)
    } else {
        BigDecimal::zero()
    };

    let before_discount = &subtotal + &delivery_fee;
    let fixed_total = BigDecimal::from(PROMO_FIXED_TOTAL);
    let discount = match promo.and_then(normalize_promo) {
        Some(_) if before_discount > fixed_total => &before_discount - &fixed_total,
        _ => BigDecimal::zero(),
    };
    let total = before_discount - &discount;

    PriceQuote {
        subtotal,
        delivery_fee,
        discount,
        total,
    }
}
