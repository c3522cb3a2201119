//! Reusable field validators
//!
//! These validators are shared by the mutation handlers and the storage
//! backends (which mirror the same rules as table constraints).

use crate::core::money;
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::LazyLock;
use validator::ValidateEmail;

/// Accepted phone formats: `+` followed by 1 to 15 digits, or `###-###-####`
pub const PHONE_PATTERN: &str = r"^(\+[0-9]{1,15}|[0-9]{3}-[0-9]{3}-[0-9]{4})$";

/// Products strictly below this stock level count as low stock
pub const STOCK_THRESHOLD: i32 = 10;

/// Units added to each low-stock product by a restock run
pub const STOCK_INCREMENT: i32 = 10;

/// Column widths, in characters
pub const MAX_CUSTOMER_NAME_LENGTH: usize = 100;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_PRODUCT_NAME_LENGTH: usize = 255;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PHONE_PATTERN).expect("phone pattern is a valid regex"));

/// Validator: phone number matches [`PHONE_PATTERN`]
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Validator: syntactically valid email address that fits its column
pub fn is_valid_email(email: &str) -> bool {
    fits_length(email, MAX_EMAIL_LENGTH) && email.to_string().validate_email()
}

/// Validator: price is strictly positive and fits the money column
pub fn validate_price(price: Decimal) -> Result<(), String> {
    if price <= Decimal::ZERO {
        Err("Price must be positive.".to_string())
    } else if price > money::max_amount() {
        Err(format!(
            "Price exceeds the maximum of {}.",
            money::max_amount()
        ))
    } else {
        Ok(())
    }
}

/// Validator: text fits a column of `max` characters
pub fn fits_length(value: &str, max: usize) -> bool {
    value.chars().count() <= max
}

/// Validator: an order total fits the money column
pub fn validate_total(total: Decimal) -> Result<(), String> {
    if total > money::max_amount() {
        Err(format!(
            "Order total exceeds the maximum of {}.",
            money::max_amount()
        ))
    } else {
        Ok(())
    }
}

/// Validator: stock, when given, is not negative
pub fn validate_stock(stock: Option<i32>) -> Result<(), String> {
    match stock {
        Some(stock) if stock < 0 => Err("Stock cannot be negative.".to_string()),
        _ => Ok(()),
    }
}

pub fn is_low_stock(stock: i32) -> bool {
    stock < STOCK_THRESHOLD
}
