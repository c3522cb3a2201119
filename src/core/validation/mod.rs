//! Input validation for mutation payloads
//!
//! Validators never raise: they report whether a value is acceptable and the
//! mutation handlers turn failures into user-facing error strings.

pub mod validators;

pub use validators::{
    MAX_CUSTOMER_NAME_LENGTH, MAX_EMAIL_LENGTH, MAX_PRODUCT_NAME_LENGTH, PHONE_PATTERN,
    STOCK_INCREMENT, STOCK_THRESHOLD, fits_length, is_low_stock, is_valid_email,
    is_valid_phone, validate_price, validate_stock, validate_total,
};
