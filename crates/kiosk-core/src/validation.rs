//! # Validation Module
//!
//! Input validation and coercion for Smart Kiosk.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (kiosk-api)                                     │
//! │  ├── JSON shape (serde)                                                │
//! │  └── THIS MODULE: coercion + business rule validation                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Billing (kiosk-core::billing)                                │
//! │  └── Stock, quantity and product existence per sale line               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (price_cents >= 0, stock >= 0)                              │
//! │  └── UNIQUE (users.phone, sales.invoice_no)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Coercion
//! The web client sends numbers either as JSON numbers or as numeric strings
//! (`"45.50"`). [`coerce_number`] accepts both; everything else is rejected
//! by the `parse_*` helpers.
//!
//! ## Usage
//! ```rust
//! use kiosk_core::validation::{parse_price, validate_product_name};
//! use serde_json::json;
//!
//! validate_product_name("Masala Chai").unwrap();
//! assert_eq!(parse_price(&json!("45.50")).unwrap().cents(), 4550);
//! ```

use serde_json::Value;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::TaxRate;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum product name length (characters).
pub const MAX_NAME_LEN: usize = 160;

/// Maximum category length (characters).
pub const MAX_CATEGORY_LEN: usize = 120;

/// Maximum search query length (characters).
pub const MAX_QUERY_LEN: usize = 100;

/// First float that no longer fits in `i64` (2^63).
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

// =============================================================================
// String Validators
// =============================================================================

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Validates a product name and returns it trimmed.
///
/// ## Example
/// ```rust
/// use kiosk_core::validation::validate_product_name;
///
/// assert_eq!(validate_product_name("  Parle-G 100g ").unwrap(), "Parle-G 100g");
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    validate_text("name", name, MAX_NAME_LEN)
}

/// Validates a product category and returns it trimmed.
pub fn validate_category(category: &str) -> ValidationResult<String> {
    validate_text("category", category, MAX_CATEGORY_LEN)
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns all products)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query, or `None` when it is empty.
pub fn validate_search_query(query: &str) -> ValidationResult<Option<String>> {
    let query = query.trim();

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "q".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    Ok((!query.is_empty()).then(|| query.to_string()))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale-line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "qty".to_string(),
        });
    }

    Ok(())
}

/// Validates a price in paise.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use kiosk_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock level.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > TaxRate::MAX_BPS {
        return Err(ValidationError::OutOfRange {
            field: "gstRate".to_string(),
            min: 0,
            max: TaxRate::MAX_BPS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Coercion
// =============================================================================

/// Reads a JSON number or a numeric string as `f64`.
///
/// Returns `None` for anything else, including non-finite strings like
/// `"NaN"` or `"inf"`.
///
/// ## Example
/// ```rust
/// use kiosk_core::validation::coerce_number;
/// use serde_json::json;
///
/// assert_eq!(coerce_number(&json!(45)), Some(45.0));
/// assert_eq!(coerce_number(&json!(" 0.18 ")), Some(0.18));
/// assert_eq!(coerce_number(&json!("abc")), None);
/// assert_eq!(coerce_number(&json!(null)), None);
/// ```
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    number.is_finite().then_some(number)
}

/// Parses a required, non-negative price from a JSON value.
pub fn parse_price(value: &Value) -> ValidationResult<Money> {
    let rupees = coerce_number(value).ok_or_else(|| ValidationError::InvalidFormat {
        field: "price".to_string(),
        reason: "must be a number".to_string(),
    })?;

    if (rupees * 100.0).round() >= I64_LIMIT {
        return Err(ValidationError::TooLarge {
            field: "price".to_string(),
        });
    }

    let price = Money::from_decimal(rupees);
    validate_price_cents(price.cents())?;
    Ok(price)
}

/// Parses a whole, non-negative stock count from a JSON value.
pub fn parse_stock(value: &Value) -> ValidationResult<i64> {
    let invalid = || ValidationError::InvalidFormat {
        field: "stock".to_string(),
        reason: "must be a whole number".to_string(),
    };

    let number = coerce_number(value).ok_or_else(invalid)?;
    if number.fract() != 0.0 {
        return Err(invalid());
    }
    if number >= I64_LIMIT {
        return Err(ValidationError::TooLarge {
            field: "stock".to_string(),
        });
    }

    let stock = number as i64;
    validate_stock(stock)?;
    Ok(stock)
}

/// Parses an optional GST rate given as a fraction.
///
/// `null` and empty strings mean "no override" and yield `None`.
///
/// ## Example
/// ```rust
/// use kiosk_core::validation::parse_gst_rate;
/// use serde_json::json;
///
/// assert_eq!(parse_gst_rate(&json!(0.05)).unwrap().map(|r| r.bps()), Some(500));
/// assert_eq!(parse_gst_rate(&json!("")).unwrap(), None);
/// assert!(parse_gst_rate(&json!(2)).is_err());
/// ```
pub fn parse_gst_rate(value: &Value) -> ValidationResult<Option<TaxRate>> {
    match value {
        Value::Null => return Ok(None),
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        _ => {}
    }

    let fraction = coerce_number(value).ok_or_else(|| ValidationError::InvalidFormat {
        field: "gstRate".to_string(),
        reason: "must be a number".to_string(),
    })?;

    TaxRate::from_fraction(fraction)
        .map(Some)
        .ok_or_else(|| ValidationError::OutOfRange {
            field: "gstRate".to_string(),
            min: 0,
            max: 1,
        })
}

/// Reads a JSON string field, treating `null` as absent.
pub fn parse_text(field: &str, value: &Value) -> ValidationResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a string".to_string(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
