//! # Domain Types
//!
//! Core domain types used throughout Smart Kiosk.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    SaleItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  sale_id (FK)   │       │
//! │  │  name/category  │   │  invoice_no     │   │  name snapshot  │       │
//! │  │  price_cents    │   │  date           │   │  price snapshot │       │
//! │  │  stock          │   │  totals         │   │  rate snapshot  │       │
//! │  │  gst_rate_bps?  │   │  payment_mode   │   │  qty            │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │  OwnerProfile   │   │  PaymentMode    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  single row     │   │  Cash           │       │
//! │  │  1800 = 18%     │   │  default GST    │   │  Upi            │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Records use SQLite integer ids. The human-facing sale identifier is the
//! invoice number, derived from the sale id (`INV-00042`).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::INVOICE_PREFIX;

// =============================================================================
// Tax Rate
// =============================================================================

/// GST rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% GST, 500 bps = 5% GST
///
/// Clients send rates as fractions (`0.18`); [`TaxRate::from_fraction`] is the
/// only place that conversion happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Highest accepted rate (100%).
    pub const MAX_BPS: u32 = 10_000;

    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a fraction (`0.18` → 1800 bps).
    ///
    /// Returns `None` for anything outside `0.0..=1.0` or non-finite input.
    ///
    /// ## Example
    /// ```rust
    /// use kiosk_core::types::TaxRate;
    ///
    /// assert_eq!(TaxRate::from_fraction(0.18).map(|r| r.bps()), Some(1800));
    /// assert_eq!(TaxRate::from_fraction(0.125).map(|r| r.bps()), Some(1250));
    /// assert!(TaxRate::from_fraction(1.5).is_none());
    /// assert!(TaxRate::from_fraction(-0.05).is_none());
    /// ```
    pub fn from_fraction(fraction: f64) -> Option<Self> {
        if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
            return None;
        }
        Some(TaxRate((fraction * 10_000.0).round() as u32))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a fraction for JSON responses (`0.18`).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }

    /// Whole-percent label used in exports (`"18%"`).
    ///
    /// Fractional percents round half to even, so 12.5% prints as `"12%"`.
    pub fn percent_label(&self) -> String {
        format!("{:.0}%", self.0 as f64 / 100.0)
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// User
// =============================================================================

/// A login account. Only the owner role exists today.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,

    /// Login identifier. Unique.
    pub phone: String,

    /// Argon2 PHC string. Never leaves the server.
    pub password_hash: String,

    pub role: String,
}

// =============================================================================
// Owner Profile
// =============================================================================

/// The single shop profile: display name, GST registration, default rate and
/// the UPI address payments are collected on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OwnerProfile {
    pub shop_name: String,
    pub phone: String,
    pub gst_number: String,
    /// Fallback rate for products without their own rate.
    pub default_gst_rate_bps: u32,
    /// UPI virtual payment address (`shop@upi`). Empty when not configured.
    pub upi_vpa: String,
}

impl OwnerProfile {
    /// An empty profile carrying only the configured default rate.
    pub fn with_default_rate(rate: TaxRate) -> Self {
        Self {
            shop_name: String::new(),
            phone: String::new(),
            gst_number: String::new(),
            default_gst_rate_bps: rate.bps(),
            upi_vpa: String::new(),
        }
    }

    #[inline]
    pub fn default_gst_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.default_gst_rate_bps)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Display name shown on the bill.
    pub name: String,

    /// Free-form grouping ("Snacks", "Beverages").
    pub category: String,

    /// Unit price in paise.
    pub price_cents: i64,

    /// Units on hand. Never negative.
    pub stock: i64,

    /// Product-specific GST rate. `None` means the owner default applies.
    pub gst_rate_bps: Option<u32>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the product's own rate, if it carries one.
    #[inline]
    pub fn gst_rate(&self) -> Option<TaxRate> {
        self.gst_rate_bps.map(TaxRate::from_bps)
    }
}

// =============================================================================
// Payment Mode
// =============================================================================

/// How the customer settled the bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMode {
    #[default]
    Cash,
    Upi,
}

impl PaymentMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "CASH",
            PaymentMode::Upi => "UPI",
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive parse; surrounding whitespace is ignored.
impl FromStr for PaymentMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CASH" => Ok(PaymentMode::Cash),
            "UPI" => Ok(PaymentMode::Upi),
            _ => Err(ValidationError::NotAllowed {
                field: "paymentMode".to_string(),
                allowed: vec!["CASH".to_string(), "UPI".to_string()],
            }),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A committed sale. Totals are frozen at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    /// Local calendar date of the sale.
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub subtotal_cents: i64,
    pub gst_cents: i64,
    pub grand_total_cents: i64,
    pub payment_mode: PaymentMode,
    pub invoice_no: String,
}

impl Sale {
    /// Formats the invoice number for a sale id: `INV-` + five-digit
    /// zero-padded id. Ids beyond 99999 print in full.
    ///
    /// ## Example
    /// ```rust
    /// use kiosk_core::types::Sale;
    ///
    /// assert_eq!(Sale::invoice_number_for(7), "INV-00007");
    /// assert_eq!(Sale::invoice_number_for(123456), "INV-123456");
    /// ```
    pub fn invoice_number_for(id: i64) -> String {
        format!("{}{:05}", INVOICE_PREFIX, id)
    }

    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    #[inline]
    pub fn gst(&self) -> Money {
        Money::from_cents(self.gst_cents)
    }

    #[inline]
    pub fn grand_total(&self) -> Money {
        Money::from_cents(self.grand_total_cents)
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line of a sale.
/// Uses snapshot pattern to freeze product data at time of sale, so later
/// catalog edits or deletions never change history.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleItem {
    pub id: i64,
    pub sale_id: i64,
    /// Id of the product at sale time. The product may since be deleted.
    pub product_id: i64,
    /// Product name at time of sale (frozen).
    pub name: String,
    pub qty: i64,
    /// Unit price charged, in paise (frozen).
    pub price_cents: i64,
    /// Effective GST rate applied (frozen).
    pub gst_rate_bps: u32,
}

impl SaleItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    #[inline]
    pub fn gst_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.gst_rate_bps)
    }

    /// Line amount before tax (unit price × qty).
    pub fn subtotal(&self) -> Money {
        self.unit_price().multiply_quantity(self.qty)
    }

    /// Line amount including GST.
    pub fn total(&self) -> Money {
        let subtotal = self.subtotal();
        subtotal + subtotal.calculate_tax(self.gst_rate())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
