//! # kiosk-core: Pure Business Logic for Smart Kiosk
//!
//! This crate is the **heart** of the kiosk billing backend. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Smart Kiosk Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web Client (browser)                         │   │
//! │  │    Catalog ──► Billing ──► UPI QR ──► Reports                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP/JSON                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kiosk-api (axum handlers)                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kiosk-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  types  │ │  money  │ │ billing │ │   upi   │ │ report  │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kiosk-db (Database Layer)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (Product, Sale, SaleItem, OwnerProfile, User)
//! - [`money`] - Money type with integer arithmetic (paise)
//! - [`billing`] - Order pricing and tax-rate resolution
//! - [`upi`] - UPI payment intent construction
//! - [`report`] - Report ranges, summaries and the export row contract
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation and input coercion
//!
//! ## Example Usage
//!
//! ```rust
//! use kiosk_core::money::Money;
//! use kiosk_core::types::TaxRate;
//!
//! // 2 x ₹45.00 at 18% GST
//! let subtotal = Money::from_cents(4500).multiply_quantity(2);
//! let gst = subtotal.calculate_tax(TaxRate::from_bps(1800));
//!
//! assert_eq!(gst.cents(), 1620);
//! assert_eq!((subtotal + gst).to_string(), "₹106.20");
//! ```

pub mod billing;
pub mod error;
pub mod money;
pub mod report;
pub mod types;
pub mod upi;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency code used in payment intents.
pub const CURRENCY_CODE: &str = "INR";

/// Tax rate applied when nothing else is configured (18% GST).
pub const FALLBACK_GST_RATE: TaxRate = TaxRate::from_bps(1800);

/// Prefix of every invoice number (`INV-00042`).
pub const INVOICE_PREFIX: &str = "INV-";
