//! # UPI Payment Intents
//!
//! Builds the `upi://pay` URI that UPI apps open when a customer scans the
//! checkout QR code. Rendering the QR image is the API layer's job.
//!
//! ## Intent Layout
//! ```text
//! upi://pay?pa=shop%40upi&pn=My+Shop&am=100.50&cu=INR&tn=Order+INV-00007
//!           │             │          │         │      │
//!           │             │          │         │      └── note
//!           │             │          │         └── currency (always INR)
//!           │             │          └── amount, two decimals
//!           │             └── payee name (shop name)
//!           └── payee VPA
//! ```
//!
//! Parameters are form-urlencoded in exactly this order.

use std::fmt;

use url::form_urlencoded;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::OwnerProfile;
use crate::CURRENCY_CODE;

/// Note used when the caller does not supply one.
pub const DEFAULT_NOTE: &str = "Payment";

/// Payee name used when the shop has no name configured.
pub const DEFAULT_PAYEE_NAME: &str = "Shop";

/// A resolved payment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpiIntent {
    pub payee_vpa: String,
    pub payee_name: String,
    pub amount: Money,
    pub note: String,
}

impl UpiIntent {
    /// Renders the intent as a `upi://pay?...` URI.
    pub fn to_uri(&self) -> String {
        let amount = format!("{}.{:02}", self.amount.rupees(), self.amount.paise_part());
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("pa", &self.payee_vpa)
            .append_pair("pn", &self.payee_name)
            .append_pair("am", &amount)
            .append_pair("cu", CURRENCY_CODE)
            .append_pair("tn", &self.note)
            .finish();
        format!("upi://pay?{}", query)
    }
}

impl fmt::Display for UpiIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uri())
    }
}

/// Resolves payee, amount and note into a [`UpiIntent`].
///
/// The payee is the trimmed `vpa` argument when non-empty, otherwise the
/// owner's configured address.
///
/// ## Errors
/// - [`CoreError::PaymentAddressNotConfigured`] when no payee can be found
///   (checked first)
/// - [`CoreError::InvalidAmount`] when `amount` is not positive
///
/// ## Example
/// ```rust
/// use kiosk_core::money::Money;
/// use kiosk_core::types::{OwnerProfile, TaxRate};
/// use kiosk_core::upi::build_upi_intent;
///
/// let mut owner = OwnerProfile::with_default_rate(TaxRate::from_bps(1800));
/// owner.shop_name = "My Shop".to_string();
/// owner.upi_vpa = "shop@upi".to_string();
///
/// let intent = build_upi_intent(&owner, Money::from_cents(10050), Some("Order INV-00007"), None).unwrap();
/// assert_eq!(
///     intent.to_uri(),
///     "upi://pay?pa=shop%40upi&pn=My+Shop&am=100.50&cu=INR&tn=Order+INV-00007"
/// );
/// ```
pub fn build_upi_intent(
    owner: &OwnerProfile,
    amount: Money,
    note: Option<&str>,
    vpa: Option<&str>,
) -> CoreResult<UpiIntent> {
    let payee_vpa = vpa
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| Some(owner.upi_vpa.trim()).filter(|v| !v.is_empty()))
        .ok_or(CoreError::PaymentAddressNotConfigured)?;

    if !amount.is_positive() {
        return Err(CoreError::InvalidAmount);
    }

    let shop_name = owner.shop_name.trim();
    let payee_name = if shop_name.is_empty() {
        DEFAULT_PAYEE_NAME
    } else {
        shop_name
    };

    let note = note.filter(|n| !n.is_empty()).unwrap_or(DEFAULT_NOTE);

    Ok(UpiIntent {
        payee_vpa: payee_vpa.to_string(),
        payee_name: payee_name.to_string(),
        amount,
        note: note.to_string(),
    })
}
