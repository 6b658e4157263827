//! Request and response bodies.
//!
//! Storage types keep money in paise and rates in basis points; the JSON
//! surface speaks decimal rupees and rate fractions in camelCase.

use kiosk_core::report::{Aggregate, SalesSummary, TrendPoint};
use kiosk_core::{OwnerProfile, PaymentMode, Product, SaleItem};
use kiosk_db::SaleReceipt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::Principal;

// =============================================================================
// Auth
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub phone: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: Principal,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub const fn ok() -> Self {
        OkResponse { ok: true }
    }
}

// =============================================================================
// Owner
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerDto {
    pub shop_name: String,
    pub phone: String,
    pub gst_number: String,
    pub default_gst_rate: f64,
    pub upi_vpa: String,
}

impl From<&OwnerProfile> for OwnerDto {
    fn from(owner: &OwnerProfile) -> Self {
        OwnerDto {
            shop_name: owner.shop_name.clone(),
            phone: owner.phone.clone(),
            gst_number: owner.gst_number.clone(),
            default_gst_rate: owner.default_gst_rate().fraction(),
            upi_vpa: owner.upi_vpa.clone(),
        }
    }
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: i64,
    /// `null` when the owner default applies.
    pub gst_rate: Option<f64>,
}

impl From<&Product> for ProductDto {
    fn from(product: &Product) -> Self {
        ProductDto {
            id: product.id,
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price().to_decimal(),
            stock: product.stock,
            gst_rate: product.gst_rate().map(|r| r.fraction()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProductQuery {
    pub q: Option<String>,
}

// =============================================================================
// Billing
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineRequest {
    pub product_id: i64,
    #[serde(default = "default_qty")]
    pub qty: i64,
    /// Unit price override, number or numeric string.
    #[serde(default)]
    pub price: Value,
}

fn default_qty() -> i64 {
    1
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaleRequest {
    pub lines: Vec<SaleLineRequest>,
    pub payment_mode: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsDto {
    pub sub_total: f64,
    pub gst: f64,
    pub grand_total: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemDto {
    pub product_id: i64,
    pub name: String,
    pub qty: i64,
    pub price: f64,
    pub gst_rate: f64,
    pub line_total: f64,
}

impl From<&SaleItem> for SaleItemDto {
    fn from(item: &SaleItem) -> Self {
        SaleItemDto {
            product_id: item.product_id,
            name: item.name.clone(),
            qty: item.qty,
            price: item.unit_price().to_decimal(),
            gst_rate: item.gst_rate().fraction(),
            line_total: item.total().to_decimal(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptDto {
    pub id: i64,
    pub invoice_no: String,
    /// ISO date, `YYYY-MM-DD`
    pub date: String,
    pub totals: TotalsDto,
    pub payment_mode: PaymentMode,
    pub items: Vec<SaleItemDto>,
}

impl From<&SaleReceipt> for ReceiptDto {
    fn from(receipt: &SaleReceipt) -> Self {
        let sale = &receipt.sale;
        ReceiptDto {
            id: sale.id,
            invoice_no: sale.invoice_no.clone(),
            date: sale.date.format("%Y-%m-%d").to_string(),
            totals: TotalsDto {
                sub_total: sale.subtotal().to_decimal(),
                gst: sale.gst().to_decimal(),
                grand_total: sale.grand_total().to_decimal(),
            },
            payment_mode: sale.payment_mode,
            items: receipt.items.iter().map(SaleItemDto::from).collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpiQrRequest {
    pub amount: Value,
    pub note: Option<String>,
    pub vpa: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpiQrResponse {
    pub intent: String,
    pub qr_data_url: String,
}

// =============================================================================
// Reports
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RangeQuery {
    pub range: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AggregateDto {
    pub total: f64,
    pub items: i64,
    pub gst: f64,
}

impl From<&Aggregate> for AggregateDto {
    fn from(aggregate: &Aggregate) -> Self {
        AggregateDto {
            total: aggregate.total.to_decimal(),
            items: aggregate.items,
            gst: aggregate.gst.to_decimal(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TrendPointDto {
    pub day: String,
    pub total: f64,
}

impl From<&TrendPoint> for TrendPointDto {
    fn from(point: &TrendPoint) -> Self {
        TrendPointDto {
            day: point.day.clone(),
            total: point.total.to_decimal(),
        }
    }
}

/// `{total, items, gst, trend, today}`; the headline figures are flattened
/// from the range aggregate.
#[derive(Debug, Serialize)]
pub struct SummaryDto {
    #[serde(flatten)]
    pub range: AggregateDto,
    pub trend: Vec<TrendPointDto>,
    pub today: AggregateDto,
}

impl From<&SalesSummary> for SummaryDto {
    fn from(summary: &SalesSummary) -> Self {
        SummaryDto {
            range: AggregateDto::from(&summary.range),
            trend: summary.trend.iter().map(TrendPointDto::from).collect(),
            today: AggregateDto::from(&summary.today),
        }
    }
}
