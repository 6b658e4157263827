//! # Reporting
//!
//! Report ranges, dashboard summaries and the export row contract.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  kiosk-db                          kiosk-core (this module)            │
//! │                                                                         │
//! │  per-day SQL aggregate ──────────► summarize(days, range, today)       │
//! │  Vec<DailyTotals>                    │                                  │
//! │                                      ├── total/items/gst  (range)      │
//! │                                      ├── trend            (last 7 days)│
//! │                                      └── today            (today only) │
//! │                                                                         │
//! │  item rows in range ─────────────► ExportRow::from(&ExportLine)        │
//! │  Vec<ExportLine>                     (CSV / XLSX rendered in kiosk-api)│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `trend` and `today` ignore the requested range; only the headline
//! totals are filtered.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{PaymentMode, TaxRate};

/// Number of days shown in the dashboard trend (ending today).
pub const TREND_DAYS: i64 = 7;

/// Column headers of CSV and XLSX exports, in order.
pub const EXPORT_HEADERS: [&str; 8] = [
    "Invoice",
    "Date",
    "Item",
    "Qty",
    "Price",
    "GST%",
    "Line Total",
    "Payment",
];

// =============================================================================
// Report Range
// =============================================================================

/// Date window of a report, relative to today.
///
/// | Range   | Includes                        |
/// |---------|---------------------------------|
/// | daily   | date == today                   |
/// | weekly  | today − date ≤ 7 days           |
/// | monthly | today − date ≤ 31 days          |
/// | all     | everything                      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ReportRange {
    #[default]
    Daily,
    Weekly,
    Monthly,
    All,
}

impl ReportRange {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ReportRange::Daily => "daily",
            ReportRange::Weekly => "weekly",
            ReportRange::Monthly => "monthly",
            ReportRange::All => "all",
        }
    }

    /// Inclusive `(from, to)` bounds for SQL filtering. `None` means open.
    pub fn window(&self, today: NaiveDate) -> (Option<NaiveDate>, Option<NaiveDate>) {
        match self {
            ReportRange::Daily => (Some(today), Some(today)),
            ReportRange::Weekly => (Some(today - Duration::days(7)), None),
            ReportRange::Monthly => (Some(today - Duration::days(31)), None),
            ReportRange::All => (None, None),
        }
    }

    /// Whether a sale dated `date` falls in this range.
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        let (from, to) = self.window(today);
        from.map_or(true, |from| date >= from) && to.map_or(true, |to| date <= to)
    }
}

impl fmt::Display for ReportRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive; an empty string means the default (daily).
impl FromStr for ReportRange {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "daily" => Ok(ReportRange::Daily),
            "weekly" => Ok(ReportRange::Weekly),
            "monthly" => Ok(ReportRange::Monthly),
            "all" => Ok(ReportRange::All),
            _ => Err(ValidationError::NotAllowed {
                field: "range".to_string(),
                allowed: ["daily", "weekly", "monthly", "all"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            }),
        }
    }
}

// =============================================================================
// Summary
// =============================================================================

/// Sales aggregated for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub total_cents: i64,
    pub gst_cents: i64,
    /// Units sold (sum of item quantities).
    pub items: i64,
}

/// Revenue, units and GST over some set of days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aggregate {
    pub total: Money,
    pub items: i64,
    pub gst: Money,
}

impl Aggregate {
    fn add(&mut self, day: &DailyTotals) {
        self.total += Money::from_cents(day.total_cents);
        self.gst += Money::from_cents(day.gst_cents);
        self.items += day.items;
    }
}

/// One bar of the dashboard trend chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendPoint {
    /// Label like `"05 Mar"`.
    pub day: String,
    pub total: Money,
}

/// Dashboard summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesSummary {
    /// Totals for the requested range.
    pub range: Aggregate,
    /// The seven days ending today, oldest first.
    pub trend: Vec<TrendPoint>,
    /// Today only, whatever the range.
    pub today: Aggregate,
}

/// Builds the dashboard summary from per-day aggregates.
///
/// `days` may cover any period; rows outside the range simply do not count
/// towards the headline totals. Days without sales show up in the trend as
/// zero.
pub fn summarize(days: &[DailyTotals], range: ReportRange, today: NaiveDate) -> SalesSummary {
    let mut in_range = Aggregate::default();
    let mut today_totals = Aggregate::default();
    let mut by_date: HashMap<NaiveDate, Money> = HashMap::new();

    for day in days {
        if range.contains(day.date, today) {
            in_range.add(day);
        }
        if day.date == today {
            today_totals.add(day);
        }
        *by_date.entry(day.date).or_default() += Money::from_cents(day.total_cents);
    }

    let trend = (0..TREND_DAYS)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            TrendPoint {
                day: date.format("%d %b").to_string(),
                total: by_date.get(&date).copied().unwrap_or_default(),
            }
        })
        .collect();

    SalesSummary {
        range: in_range,
        trend,
        today: today_totals,
    }
}

// =============================================================================
// Export Rows
// =============================================================================

/// A sale item joined with its sale, as read for exports.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ExportLine {
    pub invoice_no: String,
    pub date: NaiveDate,
    pub name: String,
    pub qty: i64,
    pub price_cents: i64,
    pub gst_rate_bps: u32,
    pub payment_mode: PaymentMode,
}

impl ExportLine {
    /// Same arithmetic as the bill, so exports reconcile with receipts.
    fn line_total(&self) -> Money {
        let subtotal = Money::from_cents(self.price_cents).multiply_quantity(self.qty);
        subtotal + subtotal.calculate_tax(TaxRate::from_bps(self.gst_rate_bps))
    }
}

/// One export row. Serializes with the export column names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Invoice")]
    pub invoice: String,
    /// ISO date (`2024-03-05`).
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Item")]
    pub item: String,
    #[serde(rename = "Qty")]
    pub qty: i64,
    #[serde(rename = "Price")]
    pub price: f64,
    /// Whole percent with sign (`"18%"`).
    #[serde(rename = "GST%")]
    pub gst_percent: String,
    /// price × qty × (1 + rate), rounded to the paisa.
    #[serde(rename = "Line Total")]
    pub line_total: f64,
    #[serde(rename = "Payment")]
    pub payment: String,
}

impl From<&ExportLine> for ExportRow {
    fn from(line: &ExportLine) -> Self {
        ExportRow {
            invoice: line.invoice_no.clone(),
            date: line.date.format("%Y-%m-%d").to_string(),
            item: line.name.clone(),
            qty: line.qty,
            price: Money::from_cents(line.price_cents).to_decimal(),
            gst_percent: TaxRate::from_bps(line.gst_rate_bps).percent_label(),
            line_total: line.line_total().to_decimal(),
            payment: line.payment_mode.to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
