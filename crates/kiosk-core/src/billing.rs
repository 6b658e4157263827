//! # Billing Module
//!
//! Turns the lines of a bill into priced lines and sale totals.
//!
//! ## Pricing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        price_order()                                    │
//! │                                                                         │
//! │  OrderLine { product_id, qty, price? }                                  │
//! │       │                                                                 │
//! │       ├── product missing?        → ProductNotFound                     │
//! │       ├── qty <= 0?               → InvalidQuantity                     │
//! │       ├── stock < qty so far?     → InsufficientStock                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PricedLine (frozen snapshot)                                           │
//! │    unit price = override ?? catalog price                               │
//! │    rate       = product rate ?? owner default                           │
//! │    subtotal   = unit price × qty                                        │
//! │    tax        = subtotal × rate (half-up to the paisa)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BillTotals = Σ subtotal, Σ tax, Σ (subtotal + tax)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here touches storage. kiosk-db loads the referenced products
//! inside its write transaction, calls [`price_order`], then persists the
//! result and decrements stock before committing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Product, TaxRate};
use crate::validation::{validate_price_cents, validate_quantity};

// =============================================================================
// Inputs
// =============================================================================

/// One requested line of a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: i64,
    pub qty: i64,
    /// Unit price override. `None` charges the catalog price.
    pub price: Option<Money>,
}

impl OrderLine {
    /// A line charged at the catalog price.
    pub fn new(product_id: i64, qty: i64) -> Self {
        Self {
            product_id,
            qty,
            price: None,
        }
    }

    pub fn with_price(mut self, price: Money) -> Self {
        self.price = Some(price);
        self
    }
}

// =============================================================================
// Tax Rate Resolution
// =============================================================================

/// Picks the GST rate for a line: the product's own rate when it has one,
/// otherwise the owner's default.
///
/// ## Example
/// ```rust
/// use kiosk_core::billing::resolve_effective_rate;
/// use kiosk_core::types::TaxRate;
///
/// let owner = TaxRate::from_bps(1800);
/// assert_eq!(resolve_effective_rate(None, owner).bps(), 1800);
/// assert_eq!(resolve_effective_rate(Some(TaxRate::from_bps(500)), owner).bps(), 500);
/// // An explicit 0% is an override, not "unset"
/// assert_eq!(resolve_effective_rate(Some(TaxRate::zero()), owner).bps(), 0);
/// ```
#[inline]
pub fn resolve_effective_rate(product_rate: Option<TaxRate>, owner_default: TaxRate) -> TaxRate {
    product_rate.unwrap_or(owner_default)
}

// =============================================================================
// Priced Lines
// =============================================================================

/// A sale line with product data frozen at billing time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: i64,
    pub name: String,
    pub qty: i64,
    pub unit_price: Money,
    pub gst_rate: TaxRate,
}

impl PricedLine {
    /// Unit price × qty.
    pub fn subtotal(&self) -> Money {
        self.unit_price.multiply_quantity(self.qty)
    }

    /// GST on the line subtotal.
    pub fn tax(&self) -> Money {
        self.subtotal().calculate_tax(self.gst_rate)
    }

    pub fn total(&self) -> Money {
        self.subtotal() + self.tax()
    }
}

/// Sale-level sums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillTotals {
    pub subtotal: Money,
    pub gst: Money,
    pub grand_total: Money,
}

/// A fully priced bill, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedOrder {
    pub lines: Vec<PricedLine>,
    pub totals: BillTotals,
}

// =============================================================================
// Pricing
// =============================================================================

fn amount_too_large() -> CoreError {
    ValidationError::TooLarge {
        field: "amount".to_string(),
    }
    .into()
}

/// Validates and prices every line of a bill against a catalog snapshot.
///
/// `catalog` must contain every product the lines reference that exists.
/// Quantities of repeated product ids are summed before the stock check, so
/// two lines of 3 against a stock of 5 fail on the second line.
///
/// ## Errors
/// - [`CoreError::EmptyOrder`] if `lines` is empty
/// - [`CoreError::ProductNotFound`] for an unknown product id
/// - [`CoreError::InvalidQuantity`] for qty ≤ 0
/// - [`CoreError::InsufficientStock`] when stock cannot cover the request
/// - [`CoreError::Validation`] for a negative price override, or when a
///   line or bill total does not fit in `i64` paise
pub fn price_order(
    lines: &[OrderLine],
    catalog: &HashMap<i64, Product>,
    owner_default: TaxRate,
) -> CoreResult<PricedOrder> {
    if lines.is_empty() {
        return Err(CoreError::EmptyOrder);
    }

    let mut requested: HashMap<i64, i64> = HashMap::new();
    let mut priced = Vec::with_capacity(lines.len());
    let mut totals = BillTotals::default();

    for line in lines {
        let product = catalog
            .get(&line.product_id)
            .ok_or(CoreError::ProductNotFound(line.product_id))?;

        if validate_quantity(line.qty).is_err() {
            return Err(CoreError::InvalidQuantity {
                product_id: line.product_id,
                qty: line.qty,
            });
        }

        // An overflowing sum can never be covered by stock
        let total_requested = requested.entry(product.id).or_insert(0);
        let summed = total_requested.checked_add(line.qty);
        *total_requested = summed.unwrap_or(i64::MAX);
        if summed.is_none() || product.stock < *total_requested {
            return Err(CoreError::InsufficientStock {
                name: product.name.clone(),
                available: product.stock,
                requested: *total_requested,
            });
        }

        let unit_price = match line.price {
            Some(price) => {
                validate_price_cents(price.cents())?;
                price
            }
            None => product.price(),
        };

        let gst_rate = resolve_effective_rate(product.gst_rate(), owner_default);
        let subtotal = unit_price
            .checked_multiply_quantity(line.qty)
            .ok_or_else(amount_too_large)?;
        let tax = subtotal.calculate_tax(gst_rate);

        totals.subtotal = totals.subtotal.checked_add(subtotal).ok_or_else(amount_too_large)?;
        totals.gst = totals.gst.checked_add(tax).ok_or_else(amount_too_large)?;
        totals.grand_total = subtotal
            .checked_add(tax)
            .and_then(|line_total| totals.grand_total.checked_add(line_total))
            .ok_or_else(amount_too_large)?;

        priced.push(PricedLine {
            product_id: product.id,
            name: product.name.clone(),
            qty: line.qty,
            unit_price,
            gst_rate,
        });
    }

    Ok(PricedOrder {
        lines: priced,
        totals,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: i64, price_cents: i64, stock: i64, gst_rate_bps: Option<u32>) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            category: "General".to_string(),
            price_cents,
            stock,
            gst_rate_bps,
            created_at: Utc::now(),
        }
    }

    fn catalog(products: Vec<Product>) -> HashMap<i64, Product> {
        products.into_iter().map(|p| (p.id, p)).collect()
    }

    const OWNER_RATE: TaxRate = TaxRate::from_bps(1800);

    #[test]
    fn test_single_line_at_owner_rate() {
        let catalog = catalog(vec![product(1, 4500, 10, None)]);
        let order = price_order(&[OrderLine::new(1, 2)], &catalog, OWNER_RATE).unwrap();

        assert_eq!(order.totals.subtotal.cents(), 9000);
        assert_eq!(order.totals.gst.cents(), 1620);
        assert_eq!(order.totals.grand_total.cents(), 10620);
        assert_eq!(order.lines[0].gst_rate, OWNER_RATE);
        assert_eq!(order.lines[0].name, "Product 1");
    }

    #[test]
    fn test_product_rate_overrides_owner_default() {
        let catalog = catalog(vec![product(1, 1000, 5, Some(500)), product(2, 2000, 5, None)]);
        let order = price_order(
            &[OrderLine::new(1, 1), OrderLine::new(2, 1)],
            &catalog,
            OWNER_RATE,
        )
        .unwrap();

        assert_eq!(order.lines[0].tax().cents(), 50);
        assert_eq!(order.lines[1].tax().cents(), 360);
        assert_eq!(order.totals.gst.cents(), 410);
        assert_eq!(order.totals.grand_total.cents(), 3410);
    }

    #[test]
    fn test_price_override() {
        let catalog = catalog(vec![product(1, 1000, 5, Some(0))]);
        let line = OrderLine::new(1, 3).with_price(Money::from_cents(800));
        let order = price_order(&[line], &catalog, OWNER_RATE).unwrap();

        assert_eq!(order.lines[0].unit_price.cents(), 800);
        assert_eq!(order.totals.subtotal.cents(), 2400);
        assert!(order.totals.gst.is_zero());

        let negative = OrderLine::new(1, 1).with_price(Money::from_cents(-1));
        assert!(matches!(
            price_order(&[negative], &catalog, OWNER_RATE),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_order() {
        let catalog = catalog(vec![]);
        assert!(matches!(
            price_order(&[], &catalog, OWNER_RATE),
            Err(CoreError::EmptyOrder)
        ));
    }

    #[test]
    fn test_unknown_product() {
        let catalog = catalog(vec![product(1, 1000, 5, None)]);
        assert!(matches!(
            price_order(&[OrderLine::new(99, 1)], &catalog, OWNER_RATE),
            Err(CoreError::ProductNotFound(99))
        ));
    }

    #[test]
    fn test_invalid_quantity() {
        let catalog = catalog(vec![product(1, 1000, 5, None)]);
        assert!(matches!(
            price_order(&[OrderLine::new(1, 0)], &catalog, OWNER_RATE),
            Err(CoreError::InvalidQuantity { qty: 0, .. })
        ));
        assert!(matches!(
            price_order(&[OrderLine::new(1, -2)], &catalog, OWNER_RATE),
            Err(CoreError::InvalidQuantity { qty: -2, .. })
        ));
    }

    #[test]
    fn test_insufficient_stock() {
        let catalog = catalog(vec![product(1, 1000, 3, None)]);
        match price_order(&[OrderLine::new(1, 5)], &catalog, OWNER_RATE) {
            Err(CoreError::InsufficientStock {
                available,
                requested,
                ..
            }) => {
                assert_eq!(available, 3);
                assert_eq!(requested, 5);
            }
            other => panic!("expected InsufficientStock, got {:?}", other),
        }
    }

    #[test]
    fn test_repeated_product_quantities_are_summed() {
        let catalog = catalog(vec![product(1, 1000, 5, None)]);
        let lines = [OrderLine::new(1, 3), OrderLine::new(1, 3)];
        assert!(matches!(
            price_order(&lines, &catalog, OWNER_RATE),
            Err(CoreError::InsufficientStock { requested: 6, .. })
        ));

        let lines = [OrderLine::new(1, 2), OrderLine::new(1, 3)];
        let order = price_order(&lines, &catalog, OWNER_RATE).unwrap();
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.totals.subtotal.cents(), 5000);
    }

    #[test]
    fn test_totals_equal_sum_of_lines() {
        let catalog = catalog(vec![
            product(1, 333, 50, Some(1200)),
            product(2, 1999, 50, Some(2800)),
            product(3, 5, 50, None),
        ]);
        let lines = [OrderLine::new(1, 7), OrderLine::new(2, 3), OrderLine::new(3, 11)];
        let order = price_order(&lines, &catalog, OWNER_RATE).unwrap();

        let line_totals: Money = order.lines.iter().map(PricedLine::total).sum();
        assert_eq!(order.totals.grand_total, line_totals);
        assert_eq!(
            order.totals.grand_total,
            order.totals.subtotal + order.totals.gst
        );
        let subtotals: Money = order.lines.iter().map(PricedLine::subtotal).sum();
        let taxes: Money = order.lines.iter().map(PricedLine::tax).sum();
        assert_eq!(order.totals.subtotal, subtotals);
        assert_eq!(order.totals.gst, taxes);
    }

    #[test]
    fn test_oversized_line_is_rejected() {
        let catalog = catalog(vec![product(1, 100_000_000_000_000_000, 1000, None)]);
        let result = price_order(&[OrderLine::new(1, 100)], &catalog, OWNER_RATE);
        assert!(matches!(
            result,
            Err(CoreError::Validation(ValidationError::TooLarge { ref field })) if field == "amount"
        ));
    }

    #[test]
    fn test_oversized_bill_total_is_rejected() {
        // Each line fits on its own, the sum with tax does not
        let half = i64::MAX / 2;
        let catalog = catalog(vec![product(1, half, 5, Some(0)), product(2, half, 5, None)]);
        let lines = [OrderLine::new(1, 1), OrderLine::new(2, 1)];
        assert!(matches!(
            price_order(&lines, &catalog, OWNER_RATE),
            Err(CoreError::Validation(ValidationError::TooLarge { .. }))
        ));
    }

    #[test]
    fn test_overflowing_repeat_quantities_hit_stock_check() {
        let full = catalog(vec![product(1, 0, i64::MAX, None)]);
        let lines = [OrderLine::new(1, i64::MAX), OrderLine::new(1, 1)];
        assert!(matches!(
            price_order(&lines, &full, OWNER_RATE),
            Err(CoreError::InsufficientStock { requested: i64::MAX, .. })
        ));

        let nearly_full = catalog(vec![product(1, 0, i64::MAX - 1, None)]);
        let lines = [OrderLine::new(1, i64::MAX - 1), OrderLine::new(1, 5)];
        assert!(matches!(
            price_order(&lines, &nearly_full, OWNER_RATE),
            Err(CoreError::InsufficientStock { requested: i64::MAX, .. })
        ));
    }
}
