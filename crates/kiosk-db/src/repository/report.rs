//! # Report Repository
//!
//! SQL side of reporting: per-day aggregates for the dashboard and joined
//! item rows for exports. Range logic and trend building live in
//! `kiosk_core::report`.

use chrono::{Duration, NaiveDate};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use kiosk_core::report::{summarize, DailyTotals, ExportLine, ReportRange, SalesSummary, TREND_DAYS};

/// Repository for report queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Per-day revenue, GST and units sold, from `since` (inclusive) on.
    /// `None` reads every day.
    pub async fn daily_totals(&self, since: Option<NaiveDate>) -> DbResult<Vec<DailyTotals>> {
        let days = sqlx::query_as::<_, DailyTotals>(
            r#"
            SELECT s.date AS date,
                   SUM(s.grand_total_cents) AS total_cents,
                   SUM(s.gst_cents) AS gst_cents,
                   SUM(COALESCE(i.qty, 0)) AS items
            FROM sales s
            LEFT JOIN (
                SELECT sale_id, SUM(qty) AS qty
                FROM sale_items
                GROUP BY sale_id
            ) i ON i.sale_id = s.id
            WHERE ?1 IS NULL OR s.date >= ?1
            GROUP BY s.date
            ORDER BY s.date
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(days)
    }

    /// Dashboard summary for `range`, with the trend and today's figures.
    pub async fn summary(&self, range: ReportRange, today: NaiveDate) -> DbResult<SalesSummary> {
        // Read enough history for both the range and the trend window
        let trend_start = today - Duration::days(TREND_DAYS - 1);
        let since = range.window(today).0.map(|from| from.min(trend_start));

        debug!(%range, ?since, "Building sales summary");

        let days = self.daily_totals(since).await?;
        Ok(summarize(&days, range, today))
    }

    /// One row per sale item in `range`, ordered by sale then item.
    pub async fn export_lines(&self, range: ReportRange, today: NaiveDate) -> DbResult<Vec<ExportLine>> {
        let (from, to) = range.window(today);

        debug!(%range, ?from, ?to, "Reading export rows");

        let lines = sqlx::query_as::<_, ExportLine>(
            r#"
            SELECT s.invoice_no AS invoice_no,
                   s.date AS date,
                   i.name AS name,
                   i.qty AS qty,
                   i.price_cents AS price_cents,
                   i.gst_rate_bps AS gst_rate_bps,
                   s.payment_mode AS payment_mode
            FROM sale_items i
            JOIN sales s ON s.id = i.sale_id
            WHERE (?1 IS NULL OR s.date >= ?1)
              AND (?2 IS NULL OR s.date <= ?2)
            ORDER BY s.id, i.id
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }
}
