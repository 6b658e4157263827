//! Dashboard summary and sales exports.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Response,
    routing::get,
    Json, Router,
};
use chrono::Local;
use kiosk_core::report::{ExportRow, ReportRange};
use kiosk_core::ValidationError;
use tracing::debug;

use crate::auth::Principal;
use crate::dto::{RangeQuery, SummaryDto};
use crate::error::ApiResult;
use crate::export::{self, CSV_CONTENT_TYPE, XLSX_CONTENT_TYPE};
use crate::SharedState;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/reports/summary", get(summary))
        .route("/reports/csv", get(export_csv))
        .route("/reports/excel", get(export_excel))
}

fn parse_range(query: Result<Query<RangeQuery>, QueryRejection>) -> ApiResult<ReportRange> {
    let Query(query) = query?;
    let range: Result<ReportRange, ValidationError> = query.range.as_deref().unwrap_or_default().parse();
    Ok(range?)
}

async fn summary(
    State(state): State<SharedState>,
    _principal: Principal,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> ApiResult<Json<SummaryDto>> {
    let range = parse_range(query)?;
    let today = Local::now().date_naive();

    let summary = state.db.reports().summary(range, today).await?;
    Ok(Json(SummaryDto::from(&summary)))
}

async fn export_rows(state: &SharedState, range: ReportRange) -> ApiResult<Vec<ExportRow>> {
    let today = Local::now().date_naive();
    let lines = state.db.reports().export_lines(range, today).await?;

    debug!(%range, rows = lines.len(), "Exporting sales");
    Ok(lines.iter().map(ExportRow::from).collect())
}

async fn export_csv(
    State(state): State<SharedState>,
    _principal: Principal,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let range = parse_range(query)?;
    let rows = export_rows(&state, range).await?;

    let bytes = export::to_csv(&rows)?;
    Ok(export::attachment(bytes, CSV_CONTENT_TYPE, range, "csv"))
}

async fn export_excel(
    State(state): State<SharedState>,
    _principal: Principal,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let range = parse_range(query)?;
    let rows = export_rows(&state, range).await?;

    let bytes = export::to_xlsx(&rows)?;
    Ok(export::attachment(bytes, XLSX_CONTENT_TYPE, range, "xlsx"))
}
