//! Checkout: sale creation, receipt reprint and UPI payment QR.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use kiosk_core::billing::OrderLine;
use kiosk_core::upi::build_upi_intent;
use kiosk_core::validation::{coerce_number, parse_price};
use kiosk_core::{Money, PaymentMode, ValidationError};
use kiosk_db::DbError;
use tracing::info;

use crate::auth::Principal;
use crate::dto::{ReceiptDto, SaleLineRequest, SaleRequest, UpiQrRequest, UpiQrResponse};
use crate::error::ApiResult;
use crate::{qr, SharedState};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/billing/sale", post(create_sale))
        .route("/billing/sale/{id}", get(get_sale))
        .route("/billing/upi-qr", post(upi_qr))
}

/// Records a sale atomically and returns the receipt.
async fn create_sale(
    State(state): State<SharedState>,
    principal: Principal,
    payload: Result<Json<SaleRequest>, JsonRejection>,
) -> ApiResult<Json<ReceiptDto>> {
    let Json(request) = payload?;

    let payment_mode = parse_payment_mode(request.payment_mode.as_deref())?;
    let lines = request
        .lines
        .iter()
        .map(order_line)
        .collect::<Result<Vec<_>, _>>()?;

    let today = Local::now().date_naive();
    let receipt = state
        .db
        .sales()
        .create_sale(&lines, payment_mode, today, state.config.owner_default_gst)
        .await?;

    info!(
        uid = principal.id,
        invoice = %receipt.sale.invoice_no,
        total = %receipt.sale.grand_total(),
        "Sale recorded"
    );

    Ok(Json(ReceiptDto::from(&receipt)))
}

async fn get_sale(
    State(state): State<SharedState>,
    _principal: Principal,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<ReceiptDto>> {
    let Path(id) = id?;

    let receipt = state
        .db
        .sales()
        .get_receipt(id)
        .await?
        .ok_or_else(|| DbError::not_found("Sale", id))?;

    Ok(Json(ReceiptDto::from(&receipt)))
}

/// Builds a UPI intent for the amount and renders it as a QR data URL.
async fn upi_qr(
    State(state): State<SharedState>,
    _principal: Principal,
    payload: Result<Json<UpiQrRequest>, JsonRejection>,
) -> ApiResult<Json<UpiQrResponse>> {
    let Json(request) = payload?;

    let owner = state.db.owner().get(state.config.owner_default_gst).await?;
    // Missing or non-numeric amounts fall through to the amount check
    let amount = coerce_number(&request.amount)
        .map(Money::from_decimal)
        .unwrap_or_default();

    let intent = build_upi_intent(&owner, amount, request.note.as_deref(), request.vpa.as_deref())?;
    let uri = intent.to_uri();
    let qr_data_url = qr::render_data_url(&uri)?;

    Ok(Json(UpiQrResponse {
        intent: uri,
        qr_data_url,
    }))
}

/// Absent or blank means cash.
fn parse_payment_mode(raw: Option<&str>) -> Result<PaymentMode, ValidationError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(mode) => mode.parse(),
        None => Ok(PaymentMode::default()),
    }
}

fn order_line(line: &SaleLineRequest) -> Result<OrderLine, ValidationError> {
    let order_line = OrderLine::new(line.product_id, line.qty);
    if line.price.is_null() {
        return Ok(order_line);
    }
    Ok(order_line.with_price(parse_price(&line.price)?))
}
