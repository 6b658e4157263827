//! Shop owner profile.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};
use kiosk_core::validation::{coerce_number, parse_text};
use kiosk_core::TaxRate;
use kiosk_db::OwnerUpdate;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::auth::Principal;
use crate::dto::{OkResponse, OwnerDto};
use crate::error::ApiResult;
use crate::SharedState;

pub fn router() -> Router<SharedState> {
    Router::new().route("/owner", get(get_owner).put(update_owner))
}

async fn get_owner(State(state): State<SharedState>, _principal: Principal) -> ApiResult<Json<OwnerDto>> {
    let owner = state.db.owner().get(state.config.owner_default_gst).await?;
    Ok(Json(OwnerDto::from(&owner)))
}

/// Overwrites only the fields present in the body.
async fn update_owner(
    State(state): State<SharedState>,
    principal: Principal,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> ApiResult<Json<OkResponse>> {
    let Json(body) = payload?;
    let update = owner_update(&body)?;

    state
        .db
        .owner()
        .update(&update, state.config.owner_default_gst)
        .await?;

    info!(uid = principal.id, "Owner profile updated");
    Ok(Json(OkResponse::ok()))
}

fn owner_update(body: &Map<String, Value>) -> ApiResult<OwnerUpdate> {
    let text = |field: &str| -> ApiResult<Option<String>> {
        match body.get(field) {
            Some(value) => Ok(parse_text(field, value)?),
            None => Ok(None),
        }
    };

    // A rate that does not parse keeps the stored one
    let default_gst_rate = body.get("defaultGstRate").and_then(|value| {
        let rate = coerce_number(value).and_then(TaxRate::from_fraction);
        if rate.is_none() {
            debug!(?value, "Ignoring unparsable defaultGstRate");
        }
        rate
    });

    Ok(OwnerUpdate {
        shop_name: text("shopName")?,
        phone: text("phone")?,
        gst_number: text("gstNumber")?,
        default_gst_rate,
        upi_vpa: text("upiVpa")?,
    })
}
