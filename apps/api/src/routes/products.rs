//! Catalog CRUD.
//!
//! Bodies are read as loose JSON objects: prices and rates may arrive as
//! numbers or numeric strings, and updates touch only the keys present.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, put},
    Json, Router,
};
use kiosk_core::validation::{
    parse_gst_rate, parse_price, parse_stock, parse_text, validate_category, validate_product_name,
    validate_search_query,
};
use kiosk_core::ValidationError;
use kiosk_db::{NewProduct, ProductPatch};
use serde_json::{Map, Value};
use tracing::info;

use crate::auth::Principal;
use crate::dto::{OkResponse, ProductDto, ProductQuery};
use crate::error::ApiResult;
use crate::SharedState;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/{id}", put(update_product).delete(delete_product))
}

async fn list_products(
    State(state): State<SharedState>,
    _principal: Principal,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ProductDto>>> {
    let Query(query) = query?;
    let q = validate_search_query(query.q.as_deref().unwrap_or_default())?;

    let products = state.db.products().list(q.as_deref()).await?;
    Ok(Json(products.iter().map(ProductDto::from).collect()))
}

async fn create_product(
    State(state): State<SharedState>,
    _principal: Principal,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> ApiResult<Json<ProductDto>> {
    let Json(body) = payload?;
    let product = new_product(&body)?;

    let created = state.db.products().insert(&product).await?;
    info!(id = created.id, name = %created.name, "Product created");

    Ok(Json(ProductDto::from(&created)))
}

async fn update_product(
    State(state): State<SharedState>,
    _principal: Principal,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> ApiResult<Json<ProductDto>> {
    let Path(id) = id?;
    let Json(body) = payload?;
    let patch = product_patch(&body)?;

    let updated = state.db.products().update(id, &patch).await?;
    info!(id, "Product updated");

    Ok(Json(ProductDto::from(&updated)))
}

async fn delete_product(
    State(state): State<SharedState>,
    _principal: Principal,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<OkResponse>> {
    let Path(id) = id?;

    state.db.products().delete(id).await?;
    info!(id, "Product deleted");

    Ok(Json(OkResponse::ok()))
}

// =============================================================================
// Body Parsing
// =============================================================================

fn required<'a>(body: &'a Map<String, Value>, field: &str) -> Result<&'a Value, ValidationError> {
    body.get(field)
        .filter(|value| !value.is_null())
        .ok_or_else(|| ValidationError::Required {
            field: field.to_string(),
        })
}

fn required_text(body: &Map<String, Value>, field: &str) -> Result<String, ValidationError> {
    parse_text(field, required(body, field)?)?.ok_or_else(|| ValidationError::Required {
        field: field.to_string(),
    })
}

fn new_product(body: &Map<String, Value>) -> Result<NewProduct, ValidationError> {
    Ok(NewProduct {
        name: validate_product_name(&required_text(body, "name")?)?,
        category: validate_category(&required_text(body, "category")?)?,
        price: parse_price(required(body, "price")?)?,
        stock: body.get("stock").map(parse_stock).transpose()?.unwrap_or(0),
        gst_rate: body.get("gstRate").map(parse_gst_rate).transpose()?.flatten(),
    })
}

fn product_patch(body: &Map<String, Value>) -> Result<ProductPatch, ValidationError> {
    let text = |field: &str| -> Result<Option<String>, ValidationError> {
        body.get(field)
            .map(|value| parse_text(field, value))
            .transpose()
            .map(Option::flatten)
    };

    Ok(ProductPatch {
        name: text("name")?.as_deref().map(validate_product_name).transpose()?,
        category: text("category")?.as_deref().map(validate_category).transpose()?,
        price: body.get("price").map(parse_price).transpose()?,
        stock: body.get("stock").map(parse_stock).transpose()?,
        // Present but null or "" clears the override
        gst_rate: body.get("gstRate").map(parse_gst_rate).transpose()?,
    })
}
