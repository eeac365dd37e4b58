//! Inventory Endpoints
//!
//! Validates payloads, enforces the per-route role requirement, and maps
//! store outcomes 1:1 onto the HTTP contract. The auth gate runs as a
//! route layer; the admin gate is the `AdminIdentity` extractor.

use crate::auth::AdminIdentity;
use crate::error::{ApiError, AppJson, AppPath, FieldError};
use crate::inventory::models::{
    CreateSweetRequest, PurchaseRequest, RestockRequest, SearchFilter, Sweet, UpdateSweetRequest,
};
use crate::inventory::store::PurchaseOutcome;
use crate::server::AppState;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::info;

/// POST /api/sweets (auth required)
pub async fn create_sweet(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateSweetRequest>,
) -> Result<(StatusCode, Json<Sweet>), ApiError> {
    let new = payload.validate().map_err(ApiError::Validation)?;
    let sweet = state.sweets.create(&new)?;

    info!("Created sweet {} ({})", sweet.name, sweet.id);
    Ok((StatusCode::CREATED, Json(sweet)))
}

/// GET /api/sweets (auth required)
pub async fn list_sweets(State(state): State<AppState>) -> Result<Json<Vec<Sweet>>, ApiError> {
    Ok(Json(state.sweets.list()?))
}

/// GET /api/sweets/search (auth required)
pub async fn search_sweets(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Sweet>>, ApiError> {
    let filter = SearchFilter::from_query(&params).map_err(ApiError::Validation)?;
    Ok(Json(state.sweets.search(&filter)?))
}

/// GET /api/sweets/:id (auth required)
pub async fn get_sweet(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Sweet>, ApiError> {
    state
        .sweets
        .get(id)?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// PUT /api/sweets/:id (auth required, partial body)
pub async fn update_sweet(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<UpdateSweetRequest>,
) -> Result<Json<Sweet>, ApiError> {
    let patch = payload.validate().map_err(ApiError::Validation)?;
    state
        .sweets
        .update(id, &patch)?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// DELETE /api/sweets/:id (admin required)
pub async fn delete_sweet(
    AdminIdentity(identity): AdminIdentity,
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Value>, ApiError> {
    if !state.sweets.delete(id)? {
        return Err(ApiError::NotFound);
    }

    info!("Sweet {} deleted by {}", id, identity.username);
    Ok(Json(json!({ "message": "Deleted" })))
}

/// POST /api/sweets/:id/purchase (auth required)
pub async fn purchase_sweet(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let qty = parse_purchase_qty(&body)?;

    match state.sweets.purchase(id, qty)? {
        PurchaseOutcome::Purchased(sweet) => {
            info!("Purchased {}x sweet {}", qty, id);
            Ok(Json(json!({ "message": "Purchased", "sweet": sweet })))
        }
        PurchaseOutcome::NotFound => Err(ApiError::NotFound),
        PurchaseOutcome::InsufficientStock => Err(ApiError::InsufficientStock),
    }
}

/// POST /api/sweets/:id/restock (admin required)
pub async fn restock_sweet(
    AdminIdentity(identity): AdminIdentity,
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<RestockRequest>,
) -> Result<Json<Value>, ApiError> {
    let qty = match payload.qty {
        Some(q) if q >= 1 => q,
        _ => {
            return Err(ApiError::Validation(vec![FieldError::new(
                "qty",
                "qty must be integer >= 1",
            )]))
        }
    };

    let sweet = state.sweets.restock(id, qty)?.ok_or(ApiError::NotFound)?;

    info!("Sweet {} restocked by {} (+{})", id, identity.username, qty);
    Ok(Json(json!({ "message": "Restocked", "sweet": sweet })))
}

/// An empty body means qty 1; a present body must deserialize cleanly and
/// carry an integer qty >= 1 (or omit the field).
fn parse_purchase_qty(body: &[u8]) -> Result<i64, ApiError> {
    if body.is_empty() {
        return Ok(1);
    }

    let payload: PurchaseRequest = serde_json::from_slice(body).map_err(|err| {
        if err.is_data() {
            ApiError::Validation(vec![FieldError::new("qty", "qty must be integer >= 1")])
        } else {
            ApiError::BadRequest("Malformed JSON in request body")
        }
    })?;

    match payload.qty {
        None => Ok(1),
        Some(q) if q >= 1 => Ok(q),
        Some(_) => Err(ApiError::Validation(vec![FieldError::new(
            "qty",
            "qty must be integer >= 1",
        )])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purchase_qty_parsing() {
        assert_eq!(parse_purchase_qty(b"").unwrap(), 1);
        assert_eq!(parse_purchase_qty(b"{}").unwrap(), 1);
        assert_eq!(parse_purchase_qty(br#"{"qty": 4}"#).unwrap(), 4);

        assert!(matches!(
            parse_purchase_qty(br#"{"qty": 0}"#),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            parse_purchase_qty(br#"{"qty": "three"}"#),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            parse_purchase_qty(br#"{"qty": 1.5}"#),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            parse_purchase_qty(b"{not json"),
            Err(ApiError::BadRequest(_))
        ));
    }
}
