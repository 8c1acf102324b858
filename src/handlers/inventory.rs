use axum::{
    extract::{Json, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::entities::stock_transaction;
use crate::errors::ServiceError;
use crate::handlers::user_id_from_headers;
use crate::queries::{
    inventory_queries::{GetPositionQuery, InventorySearchCondition, SearchInventoryQuery},
    Query as LedgerQuery,
};
use crate::services::{adjustment::AdjustmentCommand, movement::MovementCommand};
use crate::{ApiResponse, AppState, ListQuery, PaginatedResponse};

/// Bin-to-bin movement request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MovementRequest {
    pub item_id: i64,
    #[validate(length(min = 1))]
    pub from_bin_code: String,
    #[validate(length(min = 1))]
    pub to_bin_code: String,
    /// Quantity to transfer; must be positive
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub notes: Option<String>,
}

/// Quantity adjustment request for one inventory position.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdjustmentRequest {
    pub inventory_id: i64,
    /// Signed delta; must be non-zero
    pub adjustment_quantity: i32,
    /// Reason for the correction; required
    #[validate(length(min = 1))]
    pub notes: String,
}

/// Ledger transaction as returned to API clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionResponse {
    pub id: i64,
    pub transaction_type: String,
    pub item_id: i64,
    pub from_bin_location_id: Option<i64>,
    pub to_bin_location_id: Option<i64>,
    pub quantity: i32,
    pub occurred_at: DateTime<Utc>,
    pub user_id: i64,
    pub notes: Option<String>,
}

impl From<stock_transaction::Model> for TransactionResponse {
    fn from(model: stock_transaction::Model) -> Self {
        Self {
            id: model.id,
            transaction_type: model.transaction_type,
            item_id: model.item_id,
            from_bin_location_id: model.from_bin_location_id,
            to_bin_location_id: model.to_bin_location_id,
            quantity: model.quantity,
            occurred_at: model.occurred_at,
            user_id: model.user_id,
            notes: model.notes,
        }
    }
}

/// Create the inventory router
pub fn inventory_router() -> Router<AppState> {
    Router::new()
        .route("/status", get(inventory_status))
        .route("/move", post(move_inventory))
        .route("/adjust", post(adjust_inventory))
        .route("/positions/:item_id/:bin_code", get(get_position))
}

/// Inventory summary: positions joined with item and bin attributes
#[utoipa::path(
    get,
    path = "/api/v1/inventory/status",
    params(InventorySearchCondition, ListQuery),
    responses(
        (status = 200, description = "Inventory summary page returned"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn inventory_status(
    State(state): State<AppState>,
    Query(condition): Query<InventorySearchCondition>,
    Query(pagination): Query<ListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let page = pagination.page.max(1);
    let limit = pagination.limit.clamp(1, 200);

    let (items, total) = SearchInventoryQuery {
        condition,
        page,
        limit,
    }
    .execute(&state.db)
    .await?;

    let response = PaginatedResponse {
        total_pages: total.div_ceil(limit),
        items,
        total,
        page,
        limit,
    };

    Ok((StatusCode::OK, Json(ApiResponse::success(response))))
}

/// Current position for an item in a bin; quantity 0 if never stocked
#[utoipa::path(
    get,
    path = "/api/v1/inventory/positions/{item_id}/{bin_code}",
    params(
        ("item_id" = i64, Path, description = "Item id"),
        ("bin_code" = String, Path, description = "Bin code")
    ),
    responses(
        (status = 200, description = "Position returned", body = crate::queries::inventory_queries::PositionView),
        (status = 404, description = "Unknown item or bin", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn get_position(
    State(state): State<AppState>,
    Path((item_id, bin_code)): Path<(i64, String)>,
) -> Result<impl IntoResponse, ServiceError> {
    let view = GetPositionQuery { item_id, bin_code }.execute(&state.db).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(view))))
}

/// Move stock between two bins
#[utoipa::path(
    post,
    path = "/api/v1/inventory/move",
    request_body = MovementRequest,
    responses(
        (status = 201, description = "Movement recorded", body = TransactionResponse),
        (status = 400, description = "Invalid request or route", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown item, bin, or position", body = crate::errors::ErrorResponse),
        (status = 409, description = "Concurrent modification", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn move_inventory(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<MovementRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let user_id = user_id_from_headers(&headers)?;

    let record = state
        .movement_service
        .record_movement(
            MovementCommand {
                item_id: payload.item_id,
                from_bin_code: payload.from_bin_code,
                to_bin_code: payload.to_bin_code,
                quantity: payload.quantity,
                notes: payload.notes,
            },
            user_id,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(TransactionResponse::from(record))),
    ))
}

/// Adjust the quantity of one inventory position
#[utoipa::path(
    post,
    path = "/api/v1/inventory/adjust",
    request_body = AdjustmentRequest,
    responses(
        (status = 201, description = "Adjustment recorded", body = TransactionResponse),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown position", body = crate::errors::ErrorResponse),
        (status = 409, description = "Concurrent modification", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn adjust_inventory(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<AdjustmentRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let user_id = user_id_from_headers(&headers)?;

    let record = state
        .adjustment_service
        .record_adjustment(
            AdjustmentCommand {
                inventory_position_id: payload.inventory_id,
                adjustment_quantity: payload.adjustment_quantity,
                notes: payload.notes,
            },
            user_id,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(TransactionResponse::from(record))),
    ))
}
