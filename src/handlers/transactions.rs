use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::errors::ServiceError;
use crate::queries::{
    transaction_queries::{SearchTransactionsQuery, TransactionSearchCondition},
    Query as LedgerQuery,
};
use crate::{ApiResponse, AppState, ListQuery, PaginatedResponse};

/// Create the transactions router
pub fn transactions_router() -> Router<AppState> {
    Router::new().route("/history", get(transaction_history))
}

/// Transaction history, newest first
#[utoipa::path(
    get,
    path = "/api/v1/transactions/history",
    params(TransactionSearchCondition, ListQuery),
    responses(
        (status = 200, description = "Transaction history page returned"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "transactions"
)]
pub async fn transaction_history(
    State(state): State<AppState>,
    Query(condition): Query<TransactionSearchCondition>,
    Query(pagination): Query<ListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let page = pagination.page.max(1);
    let limit = pagination.limit.clamp(1, 200);

    let (items, total) = SearchTransactionsQuery {
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
