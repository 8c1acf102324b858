//! OpenAPI document and Swagger UI mount.

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::queries::{inventory_queries, transaction_queries};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::inventory::inventory_status,
        handlers::inventory::get_position,
        handlers::inventory::move_inventory,
        handlers::inventory::adjust_inventory,
        handlers::transactions::transaction_history,
    ),
    components(schemas(
        handlers::inventory::MovementRequest,
        handlers::inventory::AdjustmentRequest,
        handlers::inventory::TransactionResponse,
        inventory_queries::InventorySummaryRow,
        inventory_queries::PositionView,
        transaction_queries::TransactionHistoryRow,
        crate::entities::stock_transaction::TransactionType,
        crate::errors::ErrorResponse,
    )),
    tags(
        (name = "inventory", description = "Inventory positions, movements, and adjustments"),
        (name = "transactions", description = "Immutable transaction history")
    ),
    info(
        title = "stockledger-api",
        description = "Warehouse stock ledger: bin-level positions mutated by movements and adjustments, with an immutable audit trail"
    )
)]
pub struct ApiDoc;

/// Swagger UI router serving the generated document.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
