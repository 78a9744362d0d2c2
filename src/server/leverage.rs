use crate::models::TokenVenue;
use crate::services::SharedTokenStore;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, instrument};

fn asset_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Asset not found" })),
    )
        .into_response()
}

/// GET /leverage/{venue}/asset/{asset} - price history of one leveraged token
///
/// Examples:
/// - /leverage/tlx/asset/ETH2L
/// - /leverage/toros/asset/OP:BTCBULL3X
#[instrument(skip(store))]
pub async fn get_asset_handler(
    State(store): State<SharedTokenStore>,
    Path((venue, asset)): Path<(String, String)>,
) -> Response {
    let venue = match TokenVenue::from_str(&venue) {
        Ok(venue) => venue,
        Err(e) => {
            debug!(error = %e, "Unknown leverage venue");
            return asset_not_found();
        }
    };

    match store.get_asset(venue, &asset).await {
        Some(data) => Json(data).into_response(),
        None => asset_not_found(),
    }
}

/// GET /leverage/last-updated - epoch millis of the last stored token asset
pub async fn last_updated_handler(State(store): State<SharedTokenStore>) -> Response {
    Json(serde_json::json!({ "lastUpdated": store.last_updated() })).into_response()
}
