use crate::models::{OptimizeParams, OptimizeRequest};
use crate::server::SharedServerPaths;
use crate::services::leverage_optimizer;
use crate::services::OptimizeError;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info, instrument, warn};

fn error_response(err: &OptimizeError) -> Response {
    (
        err.status_code(),
        Json(serde_json::json!({ "error": err.to_string() })),
    )
        .into_response()
}

/// POST /optimize-leverage - optimal constant leverage for a ticker
///
/// Body: `{ "ticker": "BTC", "start_date": "2023-01-01", "end_date": "2024-06-19",
/// "lower_lev": 0, "upper_lev": 5, "fees": 0 }`; everything but `ticker` is optional.
#[instrument(skip(paths))]
pub async fn optimize_leverage_handler(
    State(paths): State<SharedServerPaths>,
    payload: Result<Json<OptimizeRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Malformed optimize request body");
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": rejection.body_text() })),
            )
                .into_response();
        }
    };

    let params = match OptimizeParams::try_from(request) {
        Ok(params) => params,
        Err(e) => {
            warn!(error = %e, "Rejected optimize request");
            return error_response(&e);
        }
    };

    match leverage_optimizer::run(&params, &paths.price_data_dir) {
        Ok(result) => {
            info!(
                ticker = %result.ticker,
                rows = result.prices.len(),
                k_max = result.k_max,
                "Leverage optimized"
            );
            Json(result).into_response()
        }
        Err(e) => {
            match &e {
                OptimizeError::Unexpected(_) => error!(ticker = %params.ticker, error = %e, "Optimization failed"),
                _ => warn!(ticker = %params.ticker, error = %e, "Optimization rejected"),
            }
            error_response(&e)
        }
    }
}

/// GET /optimize-leverage/reference-doc - the managed-volatility paper as a download
#[instrument(skip(paths))]
pub async fn reference_doc_handler(State(paths): State<SharedServerPaths>) -> Response {
    let path = &paths.reference_doc;

    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let filename = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("reference.pdf");
            (
                StatusCode::OK,
                [
                    (CONTENT_TYPE, "application/pdf".to_string()),
                    (CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", filename)),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to read reference document");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
