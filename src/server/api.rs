use crate::models::{DateRange, DateRangeQuery};
use crate::server::AppState;
use crate::services::{HealthStats, SharedHealthStats, SharedIndicatorStore};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

/// GET /indicator-aggregate - mean z-score of all indicators per date
///
/// Examples:
/// - /indicator-aggregate
/// - /indicator-aggregate?startDate=2024-01-01&endDate=2024-06-30
#[instrument(skip(store))]
pub async fn get_aggregate_handler(
    State(store): State<SharedIndicatorStore>,
    Query(query): Query<DateRangeQuery>,
) -> Response {
    let range = DateRange::from(query);
    let aggregate = store.get_aggregate(&range).await;
    debug!(dates = aggregate.len(), "Returning indicator aggregate");
    Json(aggregate).into_response()
}

/// GET /indicator/{name} - one stored indicator, optionally date-filtered
#[instrument(skip(store))]
pub async fn get_indicator_handler(
    State(store): State<SharedIndicatorStore>,
    Path(name): Path<String>,
    Query(query): Query<DateRangeQuery>,
) -> Response {
    let range = DateRange::from(query);
    match store.get_indicator(&name, &range).await {
        Some(series) => Json(series).into_response(),
        None => {
            debug!(indicator = %name, "Indicator not found");
            (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": "Indicator not found" })),
            )
                .into_response()
        }
    }
}

/// GET /bitcoin-price - reference price line for the valuation chart
#[instrument(skip(store))]
pub async fn get_bitcoin_price_handler(
    State(store): State<SharedIndicatorStore>,
    Query(query): Query<DateRangeQuery>,
) -> Response {
    let range = DateRange::from(query);
    Json(store.get_bitcoin_price(&range).await).into_response()
}

/// GET /last-updated - epoch millis of the last refresh that stored data
pub async fn last_updated_handler(State(store): State<SharedIndicatorStore>) -> Response {
    Json(serde_json::json!({ "lastUpdated": store.last_updated() })).into_response()
}

/// GET /health - worker progress and store sizes
pub async fn health_handler(
    State(health_state): State<SharedHealthStats>,
    State(app_state): State<AppState>,
) -> Response {
    // Short timeout so a stuck writer never blocks health checks
    let health_snapshot =
        tokio::time::timeout(tokio::time::Duration::from_millis(100), health_state.read()).await;

    let mut health_stats = match health_snapshot {
        Ok(health) => health.clone(),
        Err(_) => {
            warn!("Health stats lock timeout, using defaults");
            HealthStats::default()
        }
    };

    health_stats.indicator_count = app_state.indicators.len().await;
    health_stats.uptime_secs = app_state.started_at.elapsed().as_secs();
    health_stats.current_system_time = Utc::now().to_rfc3339();

    info!(
        indicators = health_stats.indicator_count,
        indicator_iterations = health_stats.indicator_iteration_count,
        token_iterations = health_stats.token_iteration_count,
        "Returning health stats"
    );

    Json(health_stats).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IndicatorSeries, IndicatorSource};
    use crate::server::test_support::{app_state, body_json};

    fn query(start: Option<&str>, end: Option<&str>) -> Query<DateRangeQuery> {
        Query(DateRangeQuery {
            start_date: start.map(String::from),
            end_date: end.map(String::from),
        })
    }

    async fn seeded_store() -> SharedIndicatorStore {
        let state = app_state(std::env::temp_dir());
        let store = state.indicators.clone();
        store
            .replace(IndicatorSeries::new(
                "MVRV",
                IndicatorSource::ChainExposed,
                "https://chainexposed.com/XthMVRVShortTermHolderAddress.html",
                vec!["2024-01-01".into(), "2024-01-02".into(), "2024-01-03".into()],
                vec![1.0, 2.0, 3.0],
            ))
            .await;
        store
    }

    #[tokio::test]
    async fn test_indicator_found_and_filtered() {
        let store = seeded_store().await;
        let response = get_indicator_handler(
            State(store),
            Path("MVRV".to_string()),
            query(Some("2024-01-02"), None),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["name"], "MVRV");
        assert_eq!(body["source"], "ChainExposed");
        assert_eq!(body["dates"], serde_json::json!(["2024-01-02", "2024-01-03"]));
        assert_eq!(body["values"], serde_json::json!([2.0, 3.0]));
    }

    #[tokio::test]
    async fn test_indicator_not_found() {
        let store = seeded_store().await;
        let response =
            get_indicator_handler(State(store), Path("nonexistent".to_string()), query(None, None)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, serde_json::json!({ "error": "Indicator not found" }));
    }

    #[tokio::test]
    async fn test_aggregate_is_keyed_by_date() {
        let store = seeded_store().await;
        let response = get_aggregate_handler(State(store), query(None, Some("2024-01-02"))).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let object = body.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(object.contains_key("2024-01-01"));
        assert!(object.contains_key("2024-01-02"));
    }

    #[tokio::test]
    async fn test_aggregate_inverted_range_is_empty_object() {
        let store = seeded_store().await;
        let response =
            get_aggregate_handler(State(store), query(Some("2024-02-01"), Some("2024-01-01"))).await;
        assert_eq!(body_json(response).await, serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_bitcoin_price_before_first_fetch() {
        let store = seeded_store().await;
        let response = get_bitcoin_price_handler(State(store), query(None, None)).await;
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "dates": [], "values": [] })
        );
    }

    #[tokio::test]
    async fn test_last_updated() {
        let store = seeded_store().await;
        let expected = store.last_updated();
        let body = body_json(last_updated_handler(State(store)).await).await;
        assert_eq!(body["lastUpdated"], expected);
    }

    #[tokio::test]
    async fn test_health_reports_indicator_count() {
        let state = app_state(std::env::temp_dir());
        state
            .indicators
            .replace(IndicatorSeries::new(
                "index",
                IndicatorSource::WooCharts,
                "https://woocharts.com/bitcoin-macro-oscillator/",
                vec!["2024-01-01".into()],
                vec![0.5],
            ))
            .await;

        let response = health_handler(State(state.health_stats.clone()), State(state)).await;
        let body = body_json(response).await;
        assert_eq!(body["indicator_count"], 1);
        assert_eq!(body["indicator_iteration_count"], 0);
    }
}
