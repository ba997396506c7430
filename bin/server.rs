// Reward Points - Web Server
// REST API with Axum over a read-only fixture

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use reward_points::{
    is_known_month, load_data, paginate, Fixture, PeriodError, RewardsConfig, RewardsEngine,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Shared application state
#[derive(Clone)]
struct AppState {
    fixture: Arc<Fixture>,
    config: Arc<RewardsConfig>,
    engine: Arc<RewardsEngine>,
}

impl AppState {
    fn new(fixture: Fixture, config: RewardsConfig) -> Self {
        let engine = RewardsEngine::with_sink(config.schedule.clone(), Default::default());
        Self {
            fixture: Arc::new(fixture),
            config: Arc::new(config),
            engine: Arc::new(engine),
        }
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Response {
        let body = Self {
            success: true,
            data: Some(data),
            error: None,
        };
        (StatusCode::OK, Json(body)).into_response()
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ApiResponse::<()> {
        success: false,
        data: None,
        error: Some(message.into()),
    };
    (status, Json(body)).into_response()
}

fn unknown_customer(customer_id: &str) -> Response {
    warn!(customer_id, "unknown customer");
    error_response(
        StatusCode::NOT_FOUND,
        format!("Customer not found: {}", customer_id),
    )
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct PeriodQuery {
    month: Option<String>,
    year: Option<i32>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> Response {
    ApiResponse::ok("OK")
}

/// GET /api/customers?page= - Customers with total points
async fn get_customers(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Response {
    info!(?query, "GET /api/customers");

    let summaries = state.fixture.customers_with_points(state.engine.schedule());
    ApiResponse::ok(paginate(
        &summaries,
        query.page.unwrap_or(1),
        state.config.customers_per_page,
    ))
}

/// GET /api/customers/:id - One customer with total points
async fn get_customer(State(state): State<AppState>, Path(customer_id): Path<String>) -> Response {
    match state
        .fixture
        .customer_summary(&customer_id, state.engine.schedule())
    {
        Some(summary) => ApiResponse::ok(summary),
        None => unknown_customer(&customer_id),
    }
}

/// GET /api/customers/:id/transactions?page= - Transactions with points
async fn get_customer_transactions(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    if state.fixture.customer(&customer_id).is_none() {
        return unknown_customer(&customer_id);
    }

    let transactions = state.fixture.transactions_for(&customer_id);
    let rewarded = state.engine.rewards_by_transaction(&transactions);
    ApiResponse::ok(paginate(
        &rewarded,
        query.page.unwrap_or(1),
        state.config.transactions_per_page,
    ))
}

/// GET /api/customers/:id/rewards?month=&year= - Full rewards report
async fn get_customer_rewards(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> Response {
    info!(customer_id = %customer_id, ?query, "GET /api/customers/:id/rewards");

    if state.fixture.customer(&customer_id).is_none() {
        return unknown_customer(&customer_id);
    }

    let period = match (query.month, query.year) {
        (None, None) => None,
        (month, year) => {
            let month = month.unwrap_or_else(|| state.config.default_month.clone());
            if !is_known_month(&month) {
                let err = PeriodError::UnknownMonth(month);
                warn!(error = %err, "rejected period");
                return error_response(StatusCode::BAD_REQUEST, err.to_string());
            }
            Some((month, year.unwrap_or(state.config.default_year)))
        }
    };

    let transactions = state.fixture.transactions_for(&customer_id);
    let report = state.engine.report(
        &transactions,
        period.as_ref().map(|(month, year)| (month.as_str(), *year)),
    );
    ApiResponse::ok(report)
}

/// GET /api/customers/:id/statistics - Spending statistics
async fn get_customer_statistics(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Response {
    match state.fixture.customer_statistics(&customer_id) {
        Some(stats) => ApiResponse::ok(stats),
        None => unknown_customer(&customer_id),
    }
}

#[derive(Serialize)]
struct PointsResponse {
    amount: Decimal,
    points: Decimal,
}

/// GET /api/points/:amount - Points for a single amount
async fn get_points(State(state): State<AppState>, Path(amount): Path<String>) -> Response {
    match amount.parse::<Decimal>() {
        Ok(amount) => ApiResponse::ok(PointsResponse {
            amount,
            points: state.engine.calculate_rewards(amount),
        }),
        Err(_) => error_response(
            StatusCode::BAD_REQUEST,
            format!("Invalid amount: {}", amount),
        ),
    }
}

fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/customers", get(get_customers))
        .route("/customers/:id", get(get_customer))
        .route("/customers/:id/transactions", get(get_customer_transactions))
        .route("/customers/:id/rewards", get(get_customer_rewards))
        .route("/customers/:id/statistics", get(get_customer_statistics))
        .route("/points/:amount", get(get_points))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Optional config file as the only argument
    let config = match std::env::args().nth(1) {
        Some(path) => RewardsConfig::from_file(path)?,
        None => RewardsConfig::default(),
    }
    .apply_env();

    let fixture = load_data(&config.fixture_path)?;
    info!(
        path = ?config.fixture_path,
        customers = fixture.customers.len(),
        transactions = fixture.transactions.len(),
        "fixture loaded"
    );

    let addr = config.server_addr.clone();
    let app = build_router(AppState::new(fixture, config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(%addr, "🚀 server running");

    axum::serve(listener, app)
        .await
        .context("Failed to start server")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use serde_json::Value;
    use tower::util::ServiceExt; // for `oneshot`

    const FIXTURE: &str = r#"{
        "customers": [
            { "id": "C1", "name": "Alice Johnson" },
            { "id": "C2", "name": "Bob Smith" }
        ],
        "transactions": [
            { "id": "T1", "customerId": "C1", "amount": 120, "date": "2024-09-05" },
            { "id": "T2", "customerId": "C1", "amount": 75, "date": "2024-10-11" },
            { "id": "T3", "customerId": "C1", "amount": 200, "date": "2024-10-20" },
            { "id": "T4", "customerId": "C2", "amount": 40, "date": "2024-10-01" }
        ]
    }"#;

    fn test_app() -> Router {
        let fixture: Fixture = serde_json::from_str(FIXTURE).unwrap();
        build_router(AppState::new(fixture, RewardsConfig::default()))
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, json) = get_json("/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], "OK");
    }

    #[tokio::test]
    async fn test_customers_listing() {
        let (status, json) = get_json("/api/customers?page=1").await;
        assert_eq!(status, StatusCode::OK);

        let items = json["data"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["id"], "C1");
        // 90 + 25 + 250
        assert_eq!(items[0]["totalPoints"].as_f64(), Some(365.0));
        assert_eq!(items[1]["totalPoints"].as_f64(), Some(0.0));
        assert_eq!(json["data"]["totalPages"], 1);
    }

    #[tokio::test]
    async fn test_unknown_customer_is_404() {
        for uri in [
            "/api/customers/C9",
            "/api/customers/C9/transactions",
            "/api/customers/C9/rewards",
            "/api/customers/C9/statistics",
        ] {
            let (status, json) = get_json(uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
            assert_eq!(json["success"], false);
            assert!(json["error"].as_str().unwrap().contains("C9"));
        }
    }

    #[tokio::test]
    async fn test_rewards_for_period() {
        let (status, json) = get_json("/api/customers/C1/rewards?month=October&year=2024").await;
        assert_eq!(status, StatusCode::OK);

        let report = &json["data"];
        assert_eq!(report["totalRewards"].as_f64(), Some(365.0));
        assert_eq!(report["filteredTransactionCount"], 2);
        assert_eq!(report["rewardsByMonth"].as_array().unwrap().len(), 2);
        assert_eq!(report["rewardsByMonth"][0]["monthKey"], "2024-09");
    }

    #[tokio::test]
    async fn test_rewards_unknown_month_is_400() {
        let (status, json) = get_json("/api/customers/C1/rewards?month=Smarch&year=2024").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("Smarch"));
    }

    #[tokio::test]
    async fn test_transactions_and_statistics() {
        let (status, json) = get_json("/api/customers/C1/transactions").await;
        assert_eq!(status, StatusCode::OK);
        let items = json["data"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["id"], "T1");
        assert_eq!(items[0]["points"].as_f64(), Some(90.0));

        let (status, json) = get_json("/api/customers/C1/statistics").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["totalTransactions"], 3);
        assert_eq!(json["data"]["maxTransaction"].as_f64(), Some(200.0));
    }

    #[tokio::test]
    async fn test_points_endpoint() {
        let (status, json) = get_json("/api/points/120").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["points"].as_f64(), Some(90.0));

        let (status, _) = get_json("/api/points/lots").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // Largest representable amount saturates instead of failing
        let (status, json) = get_json("/api/points/79228162514264337593543950335").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["data"]["points"].as_f64().unwrap() > 0.0);
    }
}
