// Expense Tracker - Web Server
// JSON API over the same store and chart layout the terminal UI uses

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use expense_tracker::{
    layout, logging, store_from_config, AppConfig, CategoryTotal, ExpenseCategory, ExpenseRecord,
    ExpenseStore, LayoutConfig, NewExpense, StoreEvent,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

/// Shared application state
#[derive(Clone)]
struct AppState {
    store: Arc<Mutex<ExpenseStore>>,
    chart: LayoutConfig,
    recent_limit: usize,
}

impl AppState {
    /// All reads and writes go through this one lock
    fn store(&self) -> MutexGuard<'_, ExpenseStore> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    warn!(status = status.as_u16(), %message, "request rejected");
    let body: ApiResponse<()> = ApiResponse {
        success: false,
        data: None,
        error: Some(message),
    };
    (status, Json(body)).into_response()
}

#[derive(Deserialize)]
struct ExpenseQuery {
    category: Option<String>,
}

#[derive(Deserialize)]
struct RecentQuery {
    limit: Option<usize>,
}

#[derive(Deserialize)]
struct ChartQuery {
    width: f64,
    height: f64,
    /// Overrides both margins when given
    axis_reserve: Option<f64>,
}

#[derive(Serialize)]
struct TotalsResponse {
    total: f64,
    categories: Vec<CategoryTotal>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/expenses?category=Food - All expenses, optionally one category
async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<ExpenseQuery>,
) -> Response {
    let category = match query.category.as_deref().filter(|c| !c.eq_ignore_ascii_case("all")) {
        Some(name) => match name.parse::<ExpenseCategory>() {
            Ok(category) => Some(category),
            Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
        },
        None => None,
    };

    let store = state.store();
    let expenses: Vec<ExpenseRecord> = store.filtered_by(category).into_iter().cloned().collect();
    Json(ApiResponse::ok(expenses)).into_response()
}

/// GET /api/expenses/recent?limit=5 - Most recently added expenses
async fn recent_expenses(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(state.recent_limit);
    let expenses = state.store().recent(limit).to_vec();
    Json(ApiResponse::ok(expenses))
}

/// POST /api/expenses - Validate and add one expense
async fn add_expense(State(state): State<AppState>, Json(expense): Json<NewExpense>) -> Response {
    if let Err(e) = expense.validate() {
        return error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string());
    }

    let record = state.store().add(expense);
    (StatusCode::CREATED, Json(ApiResponse::ok(record))).into_response()
}

/// GET /api/totals - Grand total and per-category totals in display order
async fn totals(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store();
    Json(ApiResponse::ok(TotalsResponse {
        total: store.total_all(),
        categories: store.category_totals(),
    }))
}

/// GET /api/chart?width=400&height=200 - Bar chart geometry for a canvas
async fn chart(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> impl IntoResponse {
    let config = match query.axis_reserve {
        Some(reserve) => state.chart.clone().with_axis_reserve(reserve),
        None => state.chart.clone(),
    };

    // Snapshot the totals so layout runs without holding the lock
    let totals = state.store().category_totals();
    Json(ApiResponse::ok(layout(&totals, query.width, query.height, &config)))
}

fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/expenses", get(list_expenses).post(add_expense))
        .route("/expenses/recent", get(recent_expenses))
        .route("/totals", get(totals))
        .route("/chart", get(chart))
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
    logging::init("info")?;

    let config = AppConfig::load().context("Failed to load configuration")?;
    let addr = config.server.socket_addr()?;

    let mut store = store_from_config(&config);
    store.subscribe(|event| match event {
        StoreEvent::Added(record) => info!(
            id = %record.id,
            category = %record.category,
            amount = record.amount,
            "expense recorded"
        ),
    });
    info!(expenses = store.len(), "store ready");

    let state = AppState {
        store: Arc::new(Mutex::new(store)),
        chart: config.chart.clone(),
        recent_limit: config.recent_limit,
    };

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("API: http://{}/api/expenses", addr);

    axum::serve(listener, router(state))
        .await
        .context("Server stopped unexpectedly")
}

// ============================================================================
// TESTS
// ============================================================================
