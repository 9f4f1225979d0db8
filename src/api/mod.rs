// HTTP API routes (robot state, inventory, item templates, server status).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Json, MatchedPath, Query, Request, State,
    },
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

use crate::dashboard::DASHBOARD_HTML;
use crate::db::{Database, ItemFilter, NewInventoryItem, RobotStateUpdate};
use crate::metrics;

/// Template listing size when no `limit` is given.
pub const DEFAULT_TEMPLATE_LIMIT: i64 = 100;

/// Name of the placeholder returned when no stored item matches.
pub const PLACEHOLDER_ITEM_NAME: &str = "Mystery Item";

// ── Request types ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LimitParams {
    #[serde(default, deserialize_with = "empty_limit_as_none")]
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct RandomItemParams {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub rarity: Option<String>,
}

impl From<RandomItemParams> for ItemFilter {
    fn from(p: RandomItemParams) -> Self {
        ItemFilter {
            category: p.category,
            rarity: p.rarity,
        }
    }
}

#[derive(Deserialize)]
pub struct TemplateListParams {
    #[serde(default, deserialize_with = "empty_limit_as_none")]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub category: Option<String>,
}

/// `?category=` is treated the same as leaving the parameter out.
fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

/// `?limit=` means no limit; anything else must be an integer.
fn empty_limit_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match empty_as_none(deserializer)? {
        Some(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("limit: invalid integer `{v}`"))),
        None => Ok(None),
    }
}

// ── Shared application state ─────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub started_at: Instant,
    pub request_count: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            started_at: Instant::now(),
            request_count: Arc::new(AtomicU64::new(0)),
        }
    }
}

// ── Error helpers ─────────────────────────────────────────────────────

fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn json_error(status: StatusCode, msg: &str) -> impl IntoResponse {
    (
        status,
        Json(json!({ "status": "error", "message": msg, "timestamp": now_timestamp() })),
    )
}

fn internal_error(e: sqlx::Error) -> impl IntoResponse {
    tracing::error!("Database error: {e}");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!("Handler panicked: {detail}");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}

/// Extractor failures (bad JSON, wrong content type, bad query string) get
/// the same envelope as every other error.
pub struct RejectedRequest(Response);

impl RejectedRequest {
    fn new(status: StatusCode, detail: String) -> Self {
        tracing::warn!("Rejected request: {detail}");
        RejectedRequest(json_error(status, &detail).into_response())
    }
}

impl IntoResponse for RejectedRequest {
    fn into_response(self) -> Response {
        self.0
    }
}

impl From<JsonRejection> for RejectedRequest {
    fn from(rejection: JsonRejection) -> Self {
        RejectedRequest::new(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for RejectedRequest {
    fn from(rejection: QueryRejection) -> Self {
        RejectedRequest::new(rejection.status(), rejection.body_text())
    }
}

async fn not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "Not found")
}

// ── Router ────────────────────────────────────────────────────────────

pub fn router(db: Arc<Database>) -> Router {
    router_with_state(AppState::new(db))
}

pub fn router_with_state(state: AppState) -> Router {
    Router::new()
        // Robot
        .route(
            "/api/robot/state",
            get(get_robot_state).post(update_robot_state),
        )
        // Inventory
        .route("/api/inventory/add", post(add_inventory_item))
        .route("/api/inventory/items", get(list_inventory_items))
        .route("/api/inventory/stats", get(inventory_stats))
        .route("/api/inventory/random", get(random_inventory_item))
        // Item templates
        .route("/api/item-templates", get(list_item_templates))
        .route("/api/random-item", get(random_item_template))
        // Server
        .route("/api/server/status", get(server_status))
        .route("/api/health", get(health_check))
        .route("/api/dashboard", get(dashboard))
        .route("/metrics", get(metrics_endpoint))
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Count, log and time every request.
async fn track_requests(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let request_number = state.request_count.fetch_add(1, Ordering::Relaxed) + 1;

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let elapsed = started.elapsed();
    metrics::record_request(&method, &endpoint, status, elapsed);
    tracing::info!(
        method = %method,
        path = %path,
        status,
        elapsed_ms = elapsed.as_millis() as u64,
        request_number,
        "request handled"
    );
    response
}

// ── Robot state handlers ──────────────────────────────────────────────

async fn update_robot_state(
    State(state): State<AppState>,
    payload: Result<Json<RobotStateUpdate>, JsonRejection>,
) -> Result<Response, RejectedRequest> {
    let Json(req) = payload?;
    Ok(match state.db.upsert_robot_state(&req).await {
        Ok(()) => {
            metrics::ROBOT_STATE_UPDATES_TOTAL.inc();
            (StatusCode::OK, Json(json!({ "status": "success" }))).into_response()
        }
        Err(e) => internal_error(e).into_response(),
    })
}

async fn get_robot_state(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.get_robot_state().await {
        Ok(Some(robot)) => (StatusCode::OK, Json(json!(robot))).into_response(),
        Ok(None) => (StatusCode::OK, Json(json!({ "status": "not_found" }))).into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

// ── Inventory handlers ────────────────────────────────────────────────

async fn add_inventory_item(
    State(state): State<AppState>,
    payload: Result<Json<NewInventoryItem>, JsonRejection>,
) -> Result<Response, RejectedRequest> {
    let Json(req) = payload?;
    Ok(match state.db.add_inventory_item(&req).await {
        Ok(id) => {
            metrics::INVENTORY_ITEMS_ADDED_TOTAL.inc();
            tracing::debug!(id, name = ?req.name, "inventory item added");
            (StatusCode::OK, Json(json!({ "status": "success", "id": id }))).into_response()
        }
        Err(e) => internal_error(e).into_response(),
    })
}

async fn list_inventory_items(
    State(state): State<AppState>,
    params: Result<Query<LimitParams>, QueryRejection>,
) -> Result<Response, RejectedRequest> {
    let Query(params) = params?;
    Ok(match state.db.list_inventory_items(params.limit).await {
        Ok(items) => (StatusCode::OK, Json(json!(items))).into_response(),
        Err(e) => internal_error(e).into_response(),
    })
}

async fn inventory_stats(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.inventory_stats().await {
        Ok(stats) => (StatusCode::OK, Json(json!(stats))).into_response(),
        Err(e) => internal_error(e).into_response(),
    }
}

/// The placeholder item returned when a random lookup finds nothing.
pub fn placeholder_item() -> Value {
    json!({
        "name": PLACEHOLDER_ITEM_NAME,
        "type": "unknown",
        "prefix": "Strange",
        "color": "#ff00ff",
        "symbol": "?",
        "rarity": "common",
        "description": "An item of unknown origin.",
        "category": "unknown",
    })
}

async fn random_inventory_item(
    State(state): State<AppState>,
    params: Result<Query<RandomItemParams>, QueryRejection>,
) -> Result<Response, RejectedRequest> {
    let Query(params) = params?;
    let filter = ItemFilter::from(params);
    Ok(match state.db.random_inventory_item(&filter).await {
        Ok(Some(item)) => (StatusCode::OK, Json(json!(item))).into_response(),
        Ok(None) => {
            metrics::RANDOM_ITEM_FALLBACKS_TOTAL
                .with_label_values(&["inventory"])
                .inc();
            (StatusCode::OK, Json(placeholder_item())).into_response()
        }
        Err(e) => internal_error(e).into_response(),
    })
}

// ── Item template handlers ────────────────────────────────────────────

async fn list_item_templates(
    State(state): State<AppState>,
    params: Result<Query<TemplateListParams>, QueryRejection>,
) -> Result<Response, RejectedRequest> {
    let Query(params) = params?;
    let limit = params.limit.unwrap_or(DEFAULT_TEMPLATE_LIMIT);
    let templates = state
        .db
        .list_item_templates(limit, params.category.as_deref())
        .await;
    Ok(match templates {
        Ok(templates) => (StatusCode::OK, Json(json!(templates))).into_response(),
        Err(e) => internal_error(e).into_response(),
    })
}

async fn random_item_template(
    State(state): State<AppState>,
    params: Result<Query<RandomItemParams>, QueryRejection>,
) -> Result<Response, RejectedRequest> {
    let Query(params) = params?;
    let filter = ItemFilter::from(params);
    Ok(match state.db.random_item_template(&filter).await {
        Ok(Some(template)) => (StatusCode::OK, Json(json!(template))).into_response(),
        Ok(None) => {
            metrics::RANDOM_ITEM_FALLBACKS_TOTAL
                .with_label_values(&["template"])
                .inc();
            (StatusCode::OK, Json(placeholder_item())).into_response()
        }
        Err(e) => internal_error(e).into_response(),
    })
}

// ── Server handlers ───────────────────────────────────────────────────

/// `H:MM:SS`, hours unbounded.
pub fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

async fn server_status(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = state.started_at.elapsed();
    let database_stats = match state.db.database_stats().await {
        Ok(stats) => json!(stats),
        Err(e) => {
            tracing::error!("Database stats unavailable: {e}");
            json!({ "error": e.to_string() })
        }
    };

    Json(json!({
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime": format_uptime(uptime),
        "uptime_seconds": uptime.as_secs(),
        "request_count": state.request_count.load(Ordering::Relaxed),
        "timestamp": now_timestamp(),
        "database_stats": database_stats,
    }))
}

async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "healthy", "timestamp": now_timestamp() }))
}

async fn dashboard() -> impl IntoResponse {
    Html(DASHBOARD_HTML)
}

async fn metrics_endpoint() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::gather_metrics(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use tower::ServiceExt;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(Duration::from_secs(0)), "0:00:00");
        assert_eq!(format_uptime(Duration::from_secs(75)), "0:01:15");
        assert_eq!(format_uptime(Duration::from_secs(3 * 3600 + 5)), "3:00:05");
        assert_eq!(format_uptime(Duration::from_secs(30 * 3600)), "30:00:00");
    }

    #[test]
    fn test_placeholder_item_shape() {
        let item = placeholder_item();
        assert_eq!(item["name"], PLACEHOLDER_ITEM_NAME);
        assert!(item.get("id").is_none());
    }

    #[test]
    fn test_empty_filters_are_ignored() {
        let params: RandomItemParams =
            serde_json::from_value(json!({ "category": "", "rarity": "rare" })).unwrap();
        let filter = ItemFilter::from(params);
        assert!(filter.category.is_none());
        assert_eq!(filter.rarity.as_deref(), Some("rare"));
    }

    #[test]
    fn test_limit_params_treat_empty_as_absent() {
        let params: LimitParams = serde_json::from_value(json!({ "limit": "" })).unwrap();
        assert_eq!(params.limit, None);
        let params: LimitParams = serde_json::from_value(json!({ "limit": " 7 " })).unwrap();
        assert_eq!(params.limit, Some(7));
        assert!(serde_json::from_value::<LimitParams>(json!({ "limit": "abc" })).is_err());
    }

    #[tokio::test]
    async fn test_panicking_handler_returns_error_envelope() {
        async fn boom() -> &'static str {
            panic!("handler exploded")
        }
        let app: Router = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(handle_panic));

        let response = app
            .oneshot(axum::http::Request::get("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Internal server error");
        assert!(body["timestamp"].is_string());
    }
}
