// Axum API Server Module
//
// Purpose: HTTP surface over the bloom calculator
// Endpoints: health, local plant search, tiered resolution, bloom calculation

#[cfg(feature = "api")]
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};

#[cfg(feature = "api")]
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};

#[cfg(feature = "api")]
use std::sync::Arc;

#[cfg(feature = "api")]
use crate::calculator::BloomCalculator;

#[cfg(feature = "api")]
use crate::config::PlannerConfig;

#[cfg(feature = "api")]
use crate::error::{CalculationError, ResolveError};

#[cfg(feature = "api")]
use crate::local_index::LocalIndex;

#[cfg(feature = "api")]
use crate::resolver::PlantResolver;

// ============================================================================
// Application State
// ============================================================================

#[cfg(feature = "api")]
#[derive(Clone)]
pub struct AppState {
    pub calculator: BloomCalculator,
}

#[cfg(feature = "api")]
impl AppState {
    pub async fn new(config: &PlannerConfig) -> anyhow::Result<Self> {
        tracing::info!("Loading local plant dataset...");
        let local = Arc::new(LocalIndex::load_or_empty(&config.dataset_path));
        tracing::info!("Local index ready ({} plants)", local.len());

        tracing::info!("Initializing tiered resolver...");
        let resolver = PlantResolver::from_config(config, local)?;

        Ok(Self::from_resolver(resolver))
    }

    /// State around an already-built resolver (tests, embedding)
    pub fn from_resolver(resolver: PlantResolver) -> Self {
        Self {
            calculator: BloomCalculator::new(Arc::new(resolver)),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

#[cfg(feature = "api")]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Plant endpoints
        .route("/api/plants/search", get(search_plants))
        .route("/api/plants/resolve", get(resolve_plant))

        // Bloom calculation
        .route("/api/bloom", get(calculate_bloom))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

#[cfg(feature = "api")]
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "local_plants": state.calculator.resolver().local_index().len(),
    }))
}

#[cfg(feature = "api")]
#[derive(Debug, serde::Deserialize)]
struct SearchQuery {
    q: Option<String>,
    limit: Option<usize>,
}

/// Typeahead over the local dataset only
#[cfg(feature = "api")]
async fn search_plants(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Json<serde_json::Value> {
    let limit = params.limit.unwrap_or(10).min(50);
    let query = params.q.as_deref().unwrap_or("");

    let start = std::time::Instant::now();
    let results = state.calculator.resolver().local_index().search(query, limit);
    let elapsed = start.elapsed();

    tracing::debug!("Local search '{}' returned {} results in {:?}", query, results.len(), elapsed);

    Json(serde_json::json!({
        "rows": results.len(),
        "data": results,
        "query_time_us": elapsed.as_micros(),
    }))
}

#[cfg(feature = "api")]
#[derive(Debug, serde::Deserialize)]
struct ResolveQuery {
    name: Option<String>,
}

#[cfg(feature = "api")]
async fn resolve_plant(
    State(state): State<AppState>,
    Query(params): Query<ResolveQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let name = params.name.unwrap_or_default();
    let result = state.calculator.resolver().resolve(&name).await?;

    let status = if result.is_found() { "resolved" } else { "not_found" };
    Ok(Json(serde_json::json!({
        "status": status,
        "result": result,
    })))
}

#[cfg(feature = "api")]
#[derive(Debug, serde::Deserialize)]
struct BloomQuery {
    plant: Option<String>,
    month: Option<String>,
}

#[cfg(feature = "api")]
async fn calculate_bloom(
    State(state): State<AppState>,
    Query(params): Query<BloomQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let plant = params.plant.unwrap_or_default();
    let month = params.month.unwrap_or_default();

    let calculation = state.calculator.calculate(&plant, &month).await?;
    let body = serde_json::to_value(&calculation).map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(body))
}

// ============================================================================
// Error Handling
// ============================================================================

#[cfg(feature = "api")]
#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Internal(String),
}

#[cfg(feature = "api")]
impl From<CalculationError> for AppError {
    fn from(err: CalculationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

#[cfg(feature = "api")]
impl From<ResolveError> for AppError {
    fn from(err: ResolveError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

#[cfg(feature = "api")]
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
