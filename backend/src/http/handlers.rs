//! HTTP handlers for the REST API.
//!
//! Plan handlers run the pipeline on the blocking pool.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use super::dto::{CatalogResponse, HealthResponse, PlanRequest, RenderOutput, VariablePlanResponse};
use super::error::AppError;
use super::state::AppState;
use crate::services::RenderPlanBuilder;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        variables: state.catalog.len(),
    }))
}

/// GET /v1/catalog
///
/// List catalogued variables in the order plans are produced.
pub async fn get_catalog(State(state): State<AppState>) -> HandlerResult<CatalogResponse> {
    let variables: Vec<_> = state.catalog.iter().cloned().collect();
    let total = variables.len();
    Ok(Json(CatalogResponse { variables, total }))
}

/// POST /v1/plans
///
/// Build render plans for every admitted catalog variable.
pub async fn create_plans(
    State(state): State<AppState>,
    request: Result<Json<PlanRequest>, JsonRejection>,
) -> HandlerResult<RenderOutput> {
    let Json(request) = request?;
    let (payload, options) = request.into_parts();
    let options = state.resolve_options(options);

    let output = tokio::task::spawn_blocking(move || {
        RenderPlanBuilder::new(&state.catalog)
            .with_options(options)
            .with_time_formatter(state.time_formatter.as_ref())
            .build_payload(&payload)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    tracing::debug!(
        plans = output.plans.len(),
        failures = output.failures.len(),
        "plans built"
    );
    Ok(Json(output))
}

/// POST /v1/plans/{code}
///
/// Build the render plan for a single variable, ignoring any allow-list.
pub async fn create_variable_plan(
    State(state): State<AppState>,
    Path(code): Path<String>,
    request: Result<Json<PlanRequest>, JsonRejection>,
) -> HandlerResult<VariablePlanResponse> {
    let Json(request) = request?;
    let (payload, options) = request.into_parts();
    let options = state.resolve_options(options);

    let plan = tokio::task::spawn_blocking({
        let code = code.clone();
        move || {
            let records = payload.records()?;
            RenderPlanBuilder::new(&state.catalog)
                .with_options(options)
                .with_time_formatter(state.time_formatter.as_ref())
                .build_variable(&records, &code)
        }
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    Ok(Json(VariablePlanResponse { code, plan }))
}
