//! HTTP request handlers for the roster API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{Period, ShiftGrid, TailLinkage, ValidationReport};
use crate::rules::RuleEngine;
use crate::storage::{load_schedule, load_tail, save_schedule, save_tail};

use super::request::{CellRequest, LeaderRequest, PeriodRequest};
use super::response::{
    ApiError, ApiErrorResponse, CellView, DayView, FinalizeResponse, GridView, MutationResponse,
    SaveResponse,
};
use super::state::{AppState, Session};

type ApiResult<T> = Result<Json<T>, ApiErrorResponse>;

type CellToggle = fn(&mut ShiftGrid, usize, u32) -> EngineResult<bool>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/period", post(open_period_handler))
        .route("/grid", get(grid_handler))
        .route("/grid/status", post(toggle_status_handler))
        .route("/grid/paid", post(toggle_paid_handler))
        .route("/grid/wish", post(toggle_wish_handler))
        .route("/grid/leader", post(set_leader_handler))
        .route("/grid/save", post(save_handler))
        .route("/grid/finalize", post(finalize_handler))
        .route("/validate", post(validate_handler))
        .with_state(state)
}

/// Handler for POST /period.
///
/// Loads a fresh policy snapshot, builds the grid and restores the saved
/// schedule when one exists. Replaces any period that was open.
async fn open_period_handler(
    State(state): State<AppState>,
    payload: Result<Json<PeriodRequest>, JsonRejection>,
) -> ApiResult<GridView> {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(payload, correlation_id)?;
    info!(
        correlation_id = %correlation_id,
        year = request.year,
        month = request.month,
        "Opening period"
    );

    let period =
        Period::new(request.year, request.month).map_err(|e| rejected(correlation_id, e))?;
    let paths = state.paths();
    let policy = ConfigLoader::load(paths);
    let mut grid = ShiftGrid::new(period, policy.staff.clone(), &policy.vacations);
    let restored = load_schedule(paths, &mut grid);

    let view = GridView::build(&grid, &policy).map_err(|e| rejected(correlation_id, e))?;
    info!(
        correlation_id = %correlation_id,
        period = %view.period,
        staff = grid.staff().len(),
        restored,
        "Period opened"
    );
    state.open(Session { grid, policy });
    Ok(Json(view))
}

/// Handler for GET /grid.
async fn grid_handler(State(state): State<AppState>) -> ApiResult<GridView> {
    let correlation_id = Uuid::new_v4();
    let view = state
        .with_session(|session, _| GridView::build(&session.grid, &session.policy))
        .map_err(|e| rejected(correlation_id, e))?;
    Ok(Json(view))
}

/// Handler for POST /grid/status.
async fn toggle_status_handler(
    State(state): State<AppState>,
    payload: Result<Json<CellRequest>, JsonRejection>,
) -> ApiResult<MutationResponse> {
    toggle_cell(&state, payload, "status", ShiftGrid::toggle_status)
}

/// Handler for POST /grid/paid.
async fn toggle_paid_handler(
    State(state): State<AppState>,
    payload: Result<Json<CellRequest>, JsonRejection>,
) -> ApiResult<MutationResponse> {
    toggle_cell(&state, payload, "paid", ShiftGrid::toggle_paid_flag)
}

/// Handler for POST /grid/wish.
async fn toggle_wish_handler(
    State(state): State<AppState>,
    payload: Result<Json<CellRequest>, JsonRejection>,
) -> ApiResult<MutationResponse> {
    toggle_cell(&state, payload, "wish", ShiftGrid::toggle_wish_cycle)
}

/// Applies one cell toggle and returns the recomputed cell, day header and
/// staff header.
fn toggle_cell(
    state: &AppState,
    payload: Result<Json<CellRequest>, JsonRejection>,
    edit: &'static str,
    toggle: CellToggle,
) -> ApiResult<MutationResponse> {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(payload, correlation_id)?;

    let response = state
        .with_session(|session, _| {
            let grid = &mut session.grid;
            let staff = grid.staff_index(&request.staff)?;
            let changed = toggle(grid, staff, request.day)?;
            Ok(MutationResponse {
                changed,
                cell: Some(CellView::build(grid, staff, request.day)?),
                day: DayView::build(grid, &session.policy, request.day)?,
                staff: Some(grid.staff_summary(staff)?),
            })
        })
        .map_err(|e| rejected(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        edit,
        staff = %request.staff,
        day = request.day,
        changed = response.changed,
        "Cell edited"
    );
    Ok(Json(response))
}

/// Handler for POST /grid/leader.
async fn set_leader_handler(
    State(state): State<AppState>,
    payload: Result<Json<LeaderRequest>, JsonRejection>,
) -> ApiResult<MutationResponse> {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(payload, correlation_id)?;

    let response = state
        .with_session(|session, _| {
            session
                .grid
                .set_leader(request.day, request.staff.as_deref())?;
            Ok(MutationResponse {
                changed: true,
                cell: None,
                day: DayView::build(&session.grid, &session.policy, request.day)?,
                staff: None,
            })
        })
        .map_err(|e| rejected(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        day = request.day,
        leader = request.staff.as_deref().unwrap_or("-"),
        "Leader set"
    );
    Ok(Json(response))
}

/// Handler for POST /grid/save.
async fn save_handler(State(state): State<AppState>) -> ApiResult<SaveResponse> {
    let correlation_id = Uuid::new_v4();
    let path = state
        .with_session(|session, paths| save_schedule(paths, &session.grid))
        .map_err(|e| rejected(correlation_id, e))?;

    info!(correlation_id = %correlation_id, path = %path.display(), "Schedule saved");
    Ok(Json(SaveResponse {
        path: path.display().to_string(),
    }))
}

/// Handler for POST /grid/finalize.
///
/// Saves the schedule and records the last four days of every staff member
/// for the next period's consecutive-rest check.
async fn finalize_handler(State(state): State<AppState>) -> ApiResult<FinalizeResponse> {
    let correlation_id = Uuid::new_v4();
    let response = state
        .with_session(|session, paths| {
            let period = session.grid.period();
            let path = save_schedule(paths, &session.grid)?;
            let tail = TailLinkage::from_grid(&session.grid);
            save_tail(paths, period, &tail)?;
            Ok(FinalizeResponse {
                path: path.display().to_string(),
                tail_key: TailLinkage::key_for(period),
                staff: tail.len(),
            })
        })
        .map_err(|e| rejected(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        tail_key = %response.tail_key,
        staff = response.staff,
        "Period finalized"
    );
    Ok(Json(response))
}

/// Handler for POST /validate.
///
/// Runs every rule against the open grid with the previous period's tail.
async fn validate_handler(State(state): State<AppState>) -> ApiResult<ValidationReport> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing validation request");

    let start_time = Instant::now();
    let report = state
        .with_session(|session, paths| {
            let tail = load_tail(paths, session.grid.period().previous()?);
            Ok(RuleEngine::validate(&session.grid, &session.policy, &tail))
        })
        .map_err(|e| rejected(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        period = %report.period,
        failures = report.failures,
        warnings = report.warnings,
        duration_us = start_time.elapsed().as_micros(),
        "Validation completed"
    );
    Ok(Json(report))
}

/// Unwraps a JSON body, mapping rejections to 400 responses.
fn parse_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<T, ApiErrorResponse> {
    let rejection = match payload {
        Ok(Json(request)) => return Ok(request),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse::bad_request(error))
}

fn rejected(correlation_id: Uuid, error: EngineError) -> ApiErrorResponse {
    warn!(correlation_id = %correlation_id, error = %error, "Request failed");
    error.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataPaths;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn create_test_state() -> (TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("members.json"),
            r#"{"members": [
                {"name": "Sato", "is_manager": true, "paid_left": 4},
                {"name": "Ito", "is_manager": false}
            ]}"#,
        )
        .unwrap();
        let state = AppState::new(DataPaths::new(dir.path()));
        (dir, state)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_empty(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    async fn open_october(state: &AppState) {
        let response = create_router(state.clone())
            .oneshot(post_json("/period", json!({"year": 2025, "month": 10})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_001_open_period_returns_grid() {
        let (_dir, state) = create_test_state();
        let router = create_router(state);

        let response = router
            .oneshot(post_json("/period", json!({"year": 2025, "month": 12})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["period"], "12-1");
        assert_eq!(json["days"].as_array().unwrap().len(), 31);
        assert_eq!(json["days"][16]["token"], 1);
        assert_eq!(json["days"][16]["date"], "2026-01-01");
        assert_eq!(json["staff"][0]["name"], "Sato");
        assert_eq!(json["staff"][0]["paid_left"], 4);
    }

    #[tokio::test]
    async fn test_api_002_malformed_json_returns_400() {
        let (_dir, state) = create_test_state();
        let router = create_router(state);

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/period")
                    .header("Content-Type", "application/json")
                    .body(Body::from("{invalid json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["code"], "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_api_003_missing_field_returns_validation_error() {
        let (_dir, state) = create_test_state();
        let router = create_router(state);

        let response = router
            .oneshot(post_json("/period", json!({"year": 2025})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_api_004_invalid_month_returns_400() {
        let (_dir, state) = create_test_state();
        let router = create_router(state);

        let response = router
            .oneshot(post_json("/period", json!({"year": 2025, "month": 13})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["code"], "INVALID_PERIOD");
    }

    #[tokio::test]
    async fn test_api_004_year_beyond_calendar_returns_400() {
        let (_dir, state) = create_test_state();
        let router = create_router(state);

        let response = router
            .oneshot(post_json("/period", json!({"year": i32::MAX, "month": 12})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["code"], "INVALID_PERIOD");
    }

    #[tokio::test]
    async fn test_api_005_grid_without_period_returns_404() {
        let (_dir, state) = create_test_state();
        let router = create_router(state);

        let response = router
            .oneshot(Request::builder().uri("/grid").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["code"], "NO_ACTIVE_PERIOD");
    }

    #[tokio::test]
    async fn test_api_006_missing_content_type_returns_400() {
        let (_dir, state) = create_test_state();
        let router = create_router(state);

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/period")
                    .body(Body::from(r#"{"year": 2025, "month": 10}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["code"], "MISSING_CONTENT_TYPE");
    }

    #[tokio::test]
    async fn test_toggle_status_updates_headers() {
        let (_dir, state) = create_test_state();
        open_october(&state).await;

        // 2025-10-18 is a Saturday
        let response = create_router(state.clone())
            .oneshot(post_json("/grid/status", json!({"staff": "Ito", "day": 18})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["changed"], true);
        assert_eq!(json["cell"]["display"], "休");
        assert_eq!(json["day"]["rest"], 1);
        assert_eq!(json["day"]["work"], 1);
        assert_eq!(json["staff"]["weekend_rest"], 1);
    }

    #[tokio::test]
    async fn test_paid_flag_requires_rest() {
        let (_dir, state) = create_test_state();
        open_october(&state).await;

        let response = create_router(state.clone())
            .oneshot(post_json("/grid/paid", json!({"staff": "Ito", "day": 20})))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["changed"], false);

        create_router(state.clone())
            .oneshot(post_json("/grid/status", json!({"staff": "Ito", "day": 20})))
            .await
            .unwrap();
        let response = create_router(state.clone())
            .oneshot(post_json("/grid/paid", json!({"staff": "Ito", "day": 20})))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["changed"], true);
        assert_eq!(json["cell"]["display"], "休*");
    }

    #[tokio::test]
    async fn test_wish_locks_status_toggle() {
        let (_dir, state) = create_test_state();
        open_october(&state).await;

        let response = create_router(state.clone())
            .oneshot(post_json("/grid/wish", json!({"staff": "Sato", "day": 21})))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["cell"]["state"]["state"], "wished");

        let response = create_router(state.clone())
            .oneshot(post_json("/grid/status", json!({"staff": "Sato", "day": 21})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["changed"], false);
    }

    #[tokio::test]
    async fn test_unknown_staff_and_day() {
        let (_dir, state) = create_test_state();
        open_october(&state).await;

        let response = create_router(state.clone())
            .oneshot(post_json("/grid/status", json!({"staff": "Ghost", "day": 20})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], "STAFF_NOT_FOUND");

        let response = create_router(state.clone())
            .oneshot(post_json("/grid/status", json!({"staff": "Ito", "day": 32})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "DAY_NOT_IN_PERIOD");

        let response = create_router(state.clone())
            .oneshot(post_json("/grid/leader", json!({"day": 0, "staff": "Sato"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "DAY_NOT_IN_PERIOD");
    }

    #[tokio::test]
    async fn test_leader_set_and_cleared() {
        let (_dir, state) = create_test_state();
        open_october(&state).await;

        let response = create_router(state.clone())
            .oneshot(post_json("/grid/leader", json!({"day": 3, "staff": "Sato"})))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["day"]["leader"], "Sato");
        assert!(json.get("cell").is_none());

        let response = create_router(state.clone())
            .oneshot(post_json("/grid/leader", json!({"day": 3})))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert!(json["day"]["leader"].is_null());
    }

    #[tokio::test]
    async fn test_save_and_reopen_restores_grid() {
        let (dir, state) = create_test_state();
        open_october(&state).await;

        create_router(state.clone())
            .oneshot(post_json("/grid/status", json!({"staff": "Sato", "day": 25})))
            .await
            .unwrap();
        let response = create_router(state.clone())
            .oneshot(post_empty("/grid/save"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(dir.path().join("schedule_202510_16-15.json").exists());

        let reopened = AppState::new(DataPaths::new(dir.path()));
        let response = create_router(reopened)
            .oneshot(post_json("/period", json!({"year": 2025, "month": 10})))
            .await
            .unwrap();
        let json = body_json(response).await;
        // Token 25 is the tenth day of the period
        assert_eq!(json["staff"][0]["cells"][9]["display"], "休");
    }

    #[tokio::test]
    async fn test_finalize_writes_tail() {
        let (dir, state) = create_test_state();
        open_october(&state).await;

        let response = create_router(state.clone())
            .oneshot(post_empty("/grid/finalize"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["tail_key"], "202510_2");
        assert_eq!(json["staff"], 2);

        let tail: Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("last_tail.json")).unwrap())
                .unwrap();
        assert_eq!(tail["202510_2"]["Sato"], json!(["-", "-", "-", "-"]));
    }

    #[tokio::test]
    async fn test_validate_returns_report() {
        let (_dir, state) = create_test_state();
        open_october(&state).await;

        create_router(state.clone())
            .oneshot(post_json("/grid/leader", json!({"day": 17, "staff": "Ito"})))
            .await
            .unwrap();
        let response = create_router(state.clone())
            .oneshot(post_empty("/validate"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["period"], "10-11");
        let violations = json["violations"].as_array().unwrap();
        assert!(violations.iter().any(|v| v["rule"] == "leader_ineligible" && v["day"] == 17));
        let counted = json["failures"].as_u64().unwrap() + json["warnings"].as_u64().unwrap();
        assert_eq!(counted as usize, violations.len());
    }
}
