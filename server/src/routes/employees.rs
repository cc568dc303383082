use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use platform_api::{ApiError, ApiResult, Envelope, respond};
use products_hr::{Employee, EmployeeFilter, EmployeeStats, StoreError};
use serde::Deserialize;
use uuid::Uuid;

use crate::{http::AppState, payload::EmployeePayload};

const NOT_FOUND: &str = "Employee not found";
const RECENT_ON_DASHBOARD: u64 = 5;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    query: String,
}

/// Map a store failure onto the API taxonomy. `failure` heads validation responses.
fn store_error(err: StoreError, failure: &str) -> ApiError {
    match err {
        StoreError::NotFound => ApiError::not_found(NOT_FOUND),
        StoreError::Validation(errors) => ApiError::validation(failure, errors),
        other => ApiError::internal(other),
    }
}

// Ids that are not UUIDs cannot name a stored record.
fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(NOT_FOUND))
}

pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<EmployeeFilter>,
) -> ApiResult<Json<Envelope<Vec<Employee>>>> {
    let employees = state
        .employees
        .list(&filter)
        .await
        .map_err(ApiError::internal)?;
    Ok(Json(Envelope::list(employees)))
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Envelope<Vec<Employee>>>> {
    let employees = state
        .employees
        .search(&params.query)
        .await
        .map_err(ApiError::internal)?;
    Ok(Json(Envelope::list(employees)))
}

pub async fn stats(State(state): State<AppState>) -> ApiResult<Json<Envelope<EmployeeStats>>> {
    let stats = state
        .employees
        .stats(RECENT_ON_DASHBOARD)
        .await
        .map_err(ApiError::internal)?;
    Ok(Json(Envelope::data(stats)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Employee>>> {
    let id = parse_id(&id)?;
    let employee = state
        .employees
        .get(id)
        .await
        .map_err(|err| store_error(err, NOT_FOUND))?;
    Ok(Json(Envelope::data(employee)))
}

pub async fn create(
    State(state): State<AppState>,
    payload: EmployeePayload,
) -> ApiResult<Response> {
    match state.employees.create(payload.fields.clone()).await {
        Ok(employee) => Ok(respond(
            StatusCode::CREATED,
            Envelope::data(employee).with_message("Employee created successfully"),
        )),
        Err(err) => {
            payload.discard_upload().await;
            Err(store_error(err, "Error creating employee"))
        }
    }
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: EmployeePayload,
) -> ApiResult<Json<Envelope<Employee>>> {
    let outcome = match parse_id(&id) {
        Ok(id) => state
            .employees
            .update(id, payload.fields.clone())
            .await
            .map_err(|err| store_error(err, "Error updating employee")),
        Err(err) => Err(err),
    };
    match outcome {
        Ok(employee) => Ok(Json(
            Envelope::data(employee).with_message("Employee updated successfully"),
        )),
        Err(err) => {
            payload.discard_upload().await;
            Err(err)
        }
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<()>>> {
    let id = parse_id(&id)?;
    state
        .employees
        .delete(id)
        .await
        .map_err(|err| store_error(err, NOT_FOUND))?;
    Ok(Json(Envelope::message("Employee deleted successfully")))
}
