//! Employee endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use common::EmployeeId;
use domain::{EmployeeEditForm, EmployeeForm};
use store::{Employee, Store};

use super::{MessageResponse, created, done, parse_id};
use crate::error::ApiError;
use crate::extract::{JsonBody, PathParam};
use crate::session::CurrentActor;
use crate::state::AppState;

/// GET /employees — list employees. Password hashes are never serialized.
#[tracing::instrument(skip(state, _actor))]
pub async fn list<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    _actor: CurrentActor,
) -> Result<Json<Vec<Employee>>, ApiError> {
    Ok(Json(state.employees.list_employees().await?))
}

/// POST /employees — register an employee.
#[tracing::instrument(skip(state, _actor, form))]
pub async fn create<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    _actor: CurrentActor,
    JsonBody(form): JsonBody<EmployeeForm>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let employee = state.employees.register_employee(form).await?;
    Ok(created(
        format!("Employee '{}' registered", employee.username),
        employee.id.as_i64(),
    ))
}

/// GET /employees/{id} — load one employee.
#[tracing::instrument(skip(state, _actor))]
pub async fn get<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    _actor: CurrentActor,
    PathParam(id): PathParam<String>,
) -> Result<Json<Employee>, ApiError> {
    let id: EmployeeId = parse_id("employee", &id)?;
    Ok(Json(state.employees.get_employee(id).await?))
}

/// POST /employees/{id} — edit an employee; a blank password keeps the old one.
#[tracing::instrument(skip(state, _actor, form))]
pub async fn update<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    _actor: CurrentActor,
    PathParam(id): PathParam<String>,
    JsonBody(form): JsonBody<EmployeeEditForm>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let id: EmployeeId = parse_id("employee", &id)?;
    let employee = state.employees.edit_employee(id, form).await?;
    Ok(done(
        format!("Employee '{}' updated", employee.username),
        employee.id.as_i64(),
    ))
}

/// POST /employees/{id}/delete — delete another employee.
#[tracing::instrument(skip(state, actor))]
pub async fn delete<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentActor(actor): CurrentActor,
    PathParam(id): PathParam<String>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let id: EmployeeId = parse_id("employee", &id)?;
    state.employees.delete_employee(&actor, id).await?;
    Ok(done("Employee deleted".to_string(), id.as_i64()))
}
