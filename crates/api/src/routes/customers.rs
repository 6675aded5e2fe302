//! Customer endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use common::CustomerId;
use domain::{CustomerEditForm, CustomerForm};
use store::{Customer, Store};

use super::{MessageResponse, created, done, parse_id};
use crate::error::ApiError;
use crate::extract::{JsonBody, PathParam};
use crate::session::CurrentActor;
use crate::state::AppState;

/// GET /customers — list customers.
#[tracing::instrument(skip(state, _actor))]
pub async fn list<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    _actor: CurrentActor,
) -> Result<Json<Vec<Customer>>, ApiError> {
    Ok(Json(state.customers.list_customers().await?))
}

/// POST /customers — register a customer and run the credit check.
#[tracing::instrument(skip(state, _actor, form))]
pub async fn create<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    _actor: CurrentActor,
    JsonBody(form): JsonBody<CustomerForm>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let customer = state.customers.register_customer(form).await?;
    Ok(created(
        format!(
            "Customer '{}' registered with credit status {}",
            customer.name, customer.credit_status
        ),
        customer.id.as_i64(),
    ))
}

/// GET /customers/{id} — load one customer.
#[tracing::instrument(skip(state, _actor))]
pub async fn get<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    _actor: CurrentActor,
    PathParam(id): PathParam<String>,
) -> Result<Json<Customer>, ApiError> {
    let id: CustomerId = parse_id("customer", &id)?;
    Ok(Json(state.customers.get_customer(id).await?))
}

/// POST /customers/{id} — edit a customer.
#[tracing::instrument(skip(state, _actor, form))]
pub async fn update<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    _actor: CurrentActor,
    PathParam(id): PathParam<String>,
    JsonBody(form): JsonBody<CustomerEditForm>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let id: CustomerId = parse_id("customer", &id)?;
    let customer = state.customers.edit_customer(id, form).await?;
    Ok(done(
        format!("Customer '{}' updated", customer.name),
        customer.id.as_i64(),
    ))
}

/// POST /customers/{id}/delete — delete a customer without sales.
#[tracing::instrument(skip(state, _actor))]
pub async fn delete<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    _actor: CurrentActor,
    PathParam(id): PathParam<String>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let id: CustomerId = parse_id("customer", &id)?;
    state.customers.delete_customer(id).await?;
    Ok(done("Customer deleted".to_string(), id.as_i64()))
}
