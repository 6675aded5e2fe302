//! Sale registration and browsing endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use common::SaleId;
use domain::{SaleForm, SaleFormOptions, receipt_message};
use store::{SaleDetail, SaleSummary, Store};

use super::{MessageResponse, created, done, parse_id};
use crate::error::ApiError;
use crate::extract::{JsonBody, PathParam};
use crate::session::CurrentActor;
use crate::state::AppState;

/// GET /sales/new — products and customers for the registration form.
#[tracing::instrument(skip(state, _actor))]
pub async fn form_options<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    _actor: CurrentActor,
) -> Result<Json<SaleFormOptions>, ApiError> {
    Ok(Json(state.sales.sale_form_options().await?))
}

/// GET /sales — every sale, most recent first.
#[tracing::instrument(skip(state, _actor))]
pub async fn list<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    _actor: CurrentActor,
) -> Result<Json<Vec<SaleSummary>>, ApiError> {
    Ok(Json(state.sales.list_sales().await?))
}

/// POST /sales — register a sale made by the logged-in employee.
#[tracing::instrument(skip(state, actor, form))]
pub async fn create<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentActor(actor): CurrentActor,
    JsonBody(form): JsonBody<SaleForm>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let receipt = state.sales.register(&actor, form).await?;
    Ok(created(receipt_message(&receipt), receipt.sale_id.as_i64()))
}

/// GET /sales/{id} — one sale with its lines.
#[tracing::instrument(skip(state, _actor))]
pub async fn get<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    _actor: CurrentActor,
    PathParam(id): PathParam<String>,
) -> Result<Json<SaleDetail>, ApiError> {
    let id: SaleId = parse_id("sale", &id)?;
    Ok(Json(state.sales.get_sale(id).await?))
}

/// POST /sales/{id}/delete — delete a sale and its lines.
#[tracing::instrument(skip(state, _actor))]
pub async fn delete<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    _actor: CurrentActor,
    PathParam(id): PathParam<String>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let id: SaleId = parse_id("sale", &id)?;
    state.sales.delete_sale(id).await?;
    Ok(done(format!("Sale #{id} deleted"), id.as_i64()))
}
