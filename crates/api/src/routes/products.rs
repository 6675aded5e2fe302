//! Product catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use common::ProductId;
use domain::ProductForm;
use store::{Product, Store};

use super::{MessageResponse, created, done, parse_id};
use crate::error::ApiError;
use crate::extract::{JsonBody, PathParam};
use crate::session::CurrentActor;
use crate::state::AppState;

/// GET /products — list the catalog.
#[tracing::instrument(skip(state, _actor))]
pub async fn list<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    _actor: CurrentActor,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.catalog.list_products().await?))
}

/// POST /products — register a product.
#[tracing::instrument(skip(state, _actor, form))]
pub async fn create<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    _actor: CurrentActor,
    JsonBody(form): JsonBody<ProductForm>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let product = state.catalog.register_product(form).await?;
    Ok(created(
        format!("Product '{}' registered", product.name),
        product.id.as_i64(),
    ))
}

/// GET /products/{id} — load one product.
#[tracing::instrument(skip(state, _actor))]
pub async fn get<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    _actor: CurrentActor,
    PathParam(id): PathParam<String>,
) -> Result<Json<Product>, ApiError> {
    let id: ProductId = parse_id("product", &id)?;
    Ok(Json(state.catalog.get_product(id).await?))
}

/// POST /products/{id} — edit a product.
#[tracing::instrument(skip(state, _actor, form))]
pub async fn update<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    _actor: CurrentActor,
    PathParam(id): PathParam<String>,
    JsonBody(form): JsonBody<ProductForm>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let id: ProductId = parse_id("product", &id)?;
    let product = state.catalog.edit_product(id, form).await?;
    Ok(done(
        format!("Product '{}' updated", product.name),
        product.id.as_i64(),
    ))
}

/// POST /products/{id}/delete — delete an unsold product.
#[tracing::instrument(skip(state, _actor))]
pub async fn delete<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    _actor: CurrentActor,
    PathParam(id): PathParam<String>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let id: ProductId = parse_id("product", &id)?;
    state.catalog.delete_product(id).await?;
    Ok(done("Product deleted".to_string(), id.as_i64()))
}
