//! Report endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use reporting::{PeriodReport, ReportFilter, RevenueChart};
use store::Store;

use crate::error::ApiError;
use crate::extract::{JsonBody, QueryParams};
use crate::session::CurrentActor;
use crate::state::AppState;

/// GET /reports/sales/period?data_inicio=..&data_fim=.. — sales in a period.
#[tracing::instrument(skip(state, _actor))]
pub async fn period<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    _actor: CurrentActor,
    QueryParams(filter): QueryParams<ReportFilter>,
) -> Result<Json<PeriodReport>, ApiError> {
    Ok(Json(state.reports.period_report(&filter).await?))
}

/// POST /reports/sales/period — same report with the days in a JSON body.
#[tracing::instrument(skip(state, _actor))]
pub async fn period_submit<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    _actor: CurrentActor,
    JsonBody(filter): JsonBody<ReportFilter>,
) -> Result<Json<PeriodReport>, ApiError> {
    Ok(Json(state.reports.period_report(&filter).await?))
}

/// GET /api/sales/product-revenue — `{labels, data}` for the revenue chart.
#[tracing::instrument(skip(state, _actor))]
pub async fn product_revenue<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    _actor: CurrentActor,
    QueryParams(filter): QueryParams<ReportFilter>,
) -> Result<Json<RevenueChart>, ApiError> {
    Ok(Json(state.reports.product_revenue(&filter).await?))
}
