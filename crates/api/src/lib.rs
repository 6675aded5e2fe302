//! HTTP back office for the bakery, with logging and Prometheus metrics.
//!
//! Every page of the back office is a JSON endpoint: catalog, customers,
//! employees, sales and reports. All of them except `/health`, `/metrics`
//! and the login routes need a session cookie.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod session;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use store::Store;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: Store + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    use routes::{auth, customers, employees, products, reports, sales, system};

    let metrics_router = Router::new()
        .route("/metrics", get(system::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(system::health))
        .route("/", get(auth::index::<S>))
        .route("/login", get(auth::login_form::<S>).post(auth::login::<S>))
        .route("/logout", post(auth::logout::<S>))
        .route("/dashboard", get(auth::dashboard::<S>))
        .route(
            "/products",
            get(products::list::<S>).post(products::create::<S>),
        )
        .route(
            "/products/{id}",
            get(products::get::<S>).post(products::update::<S>),
        )
        .route("/products/{id}/delete", post(products::delete::<S>))
        .route(
            "/customers",
            get(customers::list::<S>).post(customers::create::<S>),
        )
        .route(
            "/customers/{id}",
            get(customers::get::<S>).post(customers::update::<S>),
        )
        .route("/customers/{id}/delete", post(customers::delete::<S>))
        .route(
            "/employees",
            get(employees::list::<S>).post(employees::create::<S>),
        )
        .route(
            "/employees/{id}",
            get(employees::get::<S>).post(employees::update::<S>),
        )
        .route("/employees/{id}/delete", post(employees::delete::<S>))
        .route("/sales/new", get(sales::form_options::<S>))
        .route("/sales", get(sales::list::<S>).post(sales::create::<S>))
        .route("/sales/{id}", get(sales::get::<S>))
        .route("/sales/{id}/delete", post(sales::delete::<S>))
        .route(
            "/reports/sales/period",
            get(reports::period::<S>).post(reports::period_submit::<S>),
        )
        .route(
            "/api/sales/product-revenue",
            get(reports::product_revenue::<S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state over `store`.
pub fn create_default_state<S: Store + Clone + 'static>(
    store: S,
    bakery_name: impl Into<String>,
) -> Arc<AppState<S>> {
    Arc::new(AppState::new(store, bakery_name))
}
