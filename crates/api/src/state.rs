//! Shared application state.

use std::sync::Arc;

use axum::extract::FromRef;
use domain::{CatalogService, CustomerService, EmployeeService, SaleService};
use reporting::ReportService;
use store::Store;

use crate::session::SessionStore;

/// Shared application state accessible from all handlers.
pub struct AppState<S: Store> {
    pub catalog: CatalogService<S>,
    pub customers: CustomerService<S>,
    pub employees: EmployeeService<S>,
    pub sales: SaleService<S>,
    pub reports: ReportService<S>,
    pub sessions: SessionStore,
    pub bakery_name: String,
}

impl<S: Store + Clone> AppState<S> {
    /// Builds every service over clones of one store.
    pub fn new(store: S, bakery_name: impl Into<String>) -> Self {
        Self {
            catalog: CatalogService::new(store.clone()),
            customers: CustomerService::new(store.clone()),
            employees: EmployeeService::new(store.clone()),
            reports: ReportService::new(store.clone()),
            sales: SaleService::new(store),
            sessions: SessionStore::new(),
            bakery_name: bakery_name.into(),
        }
    }
}

impl<S: Store> FromRef<Arc<AppState<S>>> for SessionStore {
    fn from_ref(state: &Arc<AppState<S>>) -> Self {
        state.sessions.clone()
    }
}
