//! Request-scoped identity.

use common::EmployeeId;
use serde::{Deserialize, Serialize};

/// The authenticated employee performing an operation.
///
/// Built by [`EmployeeService::authenticate`](crate::EmployeeService::authenticate)
/// and passed explicitly to every operation that records or checks who acted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub employee_id: EmployeeId,
    pub username: String,
    pub display_name: String,
}

impl Actor {
    pub fn new(
        employee_id: EmployeeId,
        username: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            employee_id,
            username: username.into(),
            display_name: display_name.into(),
        }
    }
}

impl From<&store::Employee> for Actor {
    fn from(employee: &store::Employee) -> Self {
        Self::new(employee.id, &employee.username, &employee.name)
    }
}
