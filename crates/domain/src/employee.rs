//! Employee accounts and authentication.

use common::EmployeeId;
use serde::Deserialize;
use store::limits::{PERSON_NAME_MAX, ROLE_MAX, USERNAME_MAX};
use store::{Employee, EmployeeChanges, NewEmployee, Store, StoreExt};

use crate::auth::{hash_password, verify_password};
use crate::context::Actor;
use crate::error::{DomainError, Result, ValidationError};
use crate::input::required;

/// Fields of the employee registration form.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmployeeForm {
    pub username: String,
    pub password: String,
    pub name: String,
    pub role: String,
}

/// Fields of the employee edit form. The username cannot change.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmployeeEditForm {
    pub name: String,
    pub role: String,
    /// Blank or absent keeps the current password.
    pub password: Option<String>,
}

// Passwords stay out of logs.
impl std::fmt::Debug for EmployeeForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmployeeForm")
            .field("username", &self.username)
            .field("name", &self.name)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for EmployeeEditForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmployeeEditForm")
            .field("name", &self.name)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Service for managing employees and checking their credentials.
pub struct EmployeeService<S: Store> {
    store: S,
}

impl<S: Store> EmployeeService<S> {
    /// Creates a new employee service with the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lists every employee ordered by display name.
    #[tracing::instrument(skip(self))]
    pub async fn list_employees(&self) -> Result<Vec<Employee>> {
        Ok(self.store.list_employees().await?)
    }

    /// Loads an employee, failing with `NotFound` for an unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn get_employee(&self, id: EmployeeId) -> Result<Employee> {
        Ok(self.store.require_employee(id).await?)
    }

    /// Registers an employee with a freshly hashed password.
    #[tracing::instrument(skip(self))]
    pub async fn register_employee(&self, form: EmployeeForm) -> Result<Employee> {
        if form.password.is_empty() {
            return Err(ValidationError::Required { field: "password" }.into());
        }

        let employee = NewEmployee {
            username: required("username", &form.username, USERNAME_MAX)?,
            password_hash: hash_password(&form.password)?,
            name: required("name", &form.name, PERSON_NAME_MAX)?,
            role: required("role", &form.role, ROLE_MAX)?,
        };
        let employee = self.store.insert_employee(employee).await?;
        tracing::info!(employee_id = %employee.id, username = %employee.username, "employee registered");
        Ok(employee)
    }

    /// Updates name and role, and the password when a new one is given.
    #[tracing::instrument(skip(self))]
    pub async fn edit_employee(&self, id: EmployeeId, form: EmployeeEditForm) -> Result<Employee> {
        let password_hash = match form.password.as_deref() {
            Some(password) if !password.is_empty() => Some(hash_password(password)?),
            _ => None,
        };

        let changes = EmployeeChanges {
            name: required("name", &form.name, PERSON_NAME_MAX)?,
            role: required("role", &form.role, ROLE_MAX)?,
            password_hash,
        };
        Ok(self.store.update_employee(id, changes).await?)
    }

    /// Deletes an employee on behalf of `actor`.
    ///
    /// Employees cannot delete themselves, and employees who made sales
    /// cannot be deleted at all.
    #[tracing::instrument(skip(self))]
    pub async fn delete_employee(&self, actor: &Actor, id: EmployeeId) -> Result<()> {
        if actor.employee_id == id {
            return Err(DomainError::SelfDeletion);
        }
        self.store.delete_employee(id).await?;
        tracing::info!(employee_id = %id, deleted_by = %actor.username, "employee deleted");
        Ok(())
    }

    /// Checks a username and password pair.
    ///
    /// Unknown users and wrong passwords fail identically.
    #[tracing::instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Actor> {
        let employee = self.store.find_employee_by_username(username.trim()).await?;

        match employee {
            Some(employee) if verify_password(password, &employee.password_hash) => {
                metrics::counter!("logins_total", "outcome" => "success").increment(1);
                tracing::info!(username = %employee.username, "login succeeded");
                Ok(Actor::from(&employee))
            }
            _ => {
                metrics::counter!("logins_total", "outcome" => "failure").increment(1);
                tracing::warn!(username, "login failed");
                Err(DomainError::InvalidCredentials)
            }
        }
    }

    /// Creates the administrator account unless the username is taken.
    ///
    /// Returns true if an account was created.
    #[tracing::instrument(skip(self, password))]
    pub async fn ensure_admin(&self, username: &str, password: &str, name: &str) -> Result<bool> {
        if self.store.find_employee_by_username(username).await?.is_some() {
            return Ok(false);
        }

        self.register_employee(EmployeeForm {
            username: username.to_string(),
            password: password.to_string(),
            name: name.to_string(),
            role: "Manager".to_string(),
        })
        .await?;
        Ok(true)
    }
}
