//! Customer registration and maintenance.

use common::{CreditStatus, CustomerId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use store::limits::{CONTACT_MAX, EMAIL_MAX, NATIONAL_ID_MAX, PERSON_NAME_MAX};
use store::{Customer, CustomerChanges, NewCustomer, Store, StoreExt};

use crate::credit::check_credit;
use crate::error::{Result, ValidationError};
use crate::input::{at_most, normalize_national_id, optional_text, required};

/// Fields of the customer registration form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CustomerForm {
    pub name: String,
    pub national_id: String,
    pub contact: String,
    pub email: String,
}

/// Fields of the customer edit form. The national id cannot change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CustomerEditForm {
    pub name: String,
    pub contact: String,
    pub email: String,
    /// `Pending`, `Approved` or `Denied`.
    pub credit_status: String,
}

/// Service for managing customers.
pub struct CustomerService<S: Store> {
    store: S,
}

impl<S: Store> CustomerService<S> {
    /// Creates a new customer service with the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lists every customer ordered by name.
    #[tracing::instrument(skip(self))]
    pub async fn list_customers(&self) -> Result<Vec<Customer>> {
        Ok(self.store.list_customers().await?)
    }

    /// Loads a customer, failing with `NotFound` for an unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn get_customer(&self, id: CustomerId) -> Result<Customer> {
        Ok(self.store.require_customer(id).await?)
    }

    /// Registers a customer and runs the credit check on them.
    pub async fn register_customer(&self, form: CustomerForm) -> Result<Customer> {
        let mut rng = StdRng::from_entropy();
        self.register_customer_with_rng(form, &mut rng).await
    }

    /// Registers a customer, drawing the credit decision from `rng`.
    ///
    /// The customer is inserted as `Pending` and the decision is written
    /// in a second update.
    #[tracing::instrument(skip(self, rng))]
    pub async fn register_customer_with_rng<R: Rng + Send>(
        &self,
        form: CustomerForm,
        rng: &mut R,
    ) -> Result<Customer> {
        let national_id = normalize_national_id(&form.national_id);
        if national_id.is_empty() {
            return Err(ValidationError::Required {
                field: "national_id",
            }
            .into());
        }
        let national_id = at_most("national_id", &national_id, NATIONAL_ID_MAX)?;

        let mut customer = self
            .store
            .insert_customer(NewCustomer {
                name: required("name", &form.name, PERSON_NAME_MAX)?,
                national_id,
                contact: optional_text("contact", &form.contact, CONTACT_MAX)?,
                email: optional_text("email", &form.email, EMAIL_MAX)?,
                credit_status: CreditStatus::Pending,
            })
            .await?;

        let status = check_credit(&customer.national_id, rng);
        self.store.set_credit_status(customer.id, status).await?;
        customer.credit_status = status;

        tracing::info!(
            customer_id = %customer.id,
            credit_status = %status,
            "customer registered"
        );
        Ok(customer)
    }

    /// Updates a customer's editable fields, including a manual credit status.
    #[tracing::instrument(skip(self))]
    pub async fn edit_customer(&self, id: CustomerId, form: CustomerEditForm) -> Result<Customer> {
        let credit_status = form
            .credit_status
            .trim()
            .parse::<CreditStatus>()
            .map_err(|e| ValidationError::UnknownCreditStatus(e.0))?;

        let changes = CustomerChanges {
            name: required("name", &form.name, PERSON_NAME_MAX)?,
            contact: optional_text("contact", &form.contact, CONTACT_MAX)?,
            email: optional_text("email", &form.email, EMAIL_MAX)?,
            credit_status,
        };
        Ok(self.store.update_customer(id, changes).await?)
    }

    /// Deletes a customer that no sale references.
    #[tracing::instrument(skip(self))]
    pub async fn delete_customer(&self, id: CustomerId) -> Result<()> {
        self.store.delete_customer(id).await?;
        tracing::info!(customer_id = %id, "customer deleted");
        Ok(())
    }
}
