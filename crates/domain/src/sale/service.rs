use common::{CreditStatus, CustomerId, Money, ProductId, SaleId};
use serde::{Deserialize, Serialize};
use store::{SaleDetail, SaleQuery, SaleReceipt, SaleSummary, Store, StoreExt};

use crate::context::Actor;
use crate::error::Result;
use crate::input::{optional_id, whole_number};

use super::{SaleBuilder, parse_discount};

/// One product line of the sale form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SaleLineForm {
    pub product_id: String,
    pub quantity: String,
}

impl SaleLineForm {
    pub fn new(product_id: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            quantity: quantity.into(),
        }
    }

    fn is_blank(&self) -> bool {
        self.product_id.trim().is_empty() || self.quantity.trim().is_empty()
    }
}

/// The sale registration form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SaleForm {
    /// Blank or absent for an anonymous sale.
    pub customer_id: Option<String>,
    pub items: Vec<SaleLineForm>,
    /// Locale-formatted amount such as `2,50`.
    pub discount: String,
    /// Blank or absent records the default method.
    pub payment_method: Option<String>,
}

/// A product as offered on the sale form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductOption {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
}

/// A customer as offered on the sale form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerOption {
    pub id: CustomerId,
    pub name: String,
    pub national_id: String,
    pub credit_status: CreditStatus,
}

/// Everything needed to fill the sale registration form.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SaleFormOptions {
    pub products: Vec<ProductOption>,
    pub customers: Vec<CustomerOption>,
}

/// Confirmation text shown after a sale is registered.
pub fn receipt_message(receipt: &SaleReceipt) -> String {
    format!("Sale #{} of {} registered", receipt.sale_id, receipt.total)
}

/// Service for registering and browsing sales.
pub struct SaleService<S: Store> {
    store: S,
}

impl<S: Store> SaleService<S> {
    /// Creates a new sale service with the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Prices the submitted lines and persists the sale made by `actor`.
    ///
    /// Blank lines and lines with a quantity of zero or less are skipped. A
    /// product id that does not resolve fails the whole sale with
    /// `NotFound`, and nothing is written unless every line is stored.
    #[tracing::instrument(skip(self, actor, form), fields(employee = %actor.username))]
    pub async fn register(&self, actor: &Actor, form: SaleForm) -> Result<SaleReceipt> {
        let result = self.build_and_insert(actor, form).await;

        match &result {
            Ok(receipt) => {
                metrics::counter!("sales_registered_total").increment(1);
                tracing::info!(sale_id = %receipt.sale_id, total = %receipt.total, "sale registered");
            }
            Err(err) => {
                metrics::counter!("sales_rejected_total").increment(1);
                tracing::info!(error = %err, "sale rejected");
            }
        }

        result
    }

    async fn build_and_insert(&self, actor: &Actor, form: SaleForm) -> Result<SaleReceipt> {
        let customer_id = optional_id::<CustomerId>("customer_id", form.customer_id.as_deref())?;

        let mut builder = SaleBuilder::new(actor.employee_id)
            .customer(customer_id)
            .discount(parse_discount(&form.discount));
        if let Some(method) = form.payment_method {
            builder = builder.payment_method(method);
        }

        for line in form.items.iter().filter(|line| !line.is_blank()) {
            let product_id = ProductId::new(whole_number("product_id", &line.product_id)?);
            let quantity = whole_number("quantity", &line.quantity)?;
            let product = self.store.require_product(product_id).await?;
            builder = builder.line(&product, quantity);
        }

        let sale = builder.build()?;
        Ok(self.store.insert_sale(sale).await?)
    }

    /// Lists every sale, most recent first.
    #[tracing::instrument(skip(self))]
    pub async fn list_sales(&self) -> Result<Vec<SaleSummary>> {
        Ok(self.store.list_sales(SaleQuery::new()).await?)
    }

    /// Loads a sale with its lines.
    #[tracing::instrument(skip(self))]
    pub async fn get_sale(&self, id: SaleId) -> Result<SaleDetail> {
        Ok(self.store.require_sale(id).await?)
    }

    /// Deletes a sale together with all its lines.
    #[tracing::instrument(skip(self))]
    pub async fn delete_sale(&self, id: SaleId) -> Result<()> {
        self.store.delete_sale(id).await?;
        metrics::counter!("sales_deleted_total").increment(1);
        tracing::info!(sale_id = %id, "sale deleted");
        Ok(())
    }

    /// Products and customers to offer on the registration form.
    #[tracing::instrument(skip(self))]
    pub async fn sale_form_options(&self) -> Result<SaleFormOptions> {
        let products = self
            .store
            .list_products()
            .await?
            .into_iter()
            .map(|p| ProductOption {
                id: p.id,
                name: p.name,
                price: p.price,
            })
            .collect();

        let customers = self
            .store
            .list_customers()
            .await?
            .into_iter()
            .map(|c| CustomerOption {
                id: c.id,
                name: c.name,
                national_id: c.national_id,
                credit_status: c.credit_status,
            })
            .collect();

        Ok(SaleFormOptions {
            products,
            customers,
        })
    }
}
