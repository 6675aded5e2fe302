//! Product catalog service.

use common::ProductId;
use serde::Deserialize;
use store::limits::{BARCODE_MAX, PRODUCT_NAME_MAX};
use store::{NewProduct, Product, Store, StoreExt};

use crate::error::Result;
use crate::input::{positive_amount, required};

/// Product fields as submitted by the registration and edit forms.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub name: String,
    /// Unit price, `10.50` or `10,50`.
    pub price: String,
    pub barcode: String,
    /// Free-form manufacture date.
    pub manufactured_on: String,
}

impl ProductForm {
    fn validate(&self) -> Result<NewProduct> {
        Ok(NewProduct {
            name: required("name", &self.name, PRODUCT_NAME_MAX)?,
            price: positive_amount("price", &self.price)?,
            barcode: required("barcode", &self.barcode, BARCODE_MAX)?,
            manufactured_on: self.manufactured_on.trim().to_string(),
        })
    }
}

/// Service for managing the product catalog.
pub struct CatalogService<S: Store> {
    store: S,
}

impl<S: Store> CatalogService<S> {
    /// Creates a new catalog service with the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lists every product ordered by name.
    #[tracing::instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        Ok(self.store.list_products().await?)
    }

    /// Loads a product, failing with `NotFound` for an unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product> {
        Ok(self.store.require_product(id).await?)
    }

    /// Registers a new product.
    #[tracing::instrument(skip(self))]
    pub async fn register_product(&self, form: ProductForm) -> Result<Product> {
        let product = self.store.insert_product(form.validate()?).await?;
        tracing::info!(product_id = %product.id, name = %product.name, "product registered");
        Ok(product)
    }

    /// Replaces every field of a product.
    ///
    /// Line items already sold keep the price they were sold at.
    #[tracing::instrument(skip(self))]
    pub async fn edit_product(&self, id: ProductId, form: ProductForm) -> Result<Product> {
        let changes = form.validate()?;
        Ok(self.store.update_product(id, changes).await?)
    }

    /// Deletes a product that no line item references.
    #[tracing::instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<()> {
        self.store.delete_product(id).await?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use common::Money;
    use store::InMemoryStore;

    use super::*;
    use crate::error::{DomainError, ValidationError};

    fn form(name: &str, price: &str, barcode: &str) -> ProductForm {
        ProductForm {
            name: name.to_string(),
            price: price.to_string(),
            barcode: barcode.to_string(),
            manufactured_on: "01/03/2024".to_string(),
        }
    }

    #[tokio::test]
    async fn registers_product_with_comma_price() {
        let service = CatalogService::new(InMemoryStore::new());
        let product = service
            .register_product(form(" Sonho ", "4,75", "7890"))
            .await
            .unwrap();
        assert_eq!(product.name, "Sonho");
        assert_eq!(product.price, Money::from_cents(475));
        assert_eq!(service.list_products().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejects_name_longer_than_the_column() {
        let service = CatalogService::new(InMemoryStore::new());
        let long_name = "P".repeat(PRODUCT_NAME_MAX + 1);
        let result = service.register_product(form(&long_name, "4,75", "7890")).await;
        assert!(matches!(
            result,
            Err(DomainError::Validation(ValidationError::TooLong {
                field: "name",
                max: PRODUCT_NAME_MAX
            }))
        ));
        assert!(service.list_products().await.unwrap().is_empty());

        let exact = "P".repeat(PRODUCT_NAME_MAX);
        assert!(service.register_product(form(&exact, "4,75", "7890")).await.is_ok());
    }

    #[tokio::test]
    async fn rejects_non_positive_price() {
        let service = CatalogService::new(InMemoryStore::new());
        let result = service.register_product(form("Sonho", "-1", "7890")).await;
        assert!(matches!(
            result,
            Err(DomainError::Validation(ValidationError::NotPositive {
                field: "price"
            }))
        ));
        assert!(service.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_barcode_is_a_constraint_violation() {
        let service = CatalogService::new(InMemoryStore::new());
        service
            .register_product(form("Sonho", "4,75", "7890"))
            .await
            .unwrap();
        let result = service.register_product(form("Broa", "3,00", "7890")).await;
        match result {
            Err(DomainError::ConstraintViolation { message }) => {
                assert!(message.contains("barcode"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn edit_unknown_product_is_not_found() {
        let service = CatalogService::new(InMemoryStore::new());
        let result = service
            .edit_product(ProductId::new(9), form("Sonho", "4,75", "7890"))
            .await;
        assert!(matches!(
            result,
            Err(DomainError::NotFound {
                entity: "Product",
                ..
            })
        ));
    }
}
