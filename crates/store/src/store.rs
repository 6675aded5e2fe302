use async_trait::async_trait;
use common::{CreditStatus, CustomerId, EmployeeId, Money, ProductId, SaleId};

use crate::limits::MAX_QUANTITY;
use crate::{
    Customer, CustomerChanges, DateRange, Employee, EmployeeChanges, NewCustomer, NewEmployee,
    NewProduct, NewSale, Product, ProductRevenue, Result, SaleDetail, SaleQuery, SaleReceipt,
    SaleSummary, StoreError,
};

/// Core trait for storage implementations.
///
/// Covers the catalog (products), the parties (customers and employees),
/// sale persistence and the aggregate queries reports are built from.
/// Every write is atomic: it either fully applies or leaves the store
/// unchanged. All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait Store: Send + Sync {
    /// Lists all products ordered by name.
    async fn list_products(&self) -> Result<Vec<Product>>;

    /// Retrieves a product by id.
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>>;

    /// Inserts a product.
    ///
    /// Fails with `UniqueViolation` on a duplicate name or barcode.
    async fn insert_product(&self, product: NewProduct) -> Result<Product>;

    /// Replaces every field of an existing product.
    ///
    /// Line items keep the price they were sold at.
    async fn update_product(&self, id: ProductId, product: NewProduct) -> Result<Product>;

    /// Deletes a product.
    ///
    /// Fails with `InUse` while any line item references it.
    async fn delete_product(&self, id: ProductId) -> Result<()>;

    /// Lists all customers ordered by name.
    async fn list_customers(&self) -> Result<Vec<Customer>>;

    /// Retrieves a customer by id.
    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>>;

    /// Inserts a customer.
    ///
    /// Fails with `UniqueViolation` on a duplicate national id.
    async fn insert_customer(&self, customer: NewCustomer) -> Result<Customer>;

    /// Updates the editable fields of a customer.
    async fn update_customer(&self, id: CustomerId, changes: CustomerChanges) -> Result<Customer>;

    /// Overwrites only the credit status of a customer.
    async fn set_credit_status(&self, id: CustomerId, status: CreditStatus) -> Result<()>;

    /// Deletes a customer.
    ///
    /// Fails with `InUse` while any sale references it.
    async fn delete_customer(&self, id: CustomerId) -> Result<()>;

    /// Lists all employees ordered by display name.
    async fn list_employees(&self) -> Result<Vec<Employee>>;

    /// Retrieves an employee by id.
    async fn get_employee(&self, id: EmployeeId) -> Result<Option<Employee>>;

    /// Retrieves an employee by login name.
    async fn find_employee_by_username(&self, username: &str) -> Result<Option<Employee>>;

    /// Inserts an employee.
    ///
    /// Fails with `UniqueViolation` on a duplicate username.
    async fn insert_employee(&self, employee: NewEmployee) -> Result<Employee>;

    /// Updates the editable fields of an employee.
    async fn update_employee(&self, id: EmployeeId, changes: EmployeeChanges) -> Result<Employee>;

    /// Deletes an employee.
    ///
    /// Fails with `InUse` while any sale references it.
    async fn delete_employee(&self, id: EmployeeId) -> Result<()>;

    /// Persists a sale and all its line items as one unit of work.
    ///
    /// On any failure nothing is written. A reference to a missing
    /// customer, employee or product fails with `InvalidReference`.
    async fn insert_sale(&self, sale: NewSale) -> Result<SaleReceipt>;

    /// Retrieves a sale with its line items.
    async fn get_sale(&self, id: SaleId) -> Result<Option<SaleDetail>>;

    /// Lists sales matching a query, most recent first.
    async fn list_sales(&self, query: SaleQuery) -> Result<Vec<SaleSummary>>;

    /// Deletes a sale and all its line items as one unit of work.
    async fn delete_sale(&self, id: SaleId) -> Result<()>;

    /// Sums the totals of all sales within a range.
    async fn sum_sale_totals(&self, range: DateRange) -> Result<Money>;

    /// Groups line items by product name and sums `quantity * unit_price`.
    ///
    /// Without a range every sale ever made is included. Results are ordered
    /// by revenue descending, then by product name.
    async fn revenue_by_product(&self, range: Option<DateRange>) -> Result<Vec<ProductRevenue>>;
}

/// Extension trait providing convenience methods for stores.
#[async_trait]
pub trait StoreExt: Store {
    /// Retrieves a product, failing with `NotFound` if it does not exist.
    async fn require_product(&self, id: ProductId) -> Result<Product> {
        self.get_product(id).await?.ok_or(StoreError::NotFound {
            entity: "Product",
            id: id.as_i64(),
        })
    }

    /// Retrieves a customer, failing with `NotFound` if it does not exist.
    async fn require_customer(&self, id: CustomerId) -> Result<Customer> {
        self.get_customer(id).await?.ok_or(StoreError::NotFound {
            entity: "Customer",
            id: id.as_i64(),
        })
    }

    /// Retrieves an employee, failing with `NotFound` if it does not exist.
    async fn require_employee(&self, id: EmployeeId) -> Result<Employee> {
        self.get_employee(id).await?.ok_or(StoreError::NotFound {
            entity: "Employee",
            id: id.as_i64(),
        })
    }

    /// Retrieves a sale, failing with `NotFound` if it does not exist.
    async fn require_sale(&self, id: SaleId) -> Result<SaleDetail> {
        self.get_sale(id).await?.ok_or(StoreError::NotFound {
            entity: "Sale",
            id: id.as_i64(),
        })
    }
}

// Blanket implementation for all Store implementations
impl<T: Store + ?Sized> StoreExt for T {}

/// Validates a sale before any row is written.
///
/// A committed sale has at least one line, every quantity is positive,
/// the discount is not negative and the total equals the line sum minus
/// the discount, floored at zero.
pub fn validate_sale_for_insert(sale: &NewSale) -> Result<()> {
    if sale.items.is_empty() {
        return Err(StoreError::InvalidSale(
            "a sale needs at least one line item".to_string(),
        ));
    }

    if let Some(item) = sale.items.iter().find(|item| item.quantity == 0) {
        return Err(StoreError::InvalidSale(format!(
            "line for product {} has zero quantity",
            item.product_id
        )));
    }

    if let Some(item) = sale.items.iter().find(|item| item.quantity > MAX_QUANTITY) {
        return Err(StoreError::InvalidSale(format!(
            "line for product {} has quantity {} above {MAX_QUANTITY}",
            item.product_id, item.quantity
        )));
    }

    if sale.discount.is_negative() {
        return Err(StoreError::InvalidSale(format!(
            "discount {} is negative",
            sale.discount
        )));
    }

    let subtotal = sale
        .subtotal()
        .ok_or_else(|| StoreError::InvalidSale("line totals are out of range".to_string()))?;
    let expected = subtotal
        .checked_sub(sale.discount)
        .map_or(Money::zero(), |net| net.max(Money::zero()));
    if sale.total != expected {
        return Err(StoreError::InvalidSale(format!(
            "total {} does not match lines minus discount ({expected})",
            sale.total
        )));
    }

    Ok(())
}
