use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{CreditStatus, CustomerId, EmployeeId, LineItemId, Money, ProductId, SaleId};
use tokio::sync::RwLock;

use crate::{
    Customer, CustomerChanges, DateRange, Employee, EmployeeChanges, LineItem, NewCustomer,
    NewEmployee, NewProduct, NewSale, Product, ProductRevenue, Result, SaleDetail, SaleQuery,
    SaleReceipt, SaleSummary, StoreError,
    store::{Store, validate_sale_for_insert},
};

#[derive(Debug, Clone)]
struct SaleRow {
    id: SaleId,
    customer_id: Option<CustomerId>,
    employee_id: EmployeeId,
    sold_at: DateTime<Utc>,
    total: Money,
    discount: Money,
    payment_method: String,
}

#[derive(Debug, Clone)]
struct LineItemRow {
    id: LineItemId,
    sale_id: SaleId,
    product_id: ProductId,
    quantity: u32,
    unit_price: Money,
}

/// Per-table id sequences, mirroring `BIGSERIAL` columns.
#[derive(Debug, Default)]
struct Sequences {
    product: i64,
    customer: i64,
    employee: i64,
    sale: i64,
    line_item: i64,
}

fn next_id(sequence: &mut i64) -> i64 {
    *sequence += 1;
    *sequence
}

#[derive(Debug, Default)]
struct MemoryState {
    products: BTreeMap<ProductId, Product>,
    customers: BTreeMap<CustomerId, Customer>,
    employees: BTreeMap<EmployeeId, Employee>,
    sales: BTreeMap<SaleId, SaleRow>,
    line_items: BTreeMap<LineItemId, LineItemRow>,
    sequences: Sequences,
}

impl MemoryState {
    fn check_product_unique(&self, product: &NewProduct, except: Option<ProductId>) -> Result<()> {
        for existing in self.products.values().filter(|p| Some(p.id) != except) {
            if existing.name == product.name {
                return Err(StoreError::UniqueViolation { field: "name" });
            }
            if existing.barcode == product.barcode {
                return Err(StoreError::UniqueViolation { field: "barcode" });
            }
        }
        Ok(())
    }

    fn summarize(&self, row: &SaleRow) -> SaleSummary {
        SaleSummary {
            id: row.id,
            customer_id: row.customer_id,
            customer_name: row
                .customer_id
                .and_then(|id| self.customers.get(&id))
                .map(|c| c.name.clone()),
            employee_id: row.employee_id,
            employee_name: self
                .employees
                .get(&row.employee_id)
                .map(|e| e.name.clone())
                .unwrap_or_default(),
            sold_at: row.sold_at,
            total: row.total,
            discount: row.discount,
            payment_method: row.payment_method.clone(),
            item_count: self
                .line_items
                .values()
                .filter(|item| item.sale_id == row.id)
                .count() as u32,
        }
    }
}

/// In-memory store implementation for development and testing.
///
/// Enforces the same uniqueness and referential rules as the PostgreSQL
/// schema, so tests observe the same failures.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of sales stored.
    pub async fn sale_count(&self) -> usize {
        self.state.read().await.sales.len()
    }

    /// Returns the total number of line items stored, across all sales.
    pub async fn line_item_count(&self) -> usize {
        self.state.read().await.line_items.len()
    }

    /// Returns the number of line items whose sale no longer exists.
    pub async fn orphan_line_item_count(&self) -> usize {
        let state = self.state.read().await;
        state
            .line_items
            .values()
            .filter(|item| !state.sales.contains_key(&item.sale_id))
            .count()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>> {
        let state = self.state.read().await;
        let mut products: Vec<_> = state.products.values().cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>> {
        Ok(self.state.read().await.products.get(&id).cloned())
    }

    async fn insert_product(&self, product: NewProduct) -> Result<Product> {
        let mut state = self.state.write().await;
        state.check_product_unique(&product, None)?;

        let id = ProductId::new(next_id(&mut state.sequences.product));
        let product = Product {
            id,
            name: product.name,
            price: product.price,
            barcode: product.barcode,
            manufactured_on: product.manufactured_on,
        };
        state.products.insert(id, product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: ProductId, product: NewProduct) -> Result<Product> {
        let mut state = self.state.write().await;
        if !state.products.contains_key(&id) {
            return Err(StoreError::NotFound {
                entity: "Product",
                id: id.as_i64(),
            });
        }
        state.check_product_unique(&product, Some(id))?;

        let product = Product {
            id,
            name: product.name,
            price: product.price,
            barcode: product.barcode,
            manufactured_on: product.manufactured_on,
        };
        state.products.insert(id, product.clone());
        Ok(product)
    }

    async fn delete_product(&self, id: ProductId) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.products.contains_key(&id) {
            return Err(StoreError::NotFound {
                entity: "Product",
                id: id.as_i64(),
            });
        }
        if state.line_items.values().any(|item| item.product_id == id) {
            return Err(StoreError::InUse { entity: "Product" });
        }
        state.products.remove(&id);
        Ok(())
    }

    async fn list_customers(&self) -> Result<Vec<Customer>> {
        let state = self.state.read().await;
        let mut customers: Vec<_> = state.customers.values().cloned().collect();
        customers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(customers)
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>> {
        Ok(self.state.read().await.customers.get(&id).cloned())
    }

    async fn insert_customer(&self, customer: NewCustomer) -> Result<Customer> {
        let mut state = self.state.write().await;
        if state
            .customers
            .values()
            .any(|c| c.national_id == customer.national_id)
        {
            return Err(StoreError::UniqueViolation {
                field: "national_id",
            });
        }

        let id = CustomerId::new(next_id(&mut state.sequences.customer));
        let customer = Customer {
            id,
            name: customer.name,
            national_id: customer.national_id,
            contact: customer.contact,
            email: customer.email,
            credit_status: customer.credit_status,
        };
        state.customers.insert(id, customer.clone());
        Ok(customer)
    }

    async fn update_customer(&self, id: CustomerId, changes: CustomerChanges) -> Result<Customer> {
        let mut state = self.state.write().await;
        let customer = state.customers.get_mut(&id).ok_or(StoreError::NotFound {
            entity: "Customer",
            id: id.as_i64(),
        })?;

        customer.name = changes.name;
        customer.contact = changes.contact;
        customer.email = changes.email;
        customer.credit_status = changes.credit_status;
        Ok(customer.clone())
    }

    async fn set_credit_status(&self, id: CustomerId, status: CreditStatus) -> Result<()> {
        let mut state = self.state.write().await;
        let customer = state.customers.get_mut(&id).ok_or(StoreError::NotFound {
            entity: "Customer",
            id: id.as_i64(),
        })?;
        customer.credit_status = status;
        Ok(())
    }

    async fn delete_customer(&self, id: CustomerId) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.customers.contains_key(&id) {
            return Err(StoreError::NotFound {
                entity: "Customer",
                id: id.as_i64(),
            });
        }
        if state.sales.values().any(|s| s.customer_id == Some(id)) {
            return Err(StoreError::InUse { entity: "Customer" });
        }
        state.customers.remove(&id);
        Ok(())
    }

    async fn list_employees(&self) -> Result<Vec<Employee>> {
        let state = self.state.read().await;
        let mut employees: Vec<_> = state.employees.values().cloned().collect();
        employees.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(employees)
    }

    async fn get_employee(&self, id: EmployeeId) -> Result<Option<Employee>> {
        Ok(self.state.read().await.employees.get(&id).cloned())
    }

    async fn find_employee_by_username(&self, username: &str) -> Result<Option<Employee>> {
        Ok(self
            .state
            .read()
            .await
            .employees
            .values()
            .find(|e| e.username == username)
            .cloned())
    }

    async fn insert_employee(&self, employee: NewEmployee) -> Result<Employee> {
        let mut state = self.state.write().await;
        if state
            .employees
            .values()
            .any(|e| e.username == employee.username)
        {
            return Err(StoreError::UniqueViolation { field: "username" });
        }

        let id = EmployeeId::new(next_id(&mut state.sequences.employee));
        let employee = Employee {
            id,
            username: employee.username,
            password_hash: employee.password_hash,
            name: employee.name,
            role: employee.role,
        };
        state.employees.insert(id, employee.clone());
        Ok(employee)
    }

    async fn update_employee(&self, id: EmployeeId, changes: EmployeeChanges) -> Result<Employee> {
        let mut state = self.state.write().await;
        let employee = state.employees.get_mut(&id).ok_or(StoreError::NotFound {
            entity: "Employee",
            id: id.as_i64(),
        })?;

        employee.name = changes.name;
        employee.role = changes.role;
        if let Some(hash) = changes.password_hash {
            employee.password_hash = hash;
        }
        Ok(employee.clone())
    }

    async fn delete_employee(&self, id: EmployeeId) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.employees.contains_key(&id) {
            return Err(StoreError::NotFound {
                entity: "Employee",
                id: id.as_i64(),
            });
        }
        if state.sales.values().any(|s| s.employee_id == id) {
            return Err(StoreError::InUse { entity: "Employee" });
        }
        state.employees.remove(&id);
        Ok(())
    }

    async fn insert_sale(&self, sale: NewSale) -> Result<SaleReceipt> {
        validate_sale_for_insert(&sale)?;

        let mut state = self.state.write().await;

        // Check every reference before the first write, so a failure leaves
        // nothing behind.
        if let Some(customer_id) = sale.customer_id
            && !state.customers.contains_key(&customer_id)
        {
            return Err(StoreError::InvalidReference {
                field: "customer_id",
            });
        }
        if !state.employees.contains_key(&sale.employee_id) {
            return Err(StoreError::InvalidReference {
                field: "employee_id",
            });
        }
        if sale
            .items
            .iter()
            .any(|item| !state.products.contains_key(&item.product_id))
        {
            return Err(StoreError::InvalidReference {
                field: "product_id",
            });
        }

        let sale_id = SaleId::new(next_id(&mut state.sequences.sale));
        state.sales.insert(
            sale_id,
            SaleRow {
                id: sale_id,
                customer_id: sale.customer_id,
                employee_id: sale.employee_id,
                sold_at: sale.sold_at,
                total: sale.total,
                discount: sale.discount,
                payment_method: sale.payment_method,
            },
        );

        for item in sale.items {
            let id = LineItemId::new(next_id(&mut state.sequences.line_item));
            state.line_items.insert(
                id,
                LineItemRow {
                    id,
                    sale_id,
                    product_id: item.product_id,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                },
            );
        }

        Ok(SaleReceipt {
            sale_id,
            total: sale.total,
        })
    }

    async fn get_sale(&self, id: SaleId) -> Result<Option<SaleDetail>> {
        let state = self.state.read().await;
        let Some(row) = state.sales.get(&id) else {
            return Ok(None);
        };

        let items = state
            .line_items
            .values()
            .filter(|item| item.sale_id == id)
            .map(|item| LineItem {
                id: item.id,
                sale_id: item.sale_id,
                product_id: item.product_id,
                product_name: state
                    .products
                    .get(&item.product_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_default(),
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect();

        Ok(Some(SaleDetail {
            sale: state.summarize(row),
            items,
        }))
    }

    async fn list_sales(&self, query: SaleQuery) -> Result<Vec<SaleSummary>> {
        let state = self.state.read().await;
        let mut rows: Vec<&SaleRow> = state
            .sales
            .values()
            .filter(|s| query.range.is_none_or(|range| range.contains(s.sold_at)))
            .collect();

        rows.sort_by(|a, b| b.sold_at.cmp(&a.sold_at).then(b.id.cmp(&a.id)));

        Ok(rows.into_iter().map(|row| state.summarize(row)).collect())
    }

    async fn delete_sale(&self, id: SaleId) -> Result<()> {
        let mut state = self.state.write().await;
        if state.sales.remove(&id).is_none() {
            return Err(StoreError::NotFound {
                entity: "Sale",
                id: id.as_i64(),
            });
        }
        state.line_items.retain(|_, item| item.sale_id != id);
        Ok(())
    }

    async fn sum_sale_totals(&self, range: DateRange) -> Result<Money> {
        let state = self.state.read().await;
        Money::checked_sum(
            state
                .sales
                .values()
                .filter(|s| range.contains(s.sold_at))
                .map(|s| s.total),
        )
        .ok_or(StoreError::AmountOutOfRange {
            what: "sales total",
        })
    }

    async fn revenue_by_product(&self, range: Option<DateRange>) -> Result<Vec<ProductRevenue>> {
        let state = self.state.read().await;
        let mut totals: HashMap<String, Money> = HashMap::new();

        for item in state.line_items.values() {
            if let Some(range) = range {
                let in_range = state
                    .sales
                    .get(&item.sale_id)
                    .is_some_and(|s| range.contains(s.sold_at));
                if !in_range {
                    continue;
                }
            }
            let Some(product) = state.products.get(&item.product_id) else {
                continue;
            };
            let revenue = totals.entry(product.name.clone()).or_default();
            *revenue = item
                .unit_price
                .checked_mul(item.quantity)
                .and_then(|line| revenue.checked_add(line))
                .ok_or(StoreError::AmountOutOfRange {
                    what: "product revenue",
                })?;
        }

        let mut revenue: Vec<ProductRevenue> = totals
            .into_iter()
            .map(|(product_name, revenue)| ProductRevenue {
                product_name,
                revenue,
            })
            .collect();
        revenue.sort_by(|a, b| {
            b.revenue
                .cmp(&a.revenue)
                .then_with(|| a.product_name.cmp(&b.product_name))
        });
        Ok(revenue)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, NaiveDate, TimeZone};

    use super::*;
    use crate::{NewLineItem, StoreExt};

    fn new_product(name: &str, barcode: &str, cents: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price: Money::from_cents(cents),
            barcode: barcode.to_string(),
            manufactured_on: "2024-01-01".to_string(),
        }
    }

    fn new_employee(username: &str) -> NewEmployee {
        NewEmployee {
            username: username.to_string(),
            password_hash: "hash".to_string(),
            name: format!("Employee {username}"),
            role: "Cashier".to_string(),
        }
    }

    fn new_customer(national_id: &str) -> NewCustomer {
        NewCustomer {
            name: "Maria".to_string(),
            national_id: national_id.to_string(),
            contact: "555-0100".to_string(),
            email: "maria@example.com".to_string(),
            credit_status: CreditStatus::Pending,
        }
    }

    fn sale_of(
        employee: EmployeeId,
        customer: Option<CustomerId>,
        lines: &[(&Product, u32)],
        sold_at: DateTime<Utc>,
    ) -> NewSale {
        let items: Vec<NewLineItem> = lines
            .iter()
            .map(|(product, quantity)| NewLineItem {
                product_id: product.id,
                quantity: *quantity,
                unit_price: product.price,
            })
            .collect();
        let total = items
            .iter()
            .map(|item| item.total_price().unwrap())
            .try_fold(Money::zero(), |acc, line| acc.checked_add(line))
            .unwrap();
        NewSale {
            customer_id: customer,
            employee_id: employee,
            sold_at,
            total,
            discount: Money::zero(),
            payment_method: "Cash".to_string(),
            items,
        }
    }

    #[tokio::test]
    async fn product_crud_and_uniqueness() {
        let store = InMemoryStore::new();
        let bread = store
            .insert_product(new_product("Bread", "789001", 1000))
            .await
            .unwrap();
        store
            .insert_product(new_product("Cake", "789002", 3500))
            .await
            .unwrap();

        let dup_name = store
            .insert_product(new_product("Bread", "789003", 100))
            .await;
        assert!(matches!(
            dup_name,
            Err(StoreError::UniqueViolation { field: "name" })
        ));

        let dup_barcode = store
            .update_product(bread.id, new_product("Baguette", "789002", 100))
            .await;
        assert!(matches!(
            dup_barcode,
            Err(StoreError::UniqueViolation { field: "barcode" })
        ));

        // Updating a product with its own values is not a conflict.
        let updated = store
            .update_product(bread.id, new_product("Bread", "789001", 1200))
            .await
            .unwrap();
        assert_eq!(updated.price.cents(), 1200);

        let names: Vec<_> = store
            .list_products()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Bread", "Cake"]);
    }

    #[tokio::test]
    async fn insert_sale_with_missing_product_writes_nothing() {
        let store = InMemoryStore::new();
        let employee = store.insert_employee(new_employee("ana")).await.unwrap();
        let bread = store
            .insert_product(new_product("Bread", "1", 1000))
            .await
            .unwrap();
        let ghost = Product {
            id: ProductId::new(999),
            ..bread.clone()
        };

        let result = store
            .insert_sale(sale_of(
                employee.id,
                None,
                &[(&bread, 1), (&ghost, 1)],
                Utc::now(),
            ))
            .await;

        assert!(matches!(
            result,
            Err(StoreError::InvalidReference {
                field: "product_id"
            })
        ));
        assert_eq!(store.sale_count().await, 0);
        assert_eq!(store.line_item_count().await, 0);
    }

    #[tokio::test]
    async fn insert_sale_with_missing_customer_writes_nothing() {
        let store = InMemoryStore::new();
        let employee = store.insert_employee(new_employee("ana")).await.unwrap();
        let bread = store
            .insert_product(new_product("Bread", "1", 1000))
            .await
            .unwrap();

        let result = store
            .insert_sale(sale_of(
                employee.id,
                Some(CustomerId::new(77)),
                &[(&bread, 1)],
                Utc::now(),
            ))
            .await;

        assert!(matches!(
            result,
            Err(StoreError::InvalidReference {
                field: "customer_id"
            })
        ));
        assert_eq!(store.sale_count().await, 0);
    }

    #[tokio::test]
    async fn delete_sale_cascades_to_line_items() {
        let store = InMemoryStore::new();
        let employee = store.insert_employee(new_employee("ana")).await.unwrap();
        let bread = store
            .insert_product(new_product("Bread", "1", 1000))
            .await
            .unwrap();
        let cake = store
            .insert_product(new_product("Cake", "2", 2000))
            .await
            .unwrap();

        let first = store
            .insert_sale(sale_of(
                employee.id,
                None,
                &[(&bread, 1), (&cake, 2)],
                Utc::now(),
            ))
            .await
            .unwrap();
        store
            .insert_sale(sale_of(employee.id, None, &[(&bread, 3)], Utc::now()))
            .await
            .unwrap();
        assert_eq!(store.line_item_count().await, 3);

        store.delete_sale(first.sale_id).await.unwrap();

        assert_eq!(store.sale_count().await, 1);
        assert_eq!(store.line_item_count().await, 1);
        assert_eq!(store.orphan_line_item_count().await, 0);
        assert!(matches!(
            store.delete_sale(first.sale_id).await,
            Err(StoreError::NotFound { entity: "Sale", .. })
        ));
    }

    #[tokio::test]
    async fn referenced_rows_cannot_be_deleted() {
        let store = InMemoryStore::new();
        let employee = store.insert_employee(new_employee("ana")).await.unwrap();
        let customer = store.insert_customer(new_customer("123")).await.unwrap();
        let bread = store
            .insert_product(new_product("Bread", "1", 1000))
            .await
            .unwrap();
        store
            .insert_sale(sale_of(
                employee.id,
                Some(customer.id),
                &[(&bread, 1)],
                Utc::now(),
            ))
            .await
            .unwrap();

        assert!(matches!(
            store.delete_product(bread.id).await,
            Err(StoreError::InUse { entity: "Product" })
        ));
        assert!(matches!(
            store.delete_customer(customer.id).await,
            Err(StoreError::InUse { entity: "Customer" })
        ));
        assert!(matches!(
            store.delete_employee(employee.id).await,
            Err(StoreError::InUse { entity: "Employee" })
        ));

        assert!(store.require_product(bread.id).await.is_ok());
        assert!(store.require_customer(customer.id).await.is_ok());
        assert!(store.require_employee(employee.id).await.is_ok());
        assert_eq!(store.line_item_count().await, 1);
    }

    #[tokio::test]
    async fn list_sales_filters_and_orders_newest_first() {
        let store = InMemoryStore::new();
        let employee = store.insert_employee(new_employee("ana")).await.unwrap();
        let bread = store
            .insert_product(new_product("Bread", "1", 1000))
            .await
            .unwrap();

        for day in [1, 5, 3] {
            let at = Utc.with_ymd_and_hms(2024, 6, day, 10, 0, 0).unwrap();
            store
                .insert_sale(sale_of(employee.id, None, &[(&bread, day)], at))
                .await
                .unwrap();
        }

        let all = store.list_sales(SaleQuery::new()).await.unwrap();
        let days: Vec<u32> = all
            .iter()
            .map(|s| s.sold_at.day())
            .collect();
        assert_eq!(days, vec![5, 3, 1]);
        assert_eq!(all[0].employee_name, "Employee ana");
        assert_eq!(all[0].item_count, 1);

        let range = DateRange::days(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
        );
        let ranged = store.list_sales(SaleQuery::in_range(range)).await.unwrap();
        assert_eq!(ranged.len(), 2);
        assert_eq!(
            store.sum_sale_totals(range).await.unwrap(),
            Money::from_cents(4000)
        );
    }

    #[tokio::test]
    async fn sums_beyond_the_cents_range_are_errors() {
        let store = InMemoryStore::new();
        let employee = store.insert_employee(new_employee("ana")).await.unwrap();
        let gold = store
            .insert_product(new_product("Gold cake", "1", i64::MAX / 2 + 1))
            .await
            .unwrap();

        for day in [1, 2] {
            let at = Utc.with_ymd_and_hms(2024, 6, day, 10, 0, 0).unwrap();
            store
                .insert_sale(sale_of(employee.id, None, &[(&gold, 1)], at))
                .await
                .unwrap();
        }

        let june = DateRange::days(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        );
        assert!(matches!(
            store.sum_sale_totals(june).await,
            Err(StoreError::AmountOutOfRange { .. })
        ));
        assert!(matches!(
            store.revenue_by_product(None).await,
            Err(StoreError::AmountOutOfRange { .. })
        ));
    }

    #[tokio::test]
    async fn sale_with_quantity_above_column_range_is_rejected() {
        let store = InMemoryStore::new();
        let employee = store.insert_employee(new_employee("ana")).await.unwrap();
        let crumb = store
            .insert_product(new_product("Crumb", "1", 1))
            .await
            .unwrap();

        let sale = sale_of(
            employee.id,
            None,
            &[(&crumb, crate::limits::MAX_QUANTITY + 1)],
            Utc::now(),
        );
        assert!(matches!(
            store.insert_sale(sale).await,
            Err(StoreError::InvalidSale(_))
        ));
        assert!(store.list_sales(SaleQuery::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn revenue_groups_by_product_name() {
        let store = InMemoryStore::new();
        let employee = store.insert_employee(new_employee("ana")).await.unwrap();
        let bread = store
            .insert_product(new_product("Bread", "1", 1000))
            .await
            .unwrap();
        let cake = store
            .insert_product(new_product("Cake", "2", 550))
            .await
            .unwrap();

        store
            .insert_sale(sale_of(
                employee.id,
                None,
                &[(&bread, 2), (&cake, 1)],
                Utc::now(),
            ))
            .await
            .unwrap();
        store
            .insert_sale(sale_of(employee.id, None, &[(&bread, 1)], Utc::now()))
            .await
            .unwrap();

        let revenue = store.revenue_by_product(None).await.unwrap();
        assert_eq!(revenue.len(), 2);
        assert_eq!(revenue[0].product_name, "Bread");
        assert_eq!(revenue[0].revenue, Money::from_cents(3000));
        assert_eq!(revenue[1].product_name, "Cake");
        assert_eq!(revenue[1].revenue, Money::from_cents(550));
    }

    #[tokio::test]
    async fn customer_updates_keep_national_id() {
        let store = InMemoryStore::new();
        let customer = store.insert_customer(new_customer("555")).await.unwrap();

        let updated = store
            .update_customer(
                customer.id,
                CustomerChanges {
                    name: "Maria Souza".to_string(),
                    contact: String::new(),
                    email: String::new(),
                    credit_status: CreditStatus::Approved,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.national_id, "555");
        assert_eq!(updated.credit_status, CreditStatus::Approved);

        store
            .set_credit_status(customer.id, CreditStatus::Denied)
            .await
            .unwrap();
        let reloaded = store.require_customer(customer.id).await.unwrap();
        assert_eq!(reloaded.credit_status, CreditStatus::Denied);

        assert!(matches!(
            store.insert_customer(new_customer("555")).await,
            Err(StoreError::UniqueViolation {
                field: "national_id"
            })
        ));
    }
}
