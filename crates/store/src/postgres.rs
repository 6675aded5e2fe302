use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{CreditStatus, CustomerId, EmployeeId, LineItemId, Money, ProductId, SaleId};
use sqlx::error::ErrorKind;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

use crate::{
    Customer, CustomerChanges, DateRange, Employee, EmployeeChanges, LineItem, NewCustomer,
    NewEmployee, NewProduct, NewSale, Product, ProductRevenue, Result, SaleDetail, SaleQuery,
    SaleReceipt, SaleSummary, StoreError,
    store::{Store, validate_sale_for_insert},
};

const PRODUCT_COLUMNS: &str = "id, name, price_cents, barcode, manufactured_on";
const CUSTOMER_COLUMNS: &str = "id, name, national_id, contact, email, credit_status";
const EMPLOYEE_COLUMNS: &str = "id, username, password_hash, name, role";

const SALE_SUMMARY_SELECT: &str = r#"
    SELECT s.id, s.customer_id, c.name AS customer_name, s.employee_id,
           e.name AS employee_name, s.sold_at, s.total_cents, s.discount_cents,
           s.payment_method,
           (SELECT COUNT(*) FROM line_items li WHERE li.sale_id = s.id) AS item_count
    FROM sales s
    LEFT JOIN customers c ON c.id = s.customer_id
    JOIN employees e ON e.id = s.employee_id
"#;

/// Maps a constraint name from the schema to the form field it guards.
fn constraint_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("products_name_key") => "name",
        Some("products_barcode_key") => "barcode",
        Some("customers_national_id_key") => "national_id",
        Some("employees_username_key") => "username",
        Some("sales_customer_id_fkey") => "customer_id",
        Some("sales_employee_id_fkey") => "employee_id",
        Some("line_items_product_id_fkey") => "product_id",
        Some("line_items_sale_id_fkey") => "sale_id",
        _ => "record",
    }
}

/// SQLSTATE raised when a `BIGINT` cast or product overflows.
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

/// Classifies a failed insert or update.
fn write_error(err: sqlx::Error) -> StoreError {
    let mapped = err.as_database_error().and_then(|db_err| {
        let field = constraint_field(db_err.constraint());
        match db_err.kind() {
            ErrorKind::UniqueViolation => Some(StoreError::UniqueViolation { field }),
            ErrorKind::ForeignKeyViolation => Some(StoreError::InvalidReference { field }),
            _ => None,
        }
    });
    mapped.unwrap_or(StoreError::Database(err))
}

/// Classifies a failed delete; a foreign key failure means the row is referenced.
fn delete_error(err: sqlx::Error, entity: &'static str) -> StoreError {
    let referenced = err
        .as_database_error()
        .is_some_and(|db_err| matches!(db_err.kind(), ErrorKind::ForeignKeyViolation));
    if referenced {
        StoreError::InUse { entity }
    } else {
        StoreError::Database(err)
    }
}

/// Classifies a failed aggregate; a numeric overflow means the sum left the cents range.
fn sum_error(err: sqlx::Error, what: &'static str) -> StoreError {
    let overflowed = err
        .as_database_error()
        .is_some_and(|db_err| db_err.code().as_deref() == Some(NUMERIC_VALUE_OUT_OF_RANGE));
    if overflowed {
        StoreError::AmountOutOfRange { what }
    } else {
        StoreError::Database(err)
    }
}

fn decode_error(column: &str, source: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    }
}

/// PostgreSQL-backed store implementation.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool and wraps it in a store.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        tracing::info!("database migrations applied");
        Ok(())
    }

    fn row_to_product(row: PgRow) -> Result<Product> {
        Ok(Product {
            id: ProductId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            price: Money::from_cents(row.try_get("price_cents")?),
            barcode: row.try_get("barcode")?,
            manufactured_on: row.try_get("manufactured_on")?,
        })
    }

    fn row_to_customer(row: PgRow) -> Result<Customer> {
        let status: String = row.try_get("credit_status")?;
        Ok(Customer {
            id: CustomerId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            national_id: row.try_get("national_id")?,
            contact: row.try_get("contact")?,
            email: row.try_get("email")?,
            credit_status: status
                .parse::<CreditStatus>()
                .map_err(|e| decode_error("credit_status", e))?,
        })
    }

    fn row_to_employee(row: PgRow) -> Result<Employee> {
        Ok(Employee {
            id: EmployeeId::new(row.try_get("id")?),
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
            name: row.try_get("name")?,
            role: row.try_get("role")?,
        })
    }

    fn row_to_sale_summary(row: &PgRow) -> Result<SaleSummary> {
        let item_count: i64 = row.try_get("item_count")?;
        Ok(SaleSummary {
            id: SaleId::new(row.try_get("id")?),
            customer_id: row
                .try_get::<Option<i64>, _>("customer_id")?
                .map(CustomerId::new),
            customer_name: row.try_get("customer_name")?,
            employee_id: EmployeeId::new(row.try_get("employee_id")?),
            employee_name: row.try_get("employee_name")?,
            sold_at: row.try_get::<DateTime<Utc>, _>("sold_at")?,
            total: Money::from_cents(row.try_get("total_cents")?),
            discount: Money::from_cents(row.try_get("discount_cents")?),
            payment_method: row.try_get("payment_method")?,
            item_count: u32::try_from(item_count).map_err(|e| decode_error("item_count", e))?,
        })
    }

    fn row_to_line_item(row: &PgRow) -> Result<LineItem> {
        let quantity: i32 = row.try_get("quantity")?;
        Ok(LineItem {
            id: LineItemId::new(row.try_get("id")?),
            sale_id: SaleId::new(row.try_get("sale_id")?),
            product_id: ProductId::new(row.try_get("product_id")?),
            product_name: row.try_get("product_name")?,
            quantity: u32::try_from(quantity).map_err(|e| decode_error("quantity", e))?,
            unit_price: Money::from_cents(row.try_get("unit_price_cents")?),
        })
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn list_products(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_product).collect()
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_product).transpose()
    }

    async fn insert_product(&self, product: NewProduct) -> Result<Product> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO products (name, price_cents, barcode, manufactured_on)
            VALUES ($1, $2, $3, $4)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&product.name)
        .bind(product.price.cents())
        .bind(&product.barcode)
        .bind(&product.manufactured_on)
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)?;

        Self::row_to_product(row)
    }

    async fn update_product(&self, id: ProductId, product: NewProduct) -> Result<Product> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE products
            SET name = $2, price_cents = $3, barcode = $4, manufactured_on = $5
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id.as_i64())
        .bind(&product.name)
        .bind(product.price.cents())
        .bind(&product.barcode)
        .bind(&product.manufactured_on)
        .fetch_optional(&self.pool)
        .await
        .map_err(write_error)?;

        match row {
            Some(row) => Self::row_to_product(row),
            None => Err(StoreError::NotFound {
                entity: "Product",
                id: id.as_i64(),
            }),
        }
    }

    async fn delete_product(&self, id: ProductId) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| delete_error(e, "Product"))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "Product",
                id: id.as_i64(),
            });
        }
        Ok(())
    }

    async fn list_customers(&self) -> Result<Vec<Customer>> {
        let rows = sqlx::query(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY name ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_customer).collect()
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>> {
        let row = sqlx::query(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_customer).transpose()
    }

    async fn insert_customer(&self, customer: NewCustomer) -> Result<Customer> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO customers (name, national_id, contact, email, credit_status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(&customer.name)
        .bind(&customer.national_id)
        .bind(&customer.contact)
        .bind(&customer.email)
        .bind(customer.credit_status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)?;

        Self::row_to_customer(row)
    }

    async fn update_customer(&self, id: CustomerId, changes: CustomerChanges) -> Result<Customer> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE customers
            SET name = $2, contact = $3, email = $4, credit_status = $5
            WHERE id = $1
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(id.as_i64())
        .bind(&changes.name)
        .bind(&changes.contact)
        .bind(&changes.email)
        .bind(changes.credit_status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(write_error)?;

        match row {
            Some(row) => Self::row_to_customer(row),
            None => Err(StoreError::NotFound {
                entity: "Customer",
                id: id.as_i64(),
            }),
        }
    }

    async fn set_credit_status(&self, id: CustomerId, status: CreditStatus) -> Result<()> {
        let result = sqlx::query("UPDATE customers SET credit_status = $2 WHERE id = $1")
            .bind(id.as_i64())
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "Customer",
                id: id.as_i64(),
            });
        }
        Ok(())
    }

    async fn delete_customer(&self, id: CustomerId) -> Result<()> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| delete_error(e, "Customer"))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "Customer",
                id: id.as_i64(),
            });
        }
        Ok(())
    }

    async fn list_employees(&self) -> Result<Vec<Employee>> {
        let rows = sqlx::query(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY name ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_employee).collect()
    }

    async fn get_employee(&self, id: EmployeeId) -> Result<Option<Employee>> {
        let row = sqlx::query(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_employee).transpose()
    }

    async fn find_employee_by_username(&self, username: &str) -> Result<Option<Employee>> {
        let row = sqlx::query(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_employee).transpose()
    }

    async fn insert_employee(&self, employee: NewEmployee) -> Result<Employee> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO employees (username, password_hash, name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING {EMPLOYEE_COLUMNS}
            "#
        ))
        .bind(&employee.username)
        .bind(&employee.password_hash)
        .bind(&employee.name)
        .bind(&employee.role)
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)?;

        Self::row_to_employee(row)
    }

    async fn update_employee(&self, id: EmployeeId, changes: EmployeeChanges) -> Result<Employee> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE employees
            SET name = $2, role = $3, password_hash = COALESCE($4, password_hash)
            WHERE id = $1
            RETURNING {EMPLOYEE_COLUMNS}
            "#
        ))
        .bind(id.as_i64())
        .bind(&changes.name)
        .bind(&changes.role)
        .bind(changes.password_hash.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(write_error)?;

        match row {
            Some(row) => Self::row_to_employee(row),
            None => Err(StoreError::NotFound {
                entity: "Employee",
                id: id.as_i64(),
            }),
        }
    }

    async fn delete_employee(&self, id: EmployeeId) -> Result<()> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| delete_error(e, "Employee"))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "Employee",
                id: id.as_i64(),
            });
        }
        Ok(())
    }

    async fn insert_sale(&self, sale: NewSale) -> Result<SaleReceipt> {
        validate_sale_for_insert(&sale)?;

        // Start a transaction; returning early drops it, which rolls back.
        let mut tx = self.pool.begin().await?;

        let sale_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO sales (customer_id, employee_id, sold_at, total_cents, discount_cents, payment_method)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(sale.customer_id.map(|id| id.as_i64()))
        .bind(sale.employee_id.as_i64())
        .bind(sale.sold_at)
        .bind(sale.total.cents())
        .bind(sale.discount.cents())
        .bind(&sale.payment_method)
        .fetch_one(&mut *tx)
        .await
        .map_err(write_error)?;

        for item in &sale.items {
            let quantity = i32::try_from(item.quantity).map_err(|_| {
                StoreError::InvalidSale(format!("quantity {} is too large", item.quantity))
            })?;

            sqlx::query(
                r#"
                INSERT INTO line_items (sale_id, product_id, quantity, unit_price_cents)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(sale_id)
            .bind(item.product_id.as_i64())
            .bind(quantity)
            .bind(item.unit_price.cents())
            .execute(&mut *tx)
            .await
            .map_err(write_error)?;
        }

        tx.commit().await?;
        tracing::debug!(sale_id, lines = sale.items.len(), "sale stored");

        Ok(SaleReceipt {
            sale_id: SaleId::new(sale_id),
            total: sale.total,
        })
    }

    async fn get_sale(&self, id: SaleId) -> Result<Option<SaleDetail>> {
        let Some(row) = sqlx::query(&format!("{SALE_SUMMARY_SELECT} WHERE s.id = $1"))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };
        let sale = Self::row_to_sale_summary(&row)?;

        let item_rows = sqlx::query(
            r#"
            SELECT li.id, li.sale_id, li.product_id, p.name AS product_name,
                   li.quantity, li.unit_price_cents
            FROM line_items li
            JOIN products p ON p.id = li.product_id
            WHERE li.sale_id = $1
            ORDER BY li.id ASC
            "#,
        )
        .bind(id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        let items = item_rows
            .iter()
            .map(Self::row_to_line_item)
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(SaleDetail { sale, items }))
    }

    async fn list_sales(&self, query: SaleQuery) -> Result<Vec<SaleSummary>> {
        let mut sql = format!("{SALE_SUMMARY_SELECT} WHERE 1=1");
        if query.range.is_some() {
            sql.push_str(" AND s.sold_at >= $1 AND s.sold_at < $2");
        }
        sql.push_str(" ORDER BY s.sold_at DESC, s.id DESC");

        let mut sqlx_query = sqlx::query(&sql);
        if let Some(range) = query.range {
            sqlx_query = sqlx_query.bind(range.start()).bind(range.end_exclusive());
        }

        let rows = sqlx_query.fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_sale_summary).collect()
    }

    async fn delete_sale(&self, id: SaleId) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM line_items WHERE sale_id = $1")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "Sale",
                id: id.as_i64(),
            });
        }

        tx.commit().await?;
        tracing::debug!(sale_id = %id, "sale and its lines removed");
        Ok(())
    }

    async fn sum_sale_totals(&self, range: DateRange) -> Result<Money> {
        let cents: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total_cents), 0)::BIGINT
            FROM sales
            WHERE sold_at >= $1 AND sold_at < $2
            "#,
        )
        .bind(range.start())
        .bind(range.end_exclusive())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| sum_error(err, "sales total"))?;

        Ok(Money::from_cents(cents))
    }

    async fn revenue_by_product(&self, range: Option<DateRange>) -> Result<Vec<ProductRevenue>> {
        let rows = sqlx::query(
            r#"
            SELECT p.name AS product_name,
                   SUM(li.quantity::NUMERIC * li.unit_price_cents)::BIGINT AS revenue_cents
            FROM line_items li
            JOIN products p ON p.id = li.product_id
            JOIN sales s ON s.id = li.sale_id
            WHERE ($1::TIMESTAMPTZ IS NULL OR s.sold_at >= $1)
              AND ($2::TIMESTAMPTZ IS NULL OR s.sold_at < $2)
            GROUP BY p.name
            ORDER BY revenue_cents DESC, p.name ASC
            "#,
        )
        .bind(range.map(|r| r.start()))
        .bind(range.map(|r| r.end_exclusive()))
        .fetch_all(&self.pool)
        .await
        .map_err(|err| sum_error(err, "product revenue"))?;

        rows.iter()
            .map(|row| {
                Ok(ProductRevenue {
                    product_name: row.try_get("product_name")?,
                    revenue: Money::from_cents(row.try_get("revenue_cents")?),
                })
            })
            .collect()
    }
}
