//! Relational storage for the bakery back office.
//!
//! The [`Store`] trait is the only durable contract: products, customers,
//! employees, sales with their line items, and the grouped sums reports
//! read. Two implementations share it, [`PostgresStore`] for deployments
//! and [`InMemoryStore`] for development and tests.

pub mod error;
pub mod limits;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod records;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use query::{DateRange, SaleQuery};
pub use records::{
    Customer, CustomerChanges, Employee, EmployeeChanges, LineItem, NewCustomer, NewEmployee,
    NewLineItem, NewProduct, NewSale, Product, ProductRevenue, SaleDetail, SaleReceipt,
    SaleSummary,
};
pub use store::{Store, StoreExt, validate_sale_for_insert};
