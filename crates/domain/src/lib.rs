//! Domain layer for the bakery back office.
//!
//! This crate holds the rules that sit between the HTTP surface and the
//! [`store`]:
//! - [`SaleBuilder`] prices submitted lines and computes the net total
//! - [`check_credit`] simulates a credit bureau decision
//! - services wrapping a [`store::Store`] for the catalog, customers,
//!   employees and sales
//! - [`Actor`], the request-scoped identity of the logged-in employee

pub mod auth;
pub mod catalog;
pub mod context;
pub mod credit;
pub mod customer;
pub mod employee;
pub mod error;
pub mod input;
pub mod sale;

pub use auth::{hash_password, verify_password};
pub use catalog::{CatalogService, ProductForm};
pub use context::Actor;
pub use credit::check_credit;
pub use customer::{CustomerEditForm, CustomerForm, CustomerService};
pub use employee::{EmployeeEditForm, EmployeeForm, EmployeeService};
pub use error::{DomainError, Result, ValidationError};
pub use input::normalize_national_id;
pub use sale::{
    CustomerOption, DEFAULT_PAYMENT_METHOD, ProductOption, SaleBuilder, SaleForm,
    SaleFormOptions, SaleLineForm, SaleService, parse_discount, receipt_message,
};
