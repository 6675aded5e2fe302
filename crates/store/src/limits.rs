//! Column limits of the SQL schema.
//!
//! Lengths count characters, as `VARCHAR(n)` does. Callers validate
//! against these so both store implementations accept the same rows.

/// `products.name`
pub const PRODUCT_NAME_MAX: usize = 80;
/// `products.barcode`
pub const BARCODE_MAX: usize = 50;
/// `customers.name` and `employees.name`
pub const PERSON_NAME_MAX: usize = 100;
/// `customers.national_id`, after normalization
pub const NATIONAL_ID_MAX: usize = 20;
/// `customers.contact`
pub const CONTACT_MAX: usize = 20;
/// `customers.email`
pub const EMAIL_MAX: usize = 100;
/// `employees.username`
pub const USERNAME_MAX: usize = 80;
/// `employees.role`
pub const ROLE_MAX: usize = 50;
/// `sales.payment_method`
pub const PAYMENT_METHOD_MAX: usize = 50;

/// Largest quantity a line item can hold (`line_items.quantity INTEGER`).
pub const MAX_QUANTITY: u32 = i32::MAX as u32;
