//! Shared types for the bakery back office.
//!
//! Every other crate in the workspace speaks in these types: typed row
//! identifiers, [`Money`] amounts held in integer cents, and the
//! [`CreditStatus`] a customer carries.

pub mod credit;
pub mod money;
pub mod types;

pub use credit::{CreditStatus, UnknownCreditStatus};
pub use money::{Money, MoneyParseError};
pub use types::{CustomerId, EmployeeId, LineItemId, ProductId, SaleId};
