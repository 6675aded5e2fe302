//! Row types read from and written to the store.

use chrono::{DateTime, Utc};
use common::{CreditStatus, CustomerId, EmployeeId, LineItemId, Money, ProductId, SaleId};
use serde::Serialize;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub barcode: String,
    /// Free-form manufacture date as typed by staff.
    pub manufactured_on: String,
}

/// Field values for inserting or replacing a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: Money,
    pub barcode: String,
    pub manufactured_on: String,
}

/// A registered customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    /// National id with punctuation stripped.
    pub national_id: String,
    pub contact: String,
    pub email: String,
    pub credit_status: CreditStatus,
}

/// Field values for inserting a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub national_id: String,
    pub contact: String,
    pub email: String,
    pub credit_status: CreditStatus,
}

/// Editable customer fields. The national id never changes after insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerChanges {
    pub name: String,
    pub contact: String,
    pub email: String,
    pub credit_status: CreditStatus,
}

/// An employee account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub username: String,
    /// PHC-formatted password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: String,
}

/// Field values for inserting an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
}

/// Editable employee fields. The username never changes after insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeChanges {
    pub name: String,
    pub role: String,
    /// Replacement hash; `None` keeps the current password.
    pub password_hash: Option<String>,
}

/// A sale ready to be persisted together with its lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSale {
    pub customer_id: Option<CustomerId>,
    pub employee_id: EmployeeId,
    pub sold_at: DateTime<Utc>,
    /// Net of discount, never negative.
    pub total: Money,
    pub discount: Money,
    pub payment_method: String,
    pub items: Vec<NewLineItem>,
}

impl NewSale {
    /// Sum of `quantity * unit_price` over all lines, before discount.
    ///
    /// `None` when the sum does not fit in the cents range.
    pub fn subtotal(&self) -> Option<Money> {
        line_sum(self.items.iter().map(NewLineItem::total_price))
    }
}

/// One line of a [`NewSale`], with the product price captured at sale time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLineItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Money,
}

impl NewLineItem {
    /// Returns `quantity * unit_price`, or `None` on overflow.
    pub fn total_price(&self) -> Option<Money> {
        self.unit_price.checked_mul(self.quantity)
    }
}

/// What a successful sale insert hands back for confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SaleReceipt {
    pub sale_id: SaleId,
    pub total: Money,
}

/// A persisted sale as shown in listings and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleSummary {
    pub id: SaleId,
    pub customer_id: Option<CustomerId>,
    pub customer_name: Option<String>,
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub sold_at: DateTime<Utc>,
    pub total: Money,
    pub discount: Money,
    pub payment_method: String,
    pub item_count: u32,
}

/// A persisted sale with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleDetail {
    pub sale: SaleSummary,
    pub items: Vec<LineItem>,
}

impl SaleDetail {
    /// Sum of line totals before discount.
    pub fn subtotal(&self) -> Option<Money> {
        line_sum(self.items.iter().map(LineItem::total_price))
    }
}

/// A persisted sale line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub sale_id: SaleId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Money,
}

impl LineItem {
    /// Returns `quantity * unit_price`, or `None` on overflow.
    pub fn total_price(&self) -> Option<Money> {
        self.unit_price.checked_mul(self.quantity)
    }
}

fn line_sum(mut totals: impl Iterator<Item = Option<Money>>) -> Option<Money> {
    totals.try_fold(Money::zero(), |acc, total| acc.checked_add(total?))
}

/// Revenue of one product name over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRevenue {
    pub product_name: String,
    pub revenue: Money,
}
