use chrono::{DateTime, Utc};
use common::{CustomerId, EmployeeId, Money};
use store::limits::{MAX_QUANTITY, PAYMENT_METHOD_MAX};
use store::{NewLineItem, NewSale, Product};

use crate::error::{DomainError, Result, ValidationError};
use crate::input::at_most;

use super::DEFAULT_PAYMENT_METHOD;

/// Assembles a sale from priced lines before it is persisted.
///
/// Each line snapshots the product's current price, so later catalog edits
/// never change what a past sale cost.
///
/// Setters never fail; the first invalid input is kept and returned by
/// [`build`](Self::build).
///
/// # Example
///
/// ```
/// use common::{EmployeeId, Money, ProductId};
/// use domain::SaleBuilder;
/// use store::Product;
///
/// let bread = Product {
///     id: ProductId::new(1),
///     name: "Pão".to_string(),
///     price: Money::from_cents(1000),
///     barcode: "1".to_string(),
///     manufactured_on: String::new(),
/// };
///
/// let sale = SaleBuilder::new(EmployeeId::new(1))
///     .line(&bread, 2)
///     .discount(Money::from_cents(250))
///     .build()
///     .unwrap();
///
/// assert_eq!(sale.total, Money::from_cents(1750));
/// ```
#[derive(Debug, Clone)]
pub struct SaleBuilder {
    employee_id: EmployeeId,
    customer_id: Option<CustomerId>,
    sold_at: Option<DateTime<Utc>>,
    discount: Money,
    payment_method: Option<String>,
    items: Vec<NewLineItem>,
    error: Option<ValidationError>,
}

impl SaleBuilder {
    /// Starts a sale made by `employee_id`.
    pub fn new(employee_id: EmployeeId) -> Self {
        Self {
            employee_id,
            customer_id: None,
            sold_at: None,
            discount: Money::zero(),
            payment_method: None,
            items: Vec::new(),
            error: None,
        }
    }

    fn reject(&mut self, error: ValidationError) {
        self.error.get_or_insert(error);
    }

    /// Sets the customer, if any.
    pub fn customer(mut self, customer_id: Option<CustomerId>) -> Self {
        self.customer_id = customer_id;
        self
    }

    /// Sets the sale timestamp. Defaults to the time of `build`.
    pub fn sold_at(mut self, sold_at: DateTime<Utc>) -> Self {
        self.sold_at = Some(sold_at);
        self
    }

    /// Sets the discount; its absolute value is used.
    pub fn discount(mut self, discount: Money) -> Self {
        match discount.checked_abs() {
            Some(discount) => self.discount = discount,
            None => self.reject(ValidationError::OutOfRange {
                field: "discount",
                value: discount.to_string(),
            }),
        }
        self
    }

    /// Sets the payment method. Blank keeps the default.
    pub fn payment_method(mut self, method: impl Into<String>) -> Self {
        let method = method.into();
        let method = method.trim();
        if method.is_empty() {
            return self;
        }
        match at_most("payment_method", method, PAYMENT_METHOD_MAX) {
            Ok(method) => self.payment_method = Some(method),
            Err(err) => self.reject(err),
        }
        self
    }

    /// Adds `quantity` units of `product` at its current price.
    ///
    /// Lines with a quantity of zero or less are skipped. A quantity above
    /// [`MAX_QUANTITY`] is out of range.
    pub fn line(mut self, product: &Product, quantity: i64) -> Self {
        if quantity <= 0 {
            tracing::debug!(product_id = %product.id, quantity, "skipping line");
            return self;
        }
        match u32::try_from(quantity) {
            Ok(quantity) if quantity <= MAX_QUANTITY => self.items.push(NewLineItem {
                product_id: product.id,
                quantity,
                unit_price: product.price,
            }),
            _ => self.reject(ValidationError::OutOfRange {
                field: "quantity",
                value: quantity.to_string(),
            }),
        }
        self
    }

    /// Number of lines kept so far.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of `quantity * unit_price` over the kept lines.
    ///
    /// `None` when the lines add up to more than the cents range holds.
    pub fn subtotal(&self) -> Option<Money> {
        self.items
            .iter()
            .try_fold(Money::zero(), |acc, item| acc.checked_add(item.total_price()?))
    }

    /// Finishes the sale, computing `total = max(0, subtotal - discount)`.
    ///
    /// Fails with the first rejected input, with `NoValidItems` when no
    /// line was kept, or with `OutOfRange` when the lines overflow.
    pub fn build(mut self) -> Result<NewSale> {
        if let Some(error) = self.error.take() {
            return Err(error.into());
        }
        if self.items.is_empty() {
            return Err(DomainError::NoValidItems);
        }

        let subtotal = self.subtotal().ok_or_else(|| ValidationError::OutOfRange {
            field: "total",
            value: format!("{} lines", self.items.len()),
        })?;
        let total = subtotal
            .checked_sub(self.discount)
            .map_or(Money::zero(), |net| net.max(Money::zero()));

        Ok(NewSale {
            customer_id: self.customer_id,
            employee_id: self.employee_id,
            sold_at: self.sold_at.unwrap_or_else(Utc::now),
            total,
            discount: self.discount,
            payment_method: self
                .payment_method
                .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
            items: self.items,
        })
    }
}
