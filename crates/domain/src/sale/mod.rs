//! Sale registration: turning submitted lines into a priced, persisted sale.

mod builder;
mod discount;
mod service;

pub use builder::SaleBuilder;
pub use discount::parse_discount;
pub use service::{
    CustomerOption, ProductOption, SaleForm, SaleFormOptions, SaleLineForm, SaleService,
    receipt_message,
};

/// Payment method recorded when the form leaves it blank.
pub const DEFAULT_PAYMENT_METHOD: &str = "Cash";
