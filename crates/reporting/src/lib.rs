//! Sales reporting.
//!
//! Two report shapes are built from stored sales:
//! - [`PeriodReport`]: the sales between two days and their summed totals
//! - [`RevenueChart`]: line revenue grouped by product name

pub mod error;
pub mod filter;
pub mod report;

pub use error::{ReportError, Result};
pub use filter::{ReportFilter, parse_day};
pub use report::{PeriodReport, ReportService, RevenueChart};
