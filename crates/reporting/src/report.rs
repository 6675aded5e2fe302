//! Report service.

use chrono::NaiveDate;
use common::Money;
use serde::Serialize;
use store::{SaleQuery, SaleSummary, Store};

use crate::error::Result;
use crate::filter::ReportFilter;

/// Sales made within a period and the sum of their totals.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PeriodReport {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// Most recent first.
    pub sales: Vec<SaleSummary>,
    pub total: Money,
}

/// Revenue per product, shaped for a bar chart.
///
/// `labels[i]` is a product name and `data[i]` its revenue in currency
/// units, highest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RevenueChart {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

/// Builds reports from the sales held in a store.
pub struct ReportService<S: Store> {
    store: S,
}

impl<S: Store> ReportService<S> {
    /// Creates a new report service with the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lists the sales between two days, both inclusive, and sums them.
    ///
    /// Without both days the report is empty.
    #[tracing::instrument(skip(self))]
    pub async fn period_report(&self, filter: &ReportFilter) -> Result<PeriodReport> {
        let (start, end) = filter.days()?;
        let Some(range) = filter.range()? else {
            return Ok(PeriodReport {
                start,
                end,
                ..Default::default()
            });
        };

        let sales = self.store.list_sales(SaleQuery::in_range(range)).await?;
        let total = self.store.sum_sale_totals(range).await?;
        tracing::debug!(sales = sales.len(), %total, "period report built");

        Ok(PeriodReport {
            start,
            end,
            sales,
            total,
        })
    }

    /// Sums line revenue per product name.
    ///
    /// The date filter applies only when both days are given; otherwise
    /// every sale ever made counts.
    #[tracing::instrument(skip(self))]
    pub async fn product_revenue(&self, filter: &ReportFilter) -> Result<RevenueChart> {
        let range = filter.range()?;
        let rows = self.store.revenue_by_product(range).await?;

        let (labels, data) = rows
            .into_iter()
            .map(|row| (row.product_name, row.revenue.to_f64()))
            .unzip();
        Ok(RevenueChart { labels, data })
    }
}
