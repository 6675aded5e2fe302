//! Integration tests for period and per-product reports.

use chrono::{TimeZone, Utc};
use common::{EmployeeId, Money};
use domain::SaleBuilder;
use reporting::{ReportError, ReportFilter, ReportService, RevenueChart};
use store::{InMemoryStore, NewEmployee, NewProduct, Product, Store};

struct Fixture {
    store: InMemoryStore,
    reports: ReportService<InMemoryStore>,
    seller: EmployeeId,
    a: Product,
    b: Product,
}

async fn fixture() -> Fixture {
    let store = InMemoryStore::new();
    let seller = store
        .insert_employee(NewEmployee {
            username: "caixa".to_string(),
            password_hash: "unused".to_string(),
            name: "Maria".to_string(),
            role: "Cashier".to_string(),
        })
        .await
        .unwrap()
        .id;

    let mut products = Vec::new();
    for (name, cents) in [("A", 1000), ("B", 550)] {
        products.push(
            store
                .insert_product(NewProduct {
                    name: name.to_string(),
                    price: Money::from_cents(cents),
                    barcode: format!("BAR-{name}"),
                    manufactured_on: String::new(),
                })
                .await
                .unwrap(),
        );
    }
    let b = products.pop().unwrap();
    let a = products.pop().unwrap();

    Fixture {
        reports: ReportService::new(store.clone()),
        store,
        seller,
        a,
        b,
    }
}

impl Fixture {
    async fn sell(&self, day: u32, hour: u32, lines: &[(&Product, i64)], discount: i64) -> Money {
        let builder = lines.iter().fold(
            SaleBuilder::new(self.seller)
                .sold_at(Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap())
                .discount(Money::from_cents(discount)),
            |builder, (product, quantity)| builder.line(product, *quantity),
        );
        self.store
            .insert_sale(builder.build().unwrap())
            .await
            .unwrap()
            .total
    }
}

#[tokio::test]
async fn period_report_includes_both_end_days() {
    let f = fixture().await;
    let first = f.sell(1, 0, &[(&f.a, 1)], 0).await;
    let last = f.sell(10, 23, &[(&f.b, 2)], 0).await;
    f.sell(11, 0, &[(&f.a, 5)], 0).await;
    f.sell(2, 12, &[(&f.a, 2), (&f.b, 1)], 250).await;

    let report = f
        .reports
        .period_report(&ReportFilter::between("2024-03-01", "2024-03-10"))
        .await
        .unwrap();

    assert_eq!(report.sales.len(), 3);
    assert!(
        report
            .sales
            .windows(2)
            .all(|w| w[0].sold_at >= w[1].sold_at)
    );
    let summed = Money::checked_sum(report.sales.iter().map(|s| s.total));
    assert_eq!(Some(report.total), summed);
    assert_eq!(
        Some(report.total),
        Money::checked_sum([first, last, Money::from_cents(2300)])
    );
}

#[tokio::test]
async fn period_report_without_both_days_is_empty() {
    let f = fixture().await;
    f.sell(5, 10, &[(&f.a, 1)], 0).await;

    let report = f
        .reports
        .period_report(&ReportFilter {
            start: Some("2024-03-01".to_string()),
            end: None,
        })
        .await
        .unwrap();
    assert!(report.sales.is_empty());
    assert_eq!(report.total, Money::zero());
}

#[tokio::test]
async fn period_report_rejects_malformed_date() {
    let f = fixture().await;
    let result = f
        .reports
        .period_report(&ReportFilter::between("2024-03-01", "10/03/2024"))
        .await;
    assert!(matches!(result, Err(ReportError::InvalidDate { .. })));
}

#[tokio::test]
async fn reversed_period_is_empty() {
    let f = fixture().await;
    f.sell(5, 10, &[(&f.a, 1)], 0).await;

    let report = f
        .reports
        .period_report(&ReportFilter::between("2024-03-10", "2024-03-01"))
        .await
        .unwrap();
    assert!(report.sales.is_empty());
    assert_eq!(report.total, Money::zero());
}

#[tokio::test]
async fn revenue_sums_repeated_product_across_sales() {
    let f = fixture().await;
    f.sell(1, 9, &[(&f.a, 2)], 0).await;
    f.sell(20, 9, &[(&f.a, 1)], 500).await;

    let chart = f
        .reports
        .product_revenue(&ReportFilter::default())
        .await
        .unwrap();
    assert_eq!(
        chart,
        RevenueChart {
            labels: vec!["A".to_string()],
            data: vec![30.0],
        }
    );
}

#[tokio::test]
async fn revenue_is_ordered_and_filtered() {
    let f = fixture().await;
    f.sell(1, 9, &[(&f.a, 1), (&f.b, 4)], 0).await;
    f.sell(25, 9, &[(&f.a, 3)], 0).await;

    let all_time = f
        .reports
        .product_revenue(&ReportFilter::default())
        .await
        .unwrap();
    assert_eq!(all_time.labels, vec!["A", "B"]);
    assert_eq!(all_time.data, vec![40.0, 22.0]);

    let early = f
        .reports
        .product_revenue(&ReportFilter::between("2024-03-01", "2024-03-05"))
        .await
        .unwrap();
    assert_eq!(early.labels, vec!["B", "A"]);
    assert_eq!(early.data, vec![22.0, 10.0]);

    let nothing = f
        .reports
        .product_revenue(&ReportFilter::between("2023-01-01", "2023-12-31"))
        .await
        .unwrap();
    assert!(nothing.labels.is_empty());
    assert!(nothing.data.is_empty());
}

#[tokio::test]
async fn revenue_rejects_malformed_date() {
    let f = fixture().await;
    let result = f
        .reports
        .product_revenue(&ReportFilter::between("2024-13-01", "2024-03-05"))
        .await;
    assert!(matches!(result, Err(ReportError::InvalidDate { .. })));
}
