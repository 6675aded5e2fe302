//! Integration tests for sale registration.
//!
//! These drive the services end to end against the in-memory store and
//! check that the store never holds a partial sale.

use common::{CreditStatus, EmployeeId, Money};
use domain::{
    Actor, CatalogService, CustomerForm, CustomerService, DomainError, EmployeeForm,
    EmployeeService, ProductForm, SaleForm, SaleLineForm, SaleService, ValidationError,
    receipt_message,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use store::{InMemoryStore, Product, Store};

struct Bakery {
    store: InMemoryStore,
    catalog: CatalogService<InMemoryStore>,
    customers: CustomerService<InMemoryStore>,
    employees: EmployeeService<InMemoryStore>,
    sales: SaleService<InMemoryStore>,
    cashier: Actor,
}

async fn bakery() -> Bakery {
    let store = InMemoryStore::new();
    let employees = EmployeeService::new(store.clone());
    let employee = employees
        .register_employee(EmployeeForm {
            username: "caixa".to_string(),
            password: "123".to_string(),
            name: "Maria".to_string(),
            role: "Cashier".to_string(),
        })
        .await
        .unwrap();

    Bakery {
        catalog: CatalogService::new(store.clone()),
        customers: CustomerService::new(store.clone()),
        sales: SaleService::new(store.clone()),
        cashier: Actor::from(&employee),
        employees,
        store,
    }
}

async fn add_product(bakery: &Bakery, name: &str, price: &str) -> Product {
    bakery
        .catalog
        .register_product(ProductForm {
            name: name.to_string(),
            price: price.to_string(),
            barcode: format!("BAR-{name}"),
            manufactured_on: "2024-03-01".to_string(),
        })
        .await
        .unwrap()
}

fn sale_form(lines: &[(String, &str)], discount: &str) -> SaleForm {
    SaleForm {
        customer_id: None,
        items: lines
            .iter()
            .map(|(product, quantity)| SaleLineForm::new(product.clone(), *quantity))
            .collect(),
        discount: discount.to_string(),
        payment_method: None,
    }
}

mod registration {
    use super::*;

    #[tokio::test]
    async fn two_products_with_comma_discount() {
        let bakery = bakery().await;
        let a = add_product(&bakery, "A", "10,00").await;
        let b = add_product(&bakery, "B", "5,50").await;

        let receipt = bakery
            .sales
            .register(
                &bakery.cashier,
                sale_form(&[(a.id.to_string(), "2"), (b.id.to_string(), "1")], "2,50"),
            )
            .await
            .unwrap();

        assert_eq!(receipt.total, Money::from_cents(2300));
        assert_eq!(
            receipt_message(&receipt),
            format!("Sale #{} of R$ 23,00 registered", receipt.sale_id)
        );

        let detail = bakery.sales.get_sale(receipt.sale_id).await.unwrap();
        assert_eq!(detail.items.len(), 2);
        assert_eq!(detail.sale.discount, Money::from_cents(250));
        assert_eq!(detail.sale.payment_method, "Cash");
        assert_eq!(detail.sale.employee_id, bakery.cashier.employee_id);
        assert_eq!(detail.sale.customer_id, None);
    }

    #[tokio::test]
    async fn blank_and_zero_lines_are_skipped() {
        let bakery = bakery().await;
        let a = add_product(&bakery, "A", "10,00").await;

        let receipt = bakery
            .sales
            .register(
                &bakery.cashier,
                sale_form(
                    &[
                        (String::new(), "3"),
                        (a.id.to_string(), ""),
                        (a.id.to_string(), "0"),
                        (a.id.to_string(), "-1"),
                        (a.id.to_string(), "1"),
                    ],
                    "",
                ),
            )
            .await
            .unwrap();

        let detail = bakery.sales.get_sale(receipt.sale_id).await.unwrap();
        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.sale.total, Money::from_cents(1000));
    }

    #[tokio::test]
    async fn empty_or_all_zero_sale_writes_nothing() {
        let bakery = bakery().await;
        let a = add_product(&bakery, "A", "10,00").await;

        let empty = bakery
            .sales
            .register(&bakery.cashier, sale_form(&[], "0"))
            .await;
        assert!(matches!(empty, Err(DomainError::NoValidItems)));

        let zeros = bakery
            .sales
            .register(
                &bakery.cashier,
                sale_form(&[(a.id.to_string(), "0"), (a.id.to_string(), "0")], "0"),
            )
            .await;
        assert!(matches!(zeros, Err(DomainError::NoValidItems)));

        assert_eq!(bakery.store.sale_count().await, 0);
        assert_eq!(bakery.store.line_item_count().await, 0);
    }

    #[tokio::test]
    async fn unknown_product_fails_the_whole_sale() {
        let bakery = bakery().await;
        let a = add_product(&bakery, "A", "10,00").await;

        let result = bakery
            .sales
            .register(
                &bakery.cashier,
                sale_form(&[(a.id.to_string(), "1"), ("999".to_string(), "1")], ""),
            )
            .await;
        assert!(matches!(
            result,
            Err(DomainError::NotFound {
                entity: "Product",
                id: 999
            })
        ));
        assert_eq!(bakery.store.sale_count().await, 0);
    }

    #[tokio::test]
    async fn non_numeric_quantity_is_a_validation_error() {
        let bakery = bakery().await;
        let a = add_product(&bakery, "A", "10,00").await;

        let result = bakery
            .sales
            .register(&bakery.cashier, sale_form(&[(a.id.to_string(), "dois")], ""))
            .await;
        assert!(matches!(
            result,
            Err(DomainError::Validation(ValidationError::InvalidNumber {
                field: "quantity",
                ..
            }))
        ));
    }

    #[tokio::test]
    async fn quantity_beyond_the_column_range_is_rejected() {
        let bakery = bakery().await;
        let a = add_product(&bakery, "A", "10,00").await;

        let result = bakery
            .sales
            .register(
                &bakery.cashier,
                sale_form(&[(a.id.to_string(), "5000000000"), (a.id.to_string(), "1")], ""),
            )
            .await;
        assert!(matches!(
            result,
            Err(DomainError::Validation(ValidationError::OutOfRange {
                field: "quantity",
                ..
            }))
        ));
        assert_eq!(bakery.store.sale_count().await, 0);
        assert_eq!(bakery.store.line_item_count().await, 0);
    }

    #[tokio::test]
    async fn line_totals_beyond_the_cents_range_write_nothing() {
        let bakery = bakery().await;
        let pricey = add_product(&bakery, "Wedding cake", "9999999999999,00").await;

        let result = bakery
            .sales
            .register(
                &bakery.cashier,
                sale_form(&[(pricey.id.to_string(), "100000")], ""),
            )
            .await;
        assert!(matches!(
            result,
            Err(DomainError::Validation(ValidationError::OutOfRange { .. }))
        ));
        assert_eq!(bakery.store.sale_count().await, 0);
    }

    #[tokio::test]
    async fn discount_at_the_bottom_of_the_range_counts_as_zero() {
        let bakery = bakery().await;
        let a = add_product(&bakery, "A", "10,00").await;

        let receipt = bakery
            .sales
            .register(
                &bakery.cashier,
                sale_form(&[(a.id.to_string(), "1")], "-92233720368547758,08"),
            )
            .await
            .unwrap();

        let detail = bakery.sales.get_sale(receipt.sale_id).await.unwrap();
        assert_eq!(detail.sale.discount, Money::zero());
        assert_eq!(detail.sale.total, Money::from_cents(1000));
    }

    #[tokio::test]
    async fn unknown_customer_is_a_constraint_violation() {
        let bakery = bakery().await;
        let a = add_product(&bakery, "A", "10,00").await;

        let mut form = sale_form(&[(a.id.to_string(), "1")], "");
        form.customer_id = Some("77".to_string());
        let result = bakery.sales.register(&bakery.cashier, form).await;

        match result {
            Err(DomainError::ConstraintViolation { message }) => {
                assert!(message.contains("customer_id"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(bakery.store.sale_count().await, 0);
        assert_eq!(bakery.store.line_item_count().await, 0);
    }

    #[tokio::test]
    async fn non_numeric_customer_is_a_validation_error() {
        let bakery = bakery().await;
        let a = add_product(&bakery, "A", "10,00").await;

        let mut form = sale_form(&[(a.id.to_string(), "1")], "");
        form.customer_id = Some("ana".to_string());
        let result = bakery.sales.register(&bakery.cashier, form).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn sale_to_known_customer_with_payment_method() {
        let bakery = bakery().await;
        let a = add_product(&bakery, "A", "10,00").await;
        let customer = bakery
            .customers
            .register_customer(CustomerForm {
                name: "Carlos".to_string(),
                national_id: "111.222.333-44".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let mut form = sale_form(&[(a.id.to_string(), "3")], "");
        form.customer_id = Some(customer.id.to_string());
        form.payment_method = Some("Pix".to_string());
        let receipt = bakery.sales.register(&bakery.cashier, form).await.unwrap();

        let listed = bakery.sales.list_sales().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, receipt.sale_id);
        assert_eq!(listed[0].customer_name.as_deref(), Some("Carlos"));
        assert_eq!(listed[0].employee_name, "Maria");
        assert_eq!(listed[0].payment_method, "Pix");
        assert_eq!(listed[0].item_count, 1);
    }

    #[tokio::test]
    async fn later_price_edits_do_not_change_past_sales() {
        let bakery = bakery().await;
        let a = add_product(&bakery, "A", "10,00").await;

        let receipt = bakery
            .sales
            .register(&bakery.cashier, sale_form(&[(a.id.to_string(), "2")], ""))
            .await
            .unwrap();

        bakery
            .catalog
            .edit_product(
                a.id,
                ProductForm {
                    name: "A".to_string(),
                    price: "99,00".to_string(),
                    barcode: a.barcode.clone(),
                    manufactured_on: a.manufactured_on.clone(),
                },
            )
            .await
            .unwrap();

        let detail = bakery.sales.get_sale(receipt.sale_id).await.unwrap();
        assert_eq!(detail.items[0].unit_price, Money::from_cents(1000));
        assert_eq!(detail.sale.total, Money::from_cents(2000));
    }
}

mod deletion {
    use super::*;

    #[tokio::test]
    async fn deleting_a_sale_removes_its_lines() {
        let bakery = bakery().await;
        let a = add_product(&bakery, "A", "10,00").await;
        let b = add_product(&bakery, "B", "5,50").await;

        let receipt = bakery
            .sales
            .register(
                &bakery.cashier,
                sale_form(&[(a.id.to_string(), "1"), (b.id.to_string(), "4")], ""),
            )
            .await
            .unwrap();
        assert_eq!(bakery.store.line_item_count().await, 2);

        bakery.sales.delete_sale(receipt.sale_id).await.unwrap();
        assert_eq!(bakery.store.sale_count().await, 0);
        assert_eq!(bakery.store.line_item_count().await, 0);
        assert_eq!(bakery.store.orphan_line_item_count().await, 0);

        let again = bakery.sales.delete_sale(receipt.sale_id).await;
        assert!(matches!(again, Err(DomainError::NotFound { entity: "Sale", .. })));
    }

    #[tokio::test]
    async fn referenced_rows_survive_delete_attempts() {
        let bakery = bakery().await;
        let a = add_product(&bakery, "A", "10,00").await;
        let customer = bakery
            .customers
            .register_customer(CustomerForm {
                name: "Carlos".to_string(),
                national_id: "11122233344".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let mut form = sale_form(&[(a.id.to_string(), "1")], "");
        form.customer_id = Some(customer.id.to_string());
        bakery.sales.register(&bakery.cashier, form).await.unwrap();

        let product = bakery.catalog.delete_product(a.id).await;
        assert!(matches!(product, Err(DomainError::ConstraintViolation { .. })));

        let customer_result = bakery.customers.delete_customer(customer.id).await;
        assert!(matches!(
            customer_result,
            Err(DomainError::ConstraintViolation { .. })
        ));

        let manager = Actor::new(EmployeeId::new(-1), "gerente", "Gerente");
        let employee = bakery
            .employees
            .delete_employee(&manager, bakery.cashier.employee_id)
            .await;
        assert!(matches!(employee, Err(DomainError::ConstraintViolation { .. })));

        assert!(bakery.catalog.get_product(a.id).await.is_ok());
        assert!(bakery.customers.get_customer(customer.id).await.is_ok());
        assert!(
            bakery
                .employees
                .get_employee(bakery.cashier.employee_id)
                .await
                .is_ok()
        );
        assert_eq!(bakery.store.sale_count().await, 1);
    }
}

mod properties {
    use super::*;

    #[tokio::test]
    async fn stored_total_is_lines_minus_discount_floored_at_zero() {
        let bakery = bakery().await;
        let mut products = Vec::new();
        for (i, price) in ["1,00", "2,35", "10,00", "0,99", "17,50"].iter().enumerate() {
            products.push(add_product(&bakery, &format!("P{i}"), price).await);
        }

        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..200 {
            let line_count = rng.gen_range(1..=5);
            let lines: Vec<(String, String)> = (0..line_count)
                .map(|_| {
                    let product = &products[rng.gen_range(0..products.len())];
                    (product.id.to_string(), rng.gen_range(1..=6).to_string())
                })
                .collect();
            let discount_cents: i64 = rng.gen_range(-3000..=3000);
            let discount = Money::from_cents(discount_cents).to_decimal().to_string();

            let form = SaleForm {
                customer_id: None,
                items: lines
                    .iter()
                    .map(|(p, q)| SaleLineForm::new(p.clone(), q.clone()))
                    .collect(),
                discount,
                payment_method: None,
            };
            let receipt = bakery.sales.register(&bakery.cashier, form).await.unwrap();

            let detail = bakery.sales.get_sale(receipt.sale_id).await.unwrap();
            assert!(!detail.sale.discount.is_negative());
            assert_eq!(detail.sale.discount, Money::from_cents(discount_cents.abs()));
            let expected = detail
                .subtotal()
                .and_then(|subtotal| subtotal.checked_sub(detail.sale.discount))
                .unwrap()
                .max(Money::zero());
            assert_eq!(detail.sale.total, expected);
            assert_eq!(receipt.total, expected);
            assert!(!detail.items.is_empty());
        }
    }

    #[tokio::test]
    async fn customers_never_stay_pending_after_registration() {
        let bakery = bakery().await;
        for i in 0..20 {
            let customer = bakery
                .customers
                .register_customer(CustomerForm {
                    name: format!("Cliente {i}"),
                    national_id: format!("000.000.000-{i:02}"),
                    ..Default::default()
                })
                .await
                .unwrap();
            assert_ne!(customer.credit_status, CreditStatus::Pending);
        }
        assert_eq!(bakery.store.list_customers().await.unwrap().len(), 20);
    }
}
