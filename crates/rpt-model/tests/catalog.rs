//! Tests for report catalog documents.

use rpt_model::{AggFunction, JoinKind, ReportCatalog};

const CATALOG: &str = r"
sales_by_customer:
  description: Monthly sales per customer
  data_sources:
    - name: transactions
  joins:
    - right_table: customers
      join_key: customer_id
      join_type: inner
  aggregation:
    group_by: [customer_id]
    aggregations:
      total:
        source_field: amount
        function: SUM
  output_columns: [customer_id, total]
  sort:
    columns: [total]
    ascending: false
  email:
    send_individually: true
    recipients: [sales@example.com]

daily_detail:
  data_sources:
    - name: transactions
  output_columns: [date, customer_id, amount]

average ticket:
  data_sources:
    - name: transactions
  aggregation:
    aggregations:
      ticket:
        source_field: amount
        function: avg
";

#[test]
fn catalog_keeps_document_order() {
    let catalog: ReportCatalog = serde_yaml::from_str(CATALOG).unwrap();
    let names: Vec<&str> = catalog.keys().collect();
    assert_eq!(names, vec!["sales_by_customer", "daily_detail", "average ticket"]);
}

#[test]
fn catalog_entries_resolve() {
    let catalog: ReportCatalog = serde_yaml::from_str(CATALOG).unwrap();

    let sales = catalog.get("sales_by_customer").unwrap();
    assert_eq!(sales.joins[0].kind(), Some(JoinKind::Inner));
    assert!(sales.sends_individually());
    let email = sales.email.as_ref().unwrap();
    assert_eq!(
        email.recipients.as_deref(),
        Some(&["sales@example.com".to_string()][..])
    );
    assert_eq!(email.subject, None);

    let detail = catalog.get("daily_detail").unwrap();
    assert!(detail.aggregation.is_none());
    assert!(detail.sort.is_none());
    assert_eq!(detail.label("daily_detail"), "daily_detail");

    let ticket = catalog.get("average ticket").unwrap();
    let agg = ticket.aggregation.as_ref().unwrap();
    assert!(agg.group_by.is_empty());
    assert_eq!(
        agg.aggregations.get("ticket").unwrap().function_kind(),
        Some(AggFunction::Mean)
    );
}
