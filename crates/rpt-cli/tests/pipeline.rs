//! End-to-end monthly runs on generated sample inputs.

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use lettre::Message;
use polars::prelude::*;
use rpt_cli::config::AppConfig;
use rpt_cli::error::{EXIT_DATA_INTEGRITY, EXIT_NOT_FOUND};
use rpt_cli::sample::{SampleOptions, generate_sample, write_sample};
use rpt_cli::{MailStatus, SkipReason, dispatch_reports, run_monthly};
use rpt_ingest::{TableSet, parse_definitions, read_table};
use rpt_model::ReferencePeriod;
use rpt_notify::{MailTransport, Notifier, SendOutcome};
use tempfile::TempDir;

const DEMO_DEFINITIONS: &str = include_str!("../../../demos/report_definitions.yaml");
const DEMO_CONFIG: &str = include_str!("../../../demos/reports.toml");

#[derive(Clone, Default)]
struct Recording {
    sent: Rc<RefCell<Vec<String>>>,
}

impl MailTransport for Recording {
    fn deliver(&self, message: &Message) -> rpt_notify::Result<()> {
        let text = String::from_utf8_lossy(&message.formatted()).into_owned();
        self.sent.borrow_mut().push(text);
        Ok(())
    }
}

fn period() -> ReferencePeriod {
    ReferencePeriod::new(2025, 6).unwrap()
}

fn workspace(dir: &Path, definitions: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.paths.input_dir = dir.join("input");
    config.paths.output_dir = dir.join("output");
    config.paths.definitions = dir.join("report_definitions.yaml");
    config.mail.sender = "reports@example.com".to_string();
    config.mail.recipients = vec!["management@example.com".to_string()];
    fs::write(&config.paths.definitions, definitions).unwrap();
    config
}

fn write_inputs(config: &AppConfig, transactions: usize) {
    let data = generate_sample(&SampleOptions {
        period: period(),
        transactions,
        customers: 10,
        seed: Some(42),
    })
    .unwrap();
    write_sample(&data, &config.paths.input_dir, period(), "xlsx").unwrap();
}

fn notifier(transport: &Recording, config: &AppConfig) -> Notifier {
    Notifier::new(config.mail_settings(), Box::new(transport.clone()))
}

#[test]
fn demo_files_parse() {
    let catalog = parse_definitions(DEMO_DEFINITIONS).unwrap();
    let names: Vec<&str> = catalog.keys().collect();
    assert_eq!(names, vec!["customer_totals", "sales_by_segment", "daily_detail"]);
    assert!(catalog.get("sales_by_segment").unwrap().sends_individually());

    let config = AppConfig::parse(DEMO_CONFIG).unwrap();
    assert_eq!(config.files.primary_source, "transactions");
    assert_eq!(config.mail.recipients, vec!["management@example.com"]);
    assert!(config.mail.body.contains("{{report_list}}"));
}

#[test]
fn full_run_writes_reports_and_mails_them() {
    let dir = TempDir::new().unwrap();
    let config = workspace(dir.path(), DEMO_DEFINITIONS);
    write_inputs(&config, 100);

    let transport = Recording::default();
    let notifier = notifier(&transport, &config);
    let summary = run_monthly(&config, period(), Some(&notifier)).unwrap();

    let produced: Vec<&str> = summary
        .reports
        .produced
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(produced, vec!["customer_totals", "sales_by_segment", "daily_detail"]);
    assert!(summary.reports.skipped.is_empty());

    let output = &config.paths.output_dir;
    assert!(output.join("customer_totals_2025_06.xlsx").exists());
    assert!(output.join("sales_by_segment_2025_06.xlsx").exists());
    assert!(output.join("daily_detail_2025_06.xlsx").exists());

    let totals = read_table(&output.join("customer_totals_2025_06.xlsx")).unwrap();
    assert!(totals.height() <= 10);
    let purchases: f64 = totals
        .column("purchases")
        .unwrap()
        .f64()
        .unwrap()
        .into_no_null_iter()
        .sum();
    assert_eq!(purchases, 100.0);

    let detail = read_table(&output.join("daily_detail_2025_06.xlsx")).unwrap();
    assert_eq!(detail.height(), 100);

    assert_eq!(summary.individual.len(), 1);
    assert_eq!(summary.individual[0].report, "sales_by_segment");
    assert_eq!(
        summary.mail,
        MailStatus::Finished(SendOutcome::Sent {
            recipients: 1,
            attachments: 3
        })
    );

    let sent = transport.sent.borrow();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].contains("Subject: Segment sales - June 2025"));
    assert!(sent[0].contains("sales-leads@example.com"));
    assert!(sent[1].contains("Subject: Monthly Sales Report - June 2025"));
    assert!(sent[1].contains("daily_detail_2025_06.xlsx"));
}

#[test]
fn empty_override_recipients_fall_back_to_global_list() {
    let definitions = r#"
totals:
  data_sources:
    - name: transactions
  output_columns: [customer_id, amount]
  email:
    send_individually: true
    recipients: []
    subject: "Totals - {{month_year_full}}"
"#;
    let dir = TempDir::new().unwrap();
    let config = workspace(dir.path(), definitions);
    write_inputs(&config, 15);

    let transport = Recording::default();
    let summary = run_monthly(&config, period(), Some(&notifier(&transport, &config))).unwrap();

    assert_eq!(summary.individual.len(), 1);
    assert_eq!(summary.individual[0].report, "totals");
    assert!(summary.individual[0].result.is_ok());

    let sent = transport.sent.borrow();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].contains("Subject: Totals - June 2025"));
    assert!(sent[0].contains("management@example.com"));
}

#[test]
fn run_without_mail_only_writes_files() {
    let dir = TempDir::new().unwrap();
    let config = workspace(dir.path(), DEMO_DEFINITIONS);
    write_inputs(&config, 20);

    let summary = run_monthly(&config, period(), None).unwrap();
    assert_eq!(summary.mail, MailStatus::Disabled);
    assert!(summary.individual.is_empty());
    assert_eq!(summary.reports.produced.len(), 3);
}

#[test]
fn failing_report_does_not_stop_the_batch() {
    let definitions = r"
broken:
  data_sources:
    - name: transactions
  output_columns: [no_such_column]
orphan:
  data_sources:
    - name: invoices
  output_columns: [amount]
totals:
  data_sources:
    - name: transactions
  output_columns: [customer_id, amount]
";
    let dir = TempDir::new().unwrap();
    let config = workspace(dir.path(), definitions);
    write_inputs(&config, 30);

    let transport = Recording::default();
    let summary = run_monthly(&config, period(), Some(&notifier(&transport, &config))).unwrap();

    assert_eq!(summary.reports.produced.len(), 1);
    assert_eq!(summary.reports.produced[0].name, "totals");
    assert_eq!(summary.reports.failed(), 2);
    assert!(
        !config
            .paths
            .output_dir
            .join("broken_2025_06.xlsx")
            .exists()
    );
    assert_eq!(
        summary.mail,
        MailStatus::Finished(SendOutcome::Sent {
            recipients: 1,
            attachments: 1
        })
    );
}

#[test]
fn missing_input_is_a_not_found_error() {
    let dir = TempDir::new().unwrap();
    let config = workspace(dir.path(), DEMO_DEFINITIONS);

    let err = run_monthly(&config, period(), None).unwrap_err();
    assert_eq!(err.exit_code(), EXIT_NOT_FOUND);
    assert!(config.paths.input_dir.is_dir());
    assert!(config.paths.output_dir.is_dir());
}

#[test]
fn empty_transactions_stop_the_run() {
    let dir = TempDir::new().unwrap();
    let config = workspace(dir.path(), DEMO_DEFINITIONS);
    write_inputs(&config, 0);

    let transport = Recording::default();
    let err = run_monthly(&config, period(), Some(&notifier(&transport, &config))).unwrap_err();
    assert_eq!(err.exit_code(), EXIT_DATA_INTEGRITY);
    assert!(transport.sent.borrow().is_empty());
}

#[test]
fn empty_primary_is_skipped_by_the_dispatcher() {
    let catalog = parse_definitions(
        r"
from_refunds:
  data_sources:
    - name: refunds
  output_columns: [amount]
from_sales:
  data_sources:
    - name: transactions
  output_columns: [amount]
",
    )
    .unwrap();
    let mut tables = TableSet::new();
    tables.insert("refunds".to_string(), DataFrame::empty());
    tables.insert(
        "transactions".to_string(),
        df! { "amount" => [10.0, 20.0] }.unwrap(),
    );

    let dir = TempDir::new().unwrap();
    let result = dispatch_reports(&tables, &catalog, period(), dir.path(), "csv");

    assert_eq!(result.produced.len(), 1);
    assert!(dir.path().join("from_sales_2025_06.csv").exists());
    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].name, "from_refunds");
    assert_eq!(result.skipped[0].reason, SkipReason::Empty);
    assert_eq!(result.failed(), 0);
}
