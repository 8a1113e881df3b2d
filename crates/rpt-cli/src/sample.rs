//! Synthetic input spreadsheets for trying a run without real exports.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rpt_common::date_to_epoch_days;
use rpt_model::ReferencePeriod;
use rpt_report::write_table;
use tracing::info;

const PRODUCTS: u32 = 20;
const SEGMENTS: [&str; 3] = ["Large Enterprise", "Small Enterprise", "Medium Enterprise"];

#[derive(Debug, Clone)]
pub struct SampleOptions {
    pub period: ReferencePeriod,
    pub transactions: usize,
    pub customers: usize,
    /// Fixed seed for reproducible data; entropy otherwise.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct SampleData {
    pub transactions: DataFrame,
    pub customers: DataFrame,
}

/// Builds vendor-style transaction and customer tables for one month.
pub fn generate_sample(options: &SampleOptions) -> Result<SampleData> {
    if options.customers == 0 {
        bail!("sample data needs at least one customer");
    }
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let first = options.period.first_day();
    let days = days_in_month(options.period);

    let mut client_ids = Vec::with_capacity(options.transactions);
    let mut values = Vec::with_capacity(options.transactions);
    let mut dates = Vec::with_capacity(options.transactions);
    let mut products = Vec::with_capacity(options.transactions);
    let mut quantities = Vec::with_capacity(options.transactions);
    for _ in 0..options.transactions {
        client_ids.push(customer_id(rng.gen_range(1..=options.customers)));
        let value: f64 = rng.gen_range(50.0..150.0);
        values.push((value * 100.0).round() / 100.0);
        let day = rng.gen_range(0..days);
        dates.push(date_to_epoch_days(first) + day);
        products.push(format!("PROD{:03}", rng.gen_range(1..=PRODUCTS)));
        quantities.push(rng.gen_range(1..10_i64));
    }

    let transactions = DataFrame::new(vec![
        Column::new("Client ID".into(), client_ids),
        Column::new("Sale Value".into(), values),
        Column::new("Sale Date".into(), dates).cast(&DataType::Date)?,
        Column::new("Product".into(), products),
        Column::new("Quantity".into(), quantities),
    ])
    .context("build transactions table")?;

    let ids: Vec<String> = (1..=options.customers).map(customer_id).collect();
    let names: Vec<String> = (1..=options.customers)
        .map(|i| {
            if i % 2 == 0 {
                format!("Cliente Teste {i}")
            } else {
                format!("Empresa ABC {i}")
            }
        })
        .collect();
    let segments: Vec<&str> = (1..=options.customers)
        .map(|i| SEGMENTS[i % SEGMENTS.len()])
        .collect();
    let customers = DataFrame::new(vec![
        Column::new("Customer ID".into(), ids),
        Column::new("Full Name".into(), names),
        Column::new("Customer Segment".into(), segments),
    ])
    .context("build customers table")?;

    Ok(SampleData {
        transactions,
        customers,
    })
}

/// Writes `transactions_<YYYY>_<MM>` and `customers_<YYYY>_<MM>` into `dir`.
pub fn write_sample(
    data: &SampleData,
    dir: &Path,
    period: ReferencePeriod,
    extension: &str,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (name, df) in [
        ("transactions", &data.transactions),
        ("customers", &data.customers),
    ] {
        let path = dir.join(period.file_name(name, extension));
        write_table(df, &path).with_context(|| format!("write {}", path.display()))?;
        info!(table = name, path = %path.display(), rows = df.height(), "sample table written");
        written.push(path);
    }
    Ok(written)
}

fn customer_id(index: usize) -> String {
    format!("CLI{index:03}")
}

fn days_in_month(period: ReferencePeriod) -> i32 {
    (28..=31)
        .rev()
        .find(|day| NaiveDate::from_ymd_opt(period.year(), period.month(), *day).is_some())
        .map_or(28, |day| day as i32)
}
