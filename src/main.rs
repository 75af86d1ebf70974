//! 貝果每日備貨預測命令列

use std::path::PathBuf;

use anyhow::{Context, Result};
use bagel::loader::{load_customers, load_products};
use bagel::report::{DailySummary, Pivot};
use bagel::{BagelMenu, DataPreparer, ForecastCalculator, ForecastConfig, ForecastRequest, RoundingMode};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// 單日摘要與多日樞紐表
    Table,
    /// 預測列 JSON
    Json,
}

/// 依歷史銷售與客流預測每日貝果備貨量
#[derive(Debug, Parser)]
#[command(name = "bagel", version)]
struct Cli {
    /// 產品表 CSV（product_name,quantity）
    #[arg(long, default_value = "Products_clean.csv")]
    products: PathBuf,

    /// 客流表 CSV（date,customers）
    #[arg(long, default_value = "Customers_clean.csv")]
    customers: PathBuf,

    /// 預測起始日（預設為最後觀測日的隔天）
    #[arg(long)]
    date: Option<NaiveDate>,

    /// 預測天數
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=7))]
    horizon: u32,

    /// 安全庫存百分比（0 到 50，以 5 為級距）
    #[arg(long, default_value_t = 20, value_parser = parse_safety)]
    safety: u32,

    /// 取整方式（half-even 或 half-up）
    #[arg(long, default_value_t = RoundingMode::HalfEven)]
    rounding: RoundingMode,

    /// 允許歷史未涵蓋完整一週
    #[arg(long)]
    allow_partial_week: bool,

    /// 輸出格式
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

fn parse_safety(raw: &str) -> std::result::Result<u32, String> {
    let percent: u32 = raw.parse().map_err(|_| format!("無效的百分比: {}", raw))?;
    if percent > 50 || percent % 5 != 0 {
        return Err(format!("安全庫存必須是 0 到 50 之間 5 的倍數: {}", percent));
    }
    Ok(percent)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let config = ForecastConfig::new()
        .with_rounding(cli.rounding)
        .with_require_full_week(!cli.allow_partial_week);

    let raw_products = load_products(&cli.products)?;
    let raw_customers = load_customers(&cli.customers)?;

    let prepared = DataPreparer::prepare(&raw_products, &raw_customers, &BagelMenu::default(), &config)
        .context("資料準備失敗")?;
    if prepared.malformed_quantity_count() > 0 {
        tracing::warn!("{} 筆數量無法解析，已視為 0", prepared.malformed_quantity_count());
    }

    let request = ForecastRequest::starting(cli.date, prepared.last_observed_date())?
        .with_horizon_days(cli.horizon)
        .with_safety_percent(Decimal::from(cli.safety));

    let rows = ForecastCalculator::new(config)
        .forecast(&prepared, &request)
        .context("備貨預測失敗")?;

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Table => {
            let summary = DailySummary::for_date(&rows, request.target_date, request.safety_percent);
            print!("{}", summary.render());
            if request.horizon_days > 1 {
                println!();
                print!("{}", Pivot::from_rows(&rows).render());
            }
        }
    }

    Ok(())
}
