//! 簡單備貨預測示例

use bagel::report::{DailySummary, Pivot};
use bagel::{BagelMenu, DataPreparer, ForecastCalculator, ForecastConfig, ForecastRequest};
use bagel_core::{RawCustomerRow, RawProductRow};
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== 簡單備貨預測示例 ===\n");

    // 產品表（數量以千分位編碼）
    let products = vec![
        RawProductRow::new("Bajgiel Mak", "196000"),
        RawProductRow::new("Bajgiel Sezam", "154000"),
        RawProductRow::new("Warszawski LOX", "98000"),
        RawProductRow::new("Croissant", "300000"), // 不在菜單上
    ];

    // 四週客流，週末較多
    let start = NaiveDate::from_ymd_opt(2025, 9, 15).ok_or("無效的日期")?;
    let customers: Vec<RawCustomerRow> = (0..28)
        .map(|offset| {
            let date = start + Duration::days(offset);
            let count = match offset % 7 {
                5 => 180,
                6 => 120,
                _ => 100,
            };
            RawCustomerRow::new(date.to_string(), count.to_string())
        })
        .collect();

    let config = ForecastConfig::default();
    let prepared = DataPreparer::prepare(&products, &customers, &BagelMenu::default(), &config)?;

    println!("觀測天數: {}", prepared.nb_days());
    println!("最後觀測日: {}", prepared.last_observed_date());
    println!("星期模式:");
    for (name, factor) in prepared.weekday_pattern.named() {
        println!("  - {}: {}", name, factor.round_dp(3));
    }
    println!();

    let request = ForecastRequest::next_after(prepared.last_observed_date())?
        .with_horizon_days(7)
        .with_safety_percent(Decimal::from(20));
    let rows = ForecastCalculator::new(config).forecast(&prepared, &request)?;

    print!(
        "{}",
        DailySummary::for_date(&rows, request.target_date, request.safety_percent).render()
    );
    println!();
    print!("{}", Pivot::from_rows(&rows).render());

    Ok(())
}
