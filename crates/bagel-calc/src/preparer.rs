//! 資料準備
//!
//! 由原始銷售列與客流列推導兩項摘要統計：
//! 菜單品項的銷售總量，以及正規化的星期需求模式。

use std::collections::BTreeMap;
use std::str::FromStr;

use bagel_core::{
    parse_date, BagelError, BagelMenu, CustomerCountRecord, ForecastConfig, ObservationWindow,
    ProductSalesRecord, RawCustomerRow, RawProductRow, Result, WeekdayPattern,
};
use rust_decimal::Decimal;

use crate::{PrepareWarning, PreparedData};

/// 資料準備器
pub struct DataPreparer;

impl DataPreparer {
    /// 主資料準備入口
    pub fn prepare(
        raw_products: &[RawProductRow],
        raw_customers: &[RawCustomerRow],
        menu: &BagelMenu,
        config: &ForecastConfig,
    ) -> Result<PreparedData> {
        tracing::info!(
            "開始資料準備：銷售 {} 筆，客流 {} 筆",
            raw_products.len(),
            raw_customers.len()
        );

        let start_time = std::time::Instant::now();

        // Step 1: 客流歷史（空歷史直接拒絕）
        tracing::debug!("Step 1: 解析客流");
        let customers = Self::parse_customers(raw_customers)?;
        let window = ObservationWindow::from_records(&customers).ok_or(BagelError::EmptyHistory)?;
        tracing::debug!("觀測天數: {}, 最後日期: {}", window.nb_days, window.last_date);

        // Step 2: 星期需求模式
        tracing::debug!("Step 2: 星期需求模式");
        let mut weekday_pattern = Self::weekday_pattern(&customers)?;
        if config.require_full_week {
            weekday_pattern = weekday_pattern.ensure_complete()?;
        } else if !weekday_pattern.is_complete() {
            tracing::warn!(
                "歷史未涵蓋完整一週，缺少 {:?}，預測到這些星期時將報錯",
                weekday_pattern.missing_weekdays()
            );
        }

        // Step 3: 菜單品項銷售總量
        tracing::debug!("Step 3: 彙總銷售");
        let (sales, warnings) = Self::aggregate_sales(raw_products, menu, config.quantity_scale)?;
        tracing::debug!("菜單品項數量: {}", sales.len());

        tracing::info!(
            "資料準備完成，耗時 {:?}，品項 {} 個，數量歸零 {} 筆",
            start_time.elapsed(),
            sales.len(),
            warnings.len()
        );

        Ok(PreparedData {
            sales,
            weekday_pattern,
            window,
            warnings,
        })
    }

    /// 彙總菜單品項的銷售總量
    ///
    /// 不在菜單上的列直接捨棄；數量無法解析時視為 0 並記錄警告。
    /// 同名品項合併為一筆，結果依名稱排序。
    pub fn aggregate_sales(
        raw_products: &[RawProductRow],
        menu: &BagelMenu,
        quantity_scale: Decimal,
    ) -> Result<(Vec<ProductSalesRecord>, Vec<PrepareWarning>)> {
        if quantity_scale <= Decimal::ZERO {
            return Err(BagelError::CalculationError(format!(
                "數量編碼倍數必須大於 0: {}",
                quantity_scale
            )));
        }

        let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
        let mut warnings = Vec::new();

        for (index, row) in raw_products.iter().enumerate() {
            if !menu.contains(&row.product_name) {
                continue;
            }

            let quantity = match parse_number(&row.quantity) {
                Some(quantity) => quantity,
                None => {
                    tracing::warn!(
                        "第 {} 列品項 {} 的數量 '{}' 無法解析，視為 0",
                        index + 1,
                        row.product_name,
                        row.quantity
                    );
                    warnings.push(PrepareWarning::malformed_quantity(
                        index + 1,
                        row.product_name.clone(),
                        &row.quantity,
                    ));
                    Decimal::ZERO
                }
            };

            let total = totals.entry(row.product_name.as_str()).or_insert(Decimal::ZERO);
            *total = total
                .checked_add(quantity / quantity_scale)
                .ok_or_else(|| {
                    BagelError::CalculationError(format!("品項 {} 銷售總量溢出", row.product_name))
                })?;
        }

        let sales = totals
            .into_iter()
            .map(|(name, total)| ProductSalesRecord::new(name, total))
            .collect();

        Ok((sales, warnings))
    }

    /// 解析客流列
    pub fn parse_customers(raw_customers: &[RawCustomerRow]) -> Result<Vec<CustomerCountRecord>> {
        if raw_customers.is_empty() {
            return Err(BagelError::EmptyHistory);
        }

        raw_customers
            .iter()
            .map(|row| {
                let date = parse_date(&row.date)?;
                let customers = parse_number(&row.customers)
                    .filter(|c| !c.is_sign_negative())
                    .ok_or_else(|| BagelError::MalformedCustomerCount {
                        date,
                        raw: row.customers.clone(),
                    })?;
                Ok(CustomerCountRecord::new(date, customers))
            })
            .collect()
    }

    /// 計算星期需求模式
    ///
    /// 先求各星期的平均客流（所有同星期的列），再除以七天平均的平均。
    pub fn weekday_pattern(customers: &[CustomerCountRecord]) -> Result<WeekdayPattern> {
        let mut sums = [Decimal::ZERO; 7];
        let mut counts = [0u32; 7];

        for record in customers {
            let index = record.weekday().num_days_from_monday() as usize;
            sums[index] += record.customers;
            counts[index] += 1;
        }

        let mut means = [None; 7];
        for (index, mean) in means.iter_mut().enumerate() {
            if counts[index] > 0 {
                *mean = Some(sums[index] / Decimal::from(counts[index]));
            }
        }

        WeekdayPattern::from_daily_means(means)
    }
}

/// 解析數值文字（支援小數與科學記號）
fn parse_number(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};
    use rstest::rstest;

    /// 2025-10-06（週一）起連續 14 天，週末客流加倍
    fn two_weeks_of_customers() -> Vec<RawCustomerRow> {
        let start = NaiveDate::from_ymd_opt(2025, 10, 6).unwrap();
        (0..14)
            .map(|offset| {
                let date = start + chrono::Duration::days(offset);
                let customers = if offset % 7 >= 5 { 200 } else { 100 };
                RawCustomerRow::new(date.to_string(), customers.to_string())
            })
            .collect()
    }

    fn products() -> Vec<RawProductRow> {
        vec![
            RawProductRow::new("Bajgiel Mak", "147000"),
            RawProductRow::new("Warszawski LOX", "84000"),
            RawProductRow::new("Croissant", "999000"),
        ]
    }

    #[test]
    fn test_prepare_full_dataset() {
        let prepared = DataPreparer::prepare(
            &products(),
            &two_weeks_of_customers(),
            &BagelMenu::default(),
            &ForecastConfig::default(),
        )
        .unwrap();

        assert_eq!(prepared.nb_days(), 14);
        assert_eq!(
            prepared.last_observed_date(),
            NaiveDate::from_ymd_opt(2025, 10, 19).unwrap()
        );
        assert_eq!(prepared.sales.len(), 2);
        assert_eq!(prepared.sales[0].product_name, "Bajgiel Mak");
        assert_eq!(prepared.sales[0].total_quantity_sold, Decimal::from(147));
        assert_eq!(prepared.sales[1].total_quantity_sold, Decimal::from(84));
        assert!(prepared.warnings.is_empty());
    }

    #[test]
    fn test_non_menu_products_discarded() {
        let (sales, warnings) =
            DataPreparer::aggregate_sales(&products(), &BagelMenu::default(), Decimal::from(1000))
                .unwrap();

        assert!(sales.iter().all(|s| s.product_name != "Croissant"));
        assert!(warnings.is_empty());
    }

    #[rstest]
    #[case("")]
    #[case("n/a")]
    #[case("NaN")]
    #[case("12 szt.")]
    fn test_malformed_quantity_coerced_to_zero(#[case] raw: &str) {
        let rows = vec![RawProductRow::new("Bajgiel Sezam", raw)];

        let (sales, warnings) =
            DataPreparer::aggregate_sales(&rows, &BagelMenu::default(), Decimal::from(1000))
                .unwrap();

        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].total_quantity_sold, Decimal::ZERO);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].row, 1);
        assert_eq!(warnings[0].product_name, "Bajgiel Sezam");
    }

    #[rstest]
    #[case("147000", 147)]
    #[case(" 5000 ", 5)]
    #[case("1.5e4", 15)]
    #[case("2500.0", 2)]
    fn test_quantity_scaling(#[case] raw: &str, #[case] expected_floor: i64) {
        let rows = vec![RawProductRow::new("Bajgiel Mix", raw)];

        let (sales, _) =
            DataPreparer::aggregate_sales(&rows, &BagelMenu::default(), Decimal::from(1000))
                .unwrap();

        assert_eq!(sales[0].total_quantity_sold.floor(), Decimal::from(expected_floor));
    }

    #[test]
    fn test_duplicate_products_merged() {
        let rows = vec![
            RawProductRow::new("Bajgiel Golas", "1000"),
            RawProductRow::new("Bajgiel Golas", "2000"),
        ];

        let (sales, _) =
            DataPreparer::aggregate_sales(&rows, &BagelMenu::default(), Decimal::from(1000))
                .unwrap();

        assert_eq!(sales, vec![ProductSalesRecord::new("Bajgiel Golas", Decimal::from(3))]);
    }

    #[test]
    fn test_zero_scale_rejected() {
        assert!(DataPreparer::aggregate_sales(&products(), &BagelMenu::default(), Decimal::ZERO)
            .is_err());
    }

    #[test]
    fn test_empty_history_rejected() {
        let result = DataPreparer::prepare(
            &products(),
            &[],
            &BagelMenu::default(),
            &ForecastConfig::default(),
        );

        assert!(matches!(result, Err(BagelError::EmptyHistory)));
    }

    #[test]
    fn test_weekday_pattern_weekend_peak() {
        let customers = DataPreparer::parse_customers(&two_weeks_of_customers()).unwrap();
        let pattern = DataPreparer::weekday_pattern(&customers).unwrap();

        // 各星期平均: 五天 100、兩天 200，總平均 = 900 / 7
        let overall = Decimal::from(900) / Decimal::from(7);
        assert_eq!(pattern.factor(Weekday::Mon).unwrap(), Decimal::from(100) / overall);
        assert_eq!(pattern.factor(Weekday::Sat).unwrap(), Decimal::from(200) / overall);
        assert!(pattern.factor(Weekday::Sat).unwrap() > pattern.factor(Weekday::Fri).unwrap());
    }

    #[test]
    fn test_duplicate_dates_counted_once() {
        let mut rows = two_weeks_of_customers();
        rows.push(rows[0].clone());

        let prepared = DataPreparer::prepare(
            &products(),
            &rows,
            &BagelMenu::default(),
            &ForecastConfig::default(),
        )
        .unwrap();

        assert_eq!(prepared.nb_days(), 14);
    }

    #[test]
    fn test_partial_week_rejected_by_default() {
        // 只有週一到週三
        let rows: Vec<_> = two_weeks_of_customers().into_iter().take(3).collect();

        let result = DataPreparer::prepare(
            &products(),
            &rows,
            &BagelMenu::default(),
            &ForecastConfig::default(),
        );

        match result {
            Err(BagelError::IncompleteWeekdayPattern(missing)) => assert_eq!(missing.len(), 4),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_partial_week_allowed() {
        let rows: Vec<_> = two_weeks_of_customers().into_iter().take(3).collect();

        let prepared = DataPreparer::prepare(
            &products(),
            &rows,
            &BagelMenu::default(),
            &ForecastConfig::default().with_require_full_week(false),
        )
        .unwrap();

        assert!(!prepared.weekday_pattern.is_complete());
        assert_eq!(prepared.weekday_pattern.sum(), Decimal::from(3));
    }

    #[rstest]
    #[case(RawCustomerRow::new("yesterday", "100"))]
    #[case(RawCustomerRow::new("2025-10-06", "many"))]
    #[case(RawCustomerRow::new("2025-10-06", "-4"))]
    fn test_malformed_customer_rows_rejected(#[case] row: RawCustomerRow) {
        assert!(DataPreparer::parse_customers(&[row]).is_err());
    }
}
