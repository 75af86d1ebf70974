//! 備貨預測主計算器

use bagel_core::{
    BagelError, ForecastConfig, ForecastRequest, ForecastRow, ProductSalesRecord, Result,
    RoundingMode, WeekdayPattern,
};
use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::bucketing::BucketingCalculator;
use crate::PreparedData;

/// 備貨預測計算器
pub struct ForecastCalculator {
    /// 預測配置
    config: ForecastConfig,
}

impl ForecastCalculator {
    /// 創建新的預測計算器
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    /// 依預測請求計算（展示層入口）
    pub fn forecast(
        &self,
        prepared: &PreparedData,
        request: &ForecastRequest,
    ) -> Result<Vec<ForecastRow>> {
        request.validate()?;

        Self::compute(
            &prepared.sales,
            &prepared.weekday_pattern,
            prepared.nb_days(),
            request.target_date,
            request.end_date()?,
            request.safety_factor(),
            self.config.rounding,
        )
    }

    /// 主預測計算
    ///
    /// 每個品項在日期範圍內的每一天各產生一列：
    /// 備貨量 = round(銷售總量 / 觀測天數 × 星期倍數 × 安全係數)。
    /// 結果依（日期, 品項名稱）排序。
    pub fn compute(
        sales: &[ProductSalesRecord],
        weekday_pattern: &WeekdayPattern,
        nb_days: u32,
        start_date: NaiveDate,
        end_date: NaiveDate,
        safety_factor: Decimal,
        rounding: RoundingMode,
    ) -> Result<Vec<ForecastRow>> {
        tracing::info!(
            "開始備貨預測：{} 至 {}，品項 {} 個，安全係數 {}",
            start_date,
            end_date,
            sales.len(),
            safety_factor
        );

        let start_time = std::time::Instant::now();

        if start_date > end_date {
            return Err(BagelError::InvalidRange {
                start: start_date,
                end: end_date,
            });
        }
        if nb_days == 0 {
            return Err(BagelError::InvalidObservationWindow);
        }
        if safety_factor <= Decimal::ZERO {
            return Err(BagelError::InvalidSafetyFactor(safety_factor));
        }

        // Step 1: 每日平均銷售量
        tracing::debug!("Step 1: 每日平均銷售量");
        let averages: Vec<(&str, Decimal)> = sales
            .iter()
            .map(|record| {
                record
                    .average_per_day(nb_days)
                    .map(|avg| (record.product_name.as_str(), avg))
                    .ok_or(BagelError::InvalidObservationWindow)
            })
            .collect::<Result<_>>()?;

        // Step 2: 日曆與星期倍數（任一天查不到倍數即整體失敗，不輸出部分結果）
        tracing::debug!("Step 2: 日曆與星期倍數");
        let calendar: Vec<(NaiveDate, Decimal)> =
            BucketingCalculator::create_daily_buckets(start_date, end_date)?
                .into_iter()
                .map(|date| {
                    weekday_pattern
                        .factor(date.weekday())
                        .map(|factor| (date, factor))
                })
                .collect::<Result<_>>()?;
        tracing::debug!("預測天數: {}", calendar.len());

        // Step 3: 日期 × 品項
        tracing::debug!("Step 3: 日期 × 品項");
        let mut rows = Vec::with_capacity(calendar.len() * averages.len());
        for (date, weekday_factor) in &calendar {
            for (product_name, avg_per_day) in &averages {
                let qty = Self::quantity_to_prepare(
                    *avg_per_day,
                    *weekday_factor,
                    safety_factor,
                    rounding,
                )
                .ok_or_else(|| {
                    BagelError::CalculationError(format!(
                        "品項 {} 於 {} 的備貨量溢出",
                        product_name, date
                    ))
                })?;

                rows.push(ForecastRow::new(*date, *product_name, qty));
            }
        }

        rows.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        tracing::info!(
            "備貨預測完成，耗時 {:?}，預測列數: {}",
            start_time.elapsed(),
            rows.len()
        );

        Ok(rows)
    }

    /// 單日單品項備貨量
    ///
    /// 負值截為 0；溢出時回傳 `None`。
    pub fn quantity_to_prepare(
        avg_per_day: Decimal,
        weekday_factor: Decimal,
        safety_factor: Decimal,
        rounding: RoundingMode,
    ) -> Option<u64> {
        let forecast_qty = avg_per_day.checked_mul(weekday_factor)?;
        let with_safety = forecast_qty.checked_mul(safety_factor)?;

        rounding.round(with_safety).max(Decimal::ZERO).to_u64()
    }

    /// 獲取預測配置引用
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }
}
