//! 時間分桶

use bagel_core::{BagelError, Result};
use chrono::NaiveDate;

/// 時間分桶計算器
pub struct BucketingCalculator;

impl BucketingCalculator {
    /// 創建每日時間桶（含起訖日）
    pub fn create_daily_buckets(start_date: NaiveDate, end_date: NaiveDate) -> Result<Vec<NaiveDate>> {
        if start_date > end_date {
            return Err(BagelError::InvalidRange {
                start: start_date,
                end: end_date,
            });
        }

        let span = (end_date - start_date).num_days() + 1;
        let mut buckets = Vec::with_capacity(usize::try_from(span).unwrap_or(0));
        let mut current = start_date;

        loop {
            buckets.push(current);
            if current == end_date {
                break;
            }
            current = current
                .succ_opt()
                .ok_or_else(|| BagelError::InvalidDate(format!("{} 之後的日期溢出", current)))?;
        }

        Ok(buckets)
    }
}
