//! 星期需求模式

use chrono::Weekday;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::{weekday_name, WEEKDAYS};
use crate::{BagelError, Result};

/// 星期需求模式
///
/// 每個星期對應一個相對客流倍數，正規化後七天平均為 1.0。
/// 索引 0 = 週一, ..., 6 = 週日；`None` 表示歷史中從未出現該星期。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayPattern {
    factors: [Option<Decimal>; 7],
}

impl WeekdayPattern {
    /// 創建完整的星期模式（七天皆有倍數）
    pub fn new(factors: [Decimal; 7]) -> Self {
        Self {
            factors: factors.map(Some),
        }
    }

    /// 創建可能缺少部分星期的模式
    pub fn partial(factors: [Option<Decimal>; 7]) -> Self {
        Self { factors }
    }

    /// 由各星期平均客流正規化
    ///
    /// 每個星期的倍數 = 該星期平均客流 / 所有已觀測星期平均客流的平均。
    pub fn from_daily_means(means: [Option<Decimal>; 7]) -> Result<Self> {
        let observed: Vec<Decimal> = means.iter().flatten().copied().collect();
        if observed.is_empty() {
            return Err(BagelError::EmptyHistory);
        }

        let overall_mean =
            observed.iter().copied().sum::<Decimal>() / Decimal::from(observed.len());
        if overall_mean.is_zero() {
            return Err(BagelError::CalculationError(
                "平均客流為零，無法正規化星期模式".to_string(),
            ));
        }

        Ok(Self {
            factors: means.map(|mean| mean.map(|m| m / overall_mean)),
        })
    }

    /// 查詢星期倍數
    pub fn factor(&self, weekday: Weekday) -> Result<Decimal> {
        self.factors[weekday.num_days_from_monday() as usize]
            .ok_or(BagelError::UnknownWeekday(weekday))
    }

    /// 是否七天皆有倍數
    pub fn is_complete(&self) -> bool {
        self.factors.iter().all(Option::is_some)
    }

    /// 缺少倍數的星期
    pub fn missing_weekdays(&self) -> Vec<Weekday> {
        WEEKDAYS
            .iter()
            .zip(self.factors.iter())
            .filter(|(_, factor)| factor.is_none())
            .map(|(weekday, _)| *weekday)
            .collect()
    }

    /// 要求七天完整，否則拒絕
    pub fn ensure_complete(self) -> Result<Self> {
        let missing = self.missing_weekdays();
        if missing.is_empty() {
            Ok(self)
        } else {
            Err(BagelError::IncompleteWeekdayPattern(missing))
        }
    }

    /// 已觀測的倍數總和（七天完整時應為 7）
    pub fn sum(&self) -> Decimal {
        self.factors.iter().flatten().copied().sum()
    }

    /// 依週一到週日迭代已觀測的倍數
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, Decimal)> + '_ {
        WEEKDAYS
            .iter()
            .zip(self.factors.iter())
            .filter_map(|(weekday, factor)| factor.map(|f| (*weekday, f)))
    }

    /// 以星期全名列出倍數（供顯示）
    pub fn named(&self) -> Vec<(&'static str, Decimal)> {
        self.iter().map(|(d, f)| (weekday_name(d), f)).collect()
    }
}
