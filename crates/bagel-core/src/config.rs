//! 預測配置模型

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::{BagelError, Result};

/// 備貨量取整方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RoundingMode {
    /// 四捨六入五成雙（銀行家捨入）
    #[default]
    HalfEven,

    /// 四捨五入（遠離零）
    HalfUp,
}

impl RoundingMode {
    /// 對應的 rust_decimal 捨入策略
    pub fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
        }
    }

    /// 取整到整數
    pub fn round(self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(0, self.strategy())
    }
}

impl FromStr for RoundingMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "half-even" | "halfeven" | "even" | "bankers" => Ok(RoundingMode::HalfEven),
            "half-up" | "halfup" | "up" => Ok(RoundingMode::HalfUp),
            _ => Err(format!("無效的取整方式: {}，必須是 'half-even' 或 'half-up'", s)),
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundingMode::HalfEven => write!(f, "half-even"),
            RoundingMode::HalfUp => write!(f, "half-up"),
        }
    }
}

/// 預測計算配置
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// 取整方式
    pub rounding: RoundingMode,

    /// 是否要求歷史涵蓋完整一週
    /// - true: 缺少任一星期時，資料準備階段即拒絕（預設）
    /// - false: 允許部分模式，預測到缺少的星期時才報錯
    pub require_full_week: bool,

    /// 原始銷售數量的編碼倍數（資料以千分位儲存，147000 => 147）
    pub quantity_scale: Decimal,
}

impl ForecastConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self {
            rounding: RoundingMode::HalfEven,
            require_full_week: true,
            quantity_scale: Decimal::from(1000),
        }
    }

    /// 建構器模式：設置取整方式
    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    /// 建構器模式：設置是否要求完整一週
    pub fn with_require_full_week(mut self, require: bool) -> Self {
        self.require_full_week = require;
        self
    }

    /// 建構器模式：設置數量編碼倍數
    pub fn with_quantity_scale(mut self, scale: Decimal) -> Self {
        self.quantity_scale = scale;
        self
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// 預測請求（由展示層提供）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRequest {
    /// 預測起始日
    pub target_date: NaiveDate,

    /// 預測天數（含起始日）
    pub horizon_days: u32,

    /// 安全庫存百分比（20 表示 +20%）
    pub safety_percent: Decimal,
}

impl ForecastRequest {
    /// 創建新的預測請求（預設 1 天、安全庫存 20%）
    pub fn new(target_date: NaiveDate) -> Self {
        Self {
            target_date,
            horizon_days: 1,
            safety_percent: Decimal::from(20),
        }
    }

    /// 以最後觀測日的隔天為起始日
    pub fn next_after(last_observed: NaiveDate) -> Result<Self> {
        let target_date = last_observed
            .succ_opt()
            .ok_or_else(|| BagelError::InvalidDate(format!("{} 之後的日期溢出", last_observed)))?;
        Ok(Self::new(target_date))
    }

    /// 依呼叫端指定的起始日建立請求
    ///
    /// 未指定時取最後觀測日的隔天；指定時必須晚於最後觀測日。
    pub fn starting(target_date: Option<NaiveDate>, last_observed: NaiveDate) -> Result<Self> {
        match target_date {
            Some(date) => {
                let request = Self::new(date);
                request.ensure_after(last_observed)?;
                Ok(request)
            }
            None => Self::next_after(last_observed),
        }
    }

    /// 建構器模式：設置預測天數
    pub fn with_horizon_days(mut self, days: u32) -> Self {
        self.horizon_days = days;
        self
    }

    /// 建構器模式：設置安全庫存百分比
    pub fn with_safety_percent(mut self, percent: Decimal) -> Self {
        self.safety_percent = percent;
        self
    }

    /// 預測結束日（含）
    pub fn end_date(&self) -> Result<NaiveDate> {
        if self.horizon_days == 0 {
            return Err(BagelError::InvalidHorizon(self.horizon_days));
        }

        self.target_date
            .checked_add_days(Days::new(u64::from(self.horizon_days - 1)))
            .ok_or_else(|| BagelError::InvalidDate(format!("{} 之後的日期溢出", self.target_date)))
    }

    /// 安全係數 = 1 + 百分比 / 100
    pub fn safety_factor(&self) -> Decimal {
        Decimal::ONE + self.safety_percent / Decimal::ONE_HUNDRED
    }

    /// 驗證請求參數
    pub fn validate(&self) -> Result<()> {
        self.end_date()?;

        let factor = self.safety_factor();
        if factor <= Decimal::ZERO {
            return Err(BagelError::InvalidSafetyFactor(factor));
        }

        Ok(())
    }

    /// 檢查起始日是否晚於最後觀測日
    pub fn ensure_after(&self, last_observed: NaiveDate) -> Result<()> {
        if self.target_date <= last_observed {
            let earliest = last_observed.succ_opt().unwrap_or(last_observed);
            return Err(BagelError::TargetBeforeHistory {
                target: self.target_date,
                earliest,
            });
        }
        Ok(())
    }
}
