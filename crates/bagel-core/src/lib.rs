//! # Bagel Core
//!
//! 核心資料模型與類型定義

pub mod calendar;
pub mod config;
pub mod customers;
pub mod forecast;
pub mod menu;
pub mod pattern;
pub mod sales;

// Re-export 主要類型
pub use calendar::{parse_date, weekday_name, WEEKDAYS};
pub use config::{ForecastConfig, ForecastRequest, RoundingMode};
pub use customers::{CustomerCountRecord, ObservationWindow, RawCustomerRow};
pub use forecast::ForecastRow;
pub use menu::{BagelMenu, BAGEL_MENU};
pub use pattern::WeekdayPattern;
pub use sales::{ProductSalesRecord, RawProductRow};

use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;

/// 預測錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum BagelError {
    #[error("客流歷史為空，無法計算星期模式")]
    EmptyHistory,

    #[error("星期模式缺少 {}", weekday_name(.0.clone()))]
    UnknownWeekday(Weekday),

    #[error("歷史資料未涵蓋完整一週，缺少: {}", .0.iter().map(|d| weekday_name(*d)).collect::<Vec<_>>().join(", "))]
    IncompleteWeekdayPattern(Vec<Weekday>),

    #[error("無效的日期範圍: {start} > {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("觀測天數必須大於 0")]
    InvalidObservationWindow,

    #[error("安全係數必須大於 0: {0}")]
    InvalidSafetyFactor(Decimal),

    #[error("預測天數必須至少為 1: {0}")]
    InvalidHorizon(u32),

    #[error("無效的日期: {0}")]
    InvalidDate(String),

    #[error("無效的客流數 ({date}): {raw}")]
    MalformedCustomerCount { date: NaiveDate, raw: String },

    #[error("預測日期 {target} 早於允許的最早日期 {earliest}")]
    TargetBeforeHistory { target: NaiveDate, earliest: NaiveDate },

    #[error("計算錯誤: {0}")]
    CalculationError(String),
}

pub type Result<T> = std::result::Result<T, BagelError>;
