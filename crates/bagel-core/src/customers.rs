//! 客流模型

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 原始客流列（來自客流表）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawCustomerRow {
    /// 日期原始文字
    pub date: String,

    /// 客流數原始文字
    pub customers: String,
}

impl RawCustomerRow {
    pub fn new(date: impl Into<String>, customers: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            customers: customers.into(),
        }
    }
}

/// 單日客流記錄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerCountRecord {
    /// 日期
    pub date: NaiveDate,

    /// 當日客流數
    pub customers: Decimal,
}

impl CustomerCountRecord {
    pub fn new(date: NaiveDate, customers: Decimal) -> Self {
        Self { date, customers }
    }

    /// 星期
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }
}

/// 觀測窗口
///
/// 記錄客流歷史涵蓋的不重複日期數與最後觀測日期。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationWindow {
    /// 不重複日期數
    pub nb_days: u32,

    /// 最早觀測日期
    pub first_date: NaiveDate,

    /// 最後觀測日期
    pub last_date: NaiveDate,
}

impl ObservationWindow {
    /// 由客流記錄建立觀測窗口（無記錄時回傳 `None`）
    pub fn from_records(records: &[CustomerCountRecord]) -> Option<Self> {
        let dates: BTreeSet<NaiveDate> = records.iter().map(|r| r.date).collect();

        let first_date = *dates.first()?;
        let last_date = *dates.last()?;

        Some(Self {
            nb_days: u32::try_from(dates.len()).unwrap_or(u32::MAX),
            first_date,
            last_date,
        })
    }
}
