//! # Bagel Calculation Engine
//!
//! 資料準備與備貨預測計算

pub mod bucketing;
pub mod calculator;
pub mod preparer;

// Re-export 主要類型
pub use calculator::ForecastCalculator;
pub use preparer::DataPreparer;

use bagel_core::{ObservationWindow, ProductSalesRecord, WeekdayPattern};
use chrono::NaiveDate;
use serde::Serialize;

/// 資料準備結果（不可變快照）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedData {
    /// 菜單品項的歷史銷售總量（依名稱排序）
    pub sales: Vec<ProductSalesRecord>,

    /// 星期需求模式
    pub weekday_pattern: WeekdayPattern,

    /// 觀測窗口
    pub window: ObservationWindow,

    /// 警告信息
    pub warnings: Vec<PrepareWarning>,
}

impl PreparedData {
    /// 不重複觀測天數
    pub fn nb_days(&self) -> u32 {
        self.window.nb_days
    }

    /// 最後觀測日期
    pub fn last_observed_date(&self) -> NaiveDate {
        self.window.last_date
    }

    /// 被強制歸零的數量欄位筆數
    pub fn malformed_quantity_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| w.kind == WarningKind::MalformedQuantity)
            .count()
    }
}

/// 資料準備警告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrepareWarning {
    /// 來源列號（從 1 起算，不含標題列）
    pub row: usize,
    pub product_name: String,
    pub message: String,
    pub kind: WarningKind,
}

impl PrepareWarning {
    pub fn new(row: usize, product_name: String, message: String, kind: WarningKind) -> Self {
        Self {
            row,
            product_name,
            message,
            kind,
        }
    }

    /// 數量無法解析，已視為 0
    pub fn malformed_quantity(row: usize, product_name: String, raw: &str) -> Self {
        Self::new(
            row,
            product_name,
            format!("無法解析數量 '{}'，視為 0", raw),
            WarningKind::MalformedQuantity,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarningKind {
    MalformedQuantity,
}
