//! 備貨預測結果模型

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::weekday_name;

/// 單日單品項的備貨量（預測引擎輸出）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForecastRow {
    /// 日期
    pub date: NaiveDate,

    /// 星期全名
    pub weekday: String,

    /// 品項名稱
    pub product_name: String,

    /// 建議備貨量
    pub qty_to_prepare: u64,
}

impl ForecastRow {
    /// 創建新的預測列（星期由日期推導）
    pub fn new(date: NaiveDate, product_name: impl Into<String>, qty_to_prepare: u64) -> Self {
        Self {
            date,
            weekday: weekday_name(date.weekday()).to_string(),
            product_name: product_name.into(),
            qty_to_prepare,
        }
    }

    /// 排序鍵（日期, 品項名稱）
    pub fn sort_key(&self) -> (NaiveDate, &str) {
        (self.date, self.product_name.as_str())
    }
}
