//! 預測報表
//!
//! 對預測列做分組與樞紐：單日摘要、品項 × 日期矩陣。

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

use bagel_core::ForecastRow;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// 長條圖最大寬度（字元）
const BAR_WIDTH: u64 = 40;

/// 依最大值等比例換算長條長度
fn bar_length(qty: u64, max_qty: u64) -> u64 {
    if max_qty == 0 {
        return 0;
    }
    // u128 中間值避免大數量相乘溢出
    let scaled = u128::from(qty) * u128::from(BAR_WIDTH) / u128::from(max_qty);
    u64::try_from(scaled).unwrap_or(BAR_WIDTH)
}

/// 單日備貨摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,

    /// 當日總備貨量
    pub total_to_prepare: u64,

    /// 品項數
    pub product_count: usize,

    /// 安全庫存百分比
    pub safety_percent: Decimal,

    /// (品項, 備貨量)，依備貨量遞減
    pub lines: Vec<(String, u64)>,
}

impl DailySummary {
    /// 由預測列建立指定日期的摘要
    pub fn for_date(rows: &[ForecastRow], date: NaiveDate, safety_percent: Decimal) -> Self {
        let mut lines: Vec<(String, u64)> = rows
            .iter()
            .filter(|row| row.date == date)
            .map(|row| (row.product_name.clone(), row.qty_to_prepare))
            .collect();
        lines.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            date,
            total_to_prepare: lines.iter().map(|(_, qty)| qty).sum(),
            product_count: lines.len(),
            safety_percent,
            lines,
        }
    }

    /// 文字報表（含長條圖）
    pub fn render(&self) -> String {
        let mut out = String::new();
        let name_width = self.lines.iter().map(|(name, _)| name.chars().count()).max().unwrap_or(0);
        let max_qty = self.lines.iter().map(|(_, qty)| *qty).max().unwrap_or(0);

        let _ = writeln!(out, "{} 備貨量", self.date);
        let _ = writeln!(out, "  總備貨量: {}", self.total_to_prepare);
        let _ = writeln!(out, "  品項數:   {}", self.product_count);
        let _ = writeln!(out, "  安全庫存: {} %", self.safety_percent.trunc());
        let _ = writeln!(out);

        for (name, qty) in &self.lines {
            let bar_len = bar_length(*qty, max_qty);
            let padding = name_width - name.chars().count();
            let _ = writeln!(
                out,
                "  {}{} {:>5} {}",
                name,
                " ".repeat(padding),
                qty,
                "█".repeat(bar_len as usize)
            );
        }

        out
    }
}

/// 品項 × 日期樞紐表（缺值為 0）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pivot {
    pub dates: Vec<NaiveDate>,
    pub products: Vec<String>,

    /// cells[品項索引][日期索引]
    pub cells: Vec<Vec<u64>>,
}

impl Pivot {
    /// 由預測列建立樞紐表（同格多列時加總）
    pub fn from_rows(rows: &[ForecastRow]) -> Self {
        let dates: Vec<NaiveDate> = rows
            .iter()
            .map(|row| row.date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut by_product: BTreeMap<&str, BTreeMap<NaiveDate, u64>> = BTreeMap::new();
        for row in rows {
            *by_product
                .entry(row.product_name.as_str())
                .or_default()
                .entry(row.date)
                .or_insert(0) += row.qty_to_prepare;
        }

        let products = by_product.keys().map(|name| name.to_string()).collect();
        let cells = by_product
            .values()
            .map(|per_date| {
                dates
                    .iter()
                    .map(|date| per_date.get(date).copied().unwrap_or(0))
                    .collect()
            })
            .collect();

        Self {
            dates,
            products,
            cells,
        }
    }

    /// 查詢單格
    pub fn get(&self, product_name: &str, date: NaiveDate) -> Option<u64> {
        let product_index = self.products.iter().position(|p| p == product_name)?;
        let date_index = self.dates.iter().position(|d| *d == date)?;
        Some(self.cells[product_index][date_index])
    }

    /// 文字報表
    pub fn render(&self) -> String {
        let mut out = String::new();
        let name_width = self
            .products
            .iter()
            .map(|name| name.chars().count())
            .max()
            .unwrap_or(0)
            .max("product_name".len());

        let _ = write!(out, "{:<width$}", "product_name", width = name_width);
        for date in &self.dates {
            let _ = write!(out, " {:>10}", date.to_string());
        }
        let _ = writeln!(out);

        for (name, row) in self.products.iter().zip(&self.cells) {
            let padding = name_width - name.chars().count();
            let _ = write!(out, "{}{}", name, " ".repeat(padding));
            for qty in row {
                let _ = write!(out, " {:>10}", qty);
            }
            let _ = writeln!(out);
        }

        out
    }
}
