//! CSV 資料載入
//!
//! 產品表欄位 `product_name,quantity`；客流表欄位 `date,customers`。
//! 其他欄位忽略，欄位值保留原始文字交由資料準備器解析。

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use bagel_core::{RawCustomerRow, RawProductRow};
use serde::de::DeserializeOwned;

/// 從檔案載入產品表
pub fn load_products(path: &Path) -> Result<Vec<RawProductRow>> {
    let file = File::open(path)
        .with_context(|| format!("無法開啟產品表 '{}'", path.display()))?;
    read_products(file).with_context(|| format!("無法讀取產品表 '{}'", path.display()))
}

/// 從檔案載入客流表
pub fn load_customers(path: &Path) -> Result<Vec<RawCustomerRow>> {
    let file = File::open(path)
        .with_context(|| format!("無法開啟客流表 '{}'", path.display()))?;
    read_customers(file).with_context(|| format!("無法讀取客流表 '{}'", path.display()))
}

pub fn read_products<R: Read>(reader: R) -> Result<Vec<RawProductRow>> {
    read_rows(reader)
}

pub fn read_customers<R: Read>(reader: R) -> Result<Vec<RawCustomerRow>> {
    read_rows(reader)
}

fn read_rows<R: Read, T: DeserializeOwned>(reader: R) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (index, record) in reader.deserialize().enumerate() {
        // 標題列為第 1 行
        let row: T = record.with_context(|| format!("第 {} 行格式錯誤", index + 2))?;
        rows.push(row);
    }

    tracing::debug!("載入 {} 列", rows.len());
    Ok(rows)
}
