//! 品項銷售模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 原始品項銷售列（來自產品表）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawProductRow {
    /// 品項名稱
    pub product_name: String,

    /// 銷售數量原始文字（千分位編碼，可能為空或無法解析）
    pub quantity: String,
}

impl RawProductRow {
    pub fn new(product_name: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            quantity: quantity.into(),
        }
    }
}

/// 品項歷史銷售總量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSalesRecord {
    /// 品項名稱
    pub product_name: String,

    /// 觀測期間內的銷售總量（已換算為個數）
    pub total_quantity_sold: Decimal,
}

impl ProductSalesRecord {
    /// 創建新的銷售記錄
    pub fn new(product_name: impl Into<String>, total_quantity_sold: Decimal) -> Self {
        Self {
            product_name: product_name.into(),
            total_quantity_sold,
        }
    }

    /// 每日平均銷售量
    ///
    /// `nb_days` 為 0 時回傳 `None`。
    pub fn average_per_day(&self, nb_days: u32) -> Option<Decimal> {
        if nb_days == 0 {
            return None;
        }
        Some(self.total_quantity_sold / Decimal::from(nb_days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_per_day() {
        let record = ProductSalesRecord::new("Bajgiel Mak", Decimal::from(100));

        assert_eq!(record.average_per_day(10), Some(Decimal::from(10)));
        assert_eq!(record.average_per_day(0), None);
    }

    #[test]
    fn test_average_per_day_fractional() {
        let record = ProductSalesRecord::new("Bajgiel Sezam", Decimal::from(7));

        assert_eq!(record.average_per_day(2), Some(Decimal::new(35, 1)));
    }
}
