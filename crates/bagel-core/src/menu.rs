//! 貝果菜單（允許清單）

use serde::{Deserialize, Serialize};

/// 列入預測的貝果品項
pub const BAGEL_MENU: [&str; 10] = [
    // 預製貝果
    "Cheddar i boczuś",
    "Warszawski LOX",
    "Vege Halloumi",
    "Sezonowa Nocciola",
    // 貝果基底
    "Bajgiel Chałka",
    "Bajgiel Cheddar",
    "Bajgiel Golas",
    "Bajgiel Mak",
    "Bajgiel Mix",
    "Bajgiel Sezam",
];

/// 貝果菜單
///
/// 不在菜單上的品項不參與任何計算。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BagelMenu {
    items: Vec<String>,
}

impl BagelMenu {
    /// 以自訂品項建立菜單（重複名稱只保留一次）
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut items: Vec<String> = items.into_iter().map(Into::into).collect();
        items.sort();
        items.dedup();
        Self { items }
    }

    /// 檢查品項是否在菜單上
    pub fn contains(&self, product_name: &str) -> bool {
        self.items.binary_search_by(|item| item.as_str().cmp(product_name)).is_ok()
    }

    /// 品項數量
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 依名稱排序的品項
    pub fn items(&self) -> &[String] {
        &self.items
    }
}

impl Default for BagelMenu {
    fn default() -> Self {
        Self::new(BAGEL_MENU)
    }
}
