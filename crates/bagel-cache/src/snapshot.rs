//! 快照緩存
//!
//! 以資料集指紋為鍵，緩存不可變的資料準備結果。
//! 緩存由呼叫端持有，不存在全域狀態。

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use bagel_calc::{DataPreparer, PreparedData};
use bagel_core::{BagelMenu, ForecastConfig, RawCustomerRow, RawProductRow, Result};

use crate::dirty_tracking::DirtyTracker;

/// 資料集識別鍵
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatasetKey(u64);

impl DatasetKey {
    /// 由原始輸入計算指紋（同一程序內穩定）
    pub fn fingerprint(
        raw_products: &[RawProductRow],
        raw_customers: &[RawCustomerRow],
        menu: &BagelMenu,
        config: &ForecastConfig,
    ) -> Self {
        let mut hasher = DefaultHasher::new();
        raw_products.hash(&mut hasher);
        raw_customers.hash(&mut hasher);
        menu.hash(&mut hasher);
        config.hash(&mut hasher);
        Self(hasher.finish())
    }

    /// 以外部版本號作為鍵
    pub fn from_raw(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// 緩存統計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// 資料準備快照緩存（讀穿式）
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<DatasetKey, Arc<PreparedData>>,
    dirty: DirtyTracker,
    stats: CacheStats,
}

impl DatasetCache {
    /// 創建空緩存
    pub fn new() -> Self {
        Self::default()
    }

    /// 讀取快照；不存在或已標記為髒時重新準備
    ///
    /// 準備失敗不會寫入緩存。
    pub fn get_or_prepare(
        &mut self,
        raw_products: &[RawProductRow],
        raw_customers: &[RawCustomerRow],
        menu: &BagelMenu,
        config: &ForecastConfig,
    ) -> Result<(DatasetKey, Arc<PreparedData>)> {
        let key = DatasetKey::fingerprint(raw_products, raw_customers, menu, config);

        if let Some(prepared) = self.get(key) {
            tracing::debug!("快照命中: {}", key);
            self.stats.hits += 1;
            return Ok((key, prepared));
        }

        tracing::debug!("快照未命中，重新準備: {}", key);
        self.stats.misses += 1;

        let prepared = Arc::new(DataPreparer::prepare(
            raw_products,
            raw_customers,
            menu,
            config,
        )?);
        self.entries.insert(key, Arc::clone(&prepared));
        self.dirty.clear_key(key);

        Ok((key, prepared))
    }

    /// 以新資料集取代先前的快照
    ///
    /// 新快照準備成功且鍵不同時，移除 `previous`；準備失敗時保留原快照。
    pub fn replace(
        &mut self,
        previous: Option<DatasetKey>,
        raw_products: &[RawProductRow],
        raw_customers: &[RawCustomerRow],
        menu: &BagelMenu,
        config: &ForecastConfig,
    ) -> Result<(DatasetKey, Arc<PreparedData>)> {
        let (key, prepared) = self.get_or_prepare(raw_products, raw_customers, menu, config)?;

        if let Some(previous) = previous.filter(|previous| *previous != key) {
            if self.invalidate(previous) {
                tracing::debug!("移除舊快照: {}", previous);
            }
        }

        Ok((key, prepared))
    }

    /// 讀取有效快照（已標記為髒則視為不存在）
    pub fn get(&self, key: DatasetKey) -> Option<Arc<PreparedData>> {
        if self.dirty.is_dirty(key) {
            return None;
        }
        self.entries.get(&key).cloned()
    }

    /// 標記快照過期（下次讀取時重新準備）
    pub fn mark_dirty(&mut self, key: DatasetKey) {
        if self.entries.contains_key(&key) {
            self.dirty.mark_dirty(key);
        }
    }

    /// 移除單一快照
    pub fn invalidate(&mut self, key: DatasetKey) -> bool {
        self.dirty.clear_key(key);
        self.entries.remove(&key).is_some()
    }

    /// 清空緩存
    pub fn clear(&mut self) {
        self.entries.clear();
        self.dirty.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 緩存統計
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bagel_core::BagelError;
    use rust_decimal::Decimal;

    fn customers() -> Vec<RawCustomerRow> {
        // 2025-10-06（週一）起一週
        (6..13)
            .map(|day| RawCustomerRow::new(format!("2025-10-{:02}", day), "100"))
            .collect()
    }

    fn products(quantity: &str) -> Vec<RawProductRow> {
        vec![RawProductRow::new("Bajgiel Mak", quantity)]
    }

    #[test]
    fn test_read_through() {
        let mut cache = DatasetCache::new();
        let menu = BagelMenu::default();
        let config = ForecastConfig::default();

        let (key1, first) = cache
            .get_or_prepare(&products("7000"), &customers(), &menu, &config)
            .unwrap();
        let (key2, second) = cache
            .get_or_prepare(&products("7000"), &customers(), &menu, &config)
            .unwrap();

        assert_eq!(key1, key2);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn test_changed_dataset_gets_new_entry() {
        let mut cache = DatasetCache::new();
        let menu = BagelMenu::default();
        let config = ForecastConfig::default();

        let (key1, _) = cache
            .get_or_prepare(&products("7000"), &customers(), &menu, &config)
            .unwrap();
        let (key2, prepared) = cache
            .get_or_prepare(&products("14000"), &customers(), &menu, &config)
            .unwrap();

        assert_ne!(key1, key2);
        assert_eq!(cache.len(), 2);
        assert_eq!(prepared.sales[0].total_quantity_sold, Decimal::from(14));
    }

    #[test]
    fn test_dirty_entry_reprepared() {
        let mut cache = DatasetCache::new();
        let menu = BagelMenu::default();
        let config = ForecastConfig::default();

        let (key, first) = cache
            .get_or_prepare(&products("7000"), &customers(), &menu, &config)
            .unwrap();
        cache.mark_dirty(key);
        assert!(cache.get(key).is_none());

        let (_, second) = cache
            .get_or_prepare(&products("7000"), &customers(), &menu, &config)
            .unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
        assert!(cache.get(key).is_some());
        assert_eq!(cache.stats().misses, 2);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let mut cache = DatasetCache::new();
        let menu = BagelMenu::default();
        let config = ForecastConfig::default();

        let (key, _) = cache
            .get_or_prepare(&products("7000"), &customers(), &menu, &config)
            .unwrap();

        assert!(cache.invalidate(key));
        assert!(!cache.invalidate(key));
        assert!(cache.is_empty());

        cache
            .get_or_prepare(&products("7000"), &customers(), &menu, &config)
            .unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_replace_drops_previous_snapshot() {
        let mut cache = DatasetCache::new();
        let menu = BagelMenu::default();
        let config = ForecastConfig::default();

        let (first, _) = cache
            .replace(None, &products("7000"), &customers(), &menu, &config)
            .unwrap();
        let (second, prepared) = cache
            .replace(Some(first), &products("14000"), &customers(), &menu, &config)
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(first).is_none());
        assert_eq!(prepared.sales[0].total_quantity_sold, Decimal::from(14));

        // 重新載入相同資料集不移除自身
        let (third, _) = cache
            .replace(Some(second), &products("14000"), &customers(), &menu, &config)
            .unwrap();
        assert_eq!(third, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_replace_failure_keeps_previous_snapshot() {
        let mut cache = DatasetCache::new();
        let menu = BagelMenu::default();
        let config = ForecastConfig::default();

        let (key, _) = cache
            .replace(None, &products("7000"), &customers(), &menu, &config)
            .unwrap();
        let result = cache.replace(Some(key), &products("7000"), &[], &menu, &config);

        assert!(matches!(result, Err(BagelError::EmptyHistory)));
        assert!(cache.get(key).is_some());
    }

    #[test]
    fn test_errors_not_cached() {
        let mut cache = DatasetCache::new();

        let result = cache.get_or_prepare(
            &products("7000"),
            &[],
            &BagelMenu::default(),
            &ForecastConfig::default(),
        );

        assert!(matches!(result, Err(BagelError::EmptyHistory)));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_config_is_part_of_key() {
        let menu = BagelMenu::default();
        let strict = DatasetKey::fingerprint(
            &products("7000"),
            &customers(),
            &menu,
            &ForecastConfig::default(),
        );
        let lenient = DatasetKey::fingerprint(
            &products("7000"),
            &customers(),
            &menu,
            &ForecastConfig::default().with_require_full_week(false),
        );

        assert_ne!(strict, lenient);
        assert_eq!(strict.to_string().len(), 16);
    }
}
