//! 髒標記追蹤

use std::collections::HashSet;

use crate::snapshot::DatasetKey;

/// 髒標記追蹤器
///
/// 被標記的資料集在下次讀取時重新準備。
#[derive(Debug, Default)]
pub struct DirtyTracker {
    dirty_datasets: HashSet<DatasetKey>,
}

impl DirtyTracker {
    /// 創建新的追蹤器
    pub fn new() -> Self {
        Self::default()
    }

    /// 標記資料集為髒
    pub fn mark_dirty(&mut self, key: DatasetKey) {
        self.dirty_datasets.insert(key);
    }

    /// 檢查資料集是否為髒
    pub fn is_dirty(&self, key: DatasetKey) -> bool {
        self.dirty_datasets.contains(&key)
    }

    /// 清除單一資料集的髒標記
    pub fn clear_key(&mut self, key: DatasetKey) {
        self.dirty_datasets.remove(&key);
    }

    /// 清除所有髒標記
    pub fn clear(&mut self) {
        self.dirty_datasets.clear();
    }

    /// 髒資料集數量
    pub fn len(&self) -> usize {
        self.dirty_datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirty_datasets.is_empty()
    }
}
