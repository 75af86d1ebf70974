//! # Bagel Cache
//!
//! 資料準備結果的快照緩存

pub mod dirty_tracking;
pub mod snapshot;

// Re-export 主要類型
pub use dirty_tracking::DirtyTracker;
pub use snapshot::{CacheStats, DatasetCache, DatasetKey};
