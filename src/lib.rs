//! # Bagel
//!
//! 貝果每日備貨預測：資料載入、報表與命令列展示層

pub mod loader;
pub mod report;

// Re-export 主要類型
pub use bagel_calc::{DataPreparer, ForecastCalculator, PreparedData};
pub use bagel_core::{
    BagelError, BagelMenu, ForecastConfig, ForecastRequest, ForecastRow, RoundingMode,
};
pub use report::{DailySummary, Pivot};
