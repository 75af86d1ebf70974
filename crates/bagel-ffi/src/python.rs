//! Python 綁定實現

use std::sync::Arc;

use bagel_cache::{DatasetCache, DatasetKey};
use bagel_calc::{ForecastCalculator, PreparedData};
use bagel_core::{
    BagelError, BagelMenu, ForecastConfig, ForecastRequest, ForecastRow, RawCustomerRow,
    RawProductRow, RoundingMode,
};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

fn to_py_err(err: BagelError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn to_decimal(name: &str, value: f64) -> PyResult<Decimal> {
    Decimal::try_from(value)
        .map_err(|_| PyValueError::new_err(format!("Invalid {}: {}", name, value)))
}

/// Python 預測配置
#[pyclass(name = "ForecastConfig")]
#[derive(Clone)]
pub struct PyForecastConfig {
    #[pyo3(get, set)]
    pub rounding: String, // "half-even" or "half-up"
    #[pyo3(get, set)]
    pub require_full_week: bool,
    #[pyo3(get, set)]
    pub quantity_scale: f64,
}

#[pymethods]
impl PyForecastConfig {
    #[new]
    #[pyo3(signature = (rounding="half-even".to_string(), require_full_week=true, quantity_scale=1000.0))]
    fn new(rounding: String, require_full_week: bool, quantity_scale: f64) -> Self {
        Self {
            rounding,
            require_full_week,
            quantity_scale,
        }
    }
}

/// 內部方法實現（不暴露給 Python）
impl PyForecastConfig {
    /// 轉換為 Rust ForecastConfig（內部使用）
    pub(crate) fn to_rust_config(&self) -> PyResult<ForecastConfig> {
        let rounding: RoundingMode = self.rounding.parse().map_err(PyValueError::new_err)?;

        Ok(ForecastConfig::new()
            .with_rounding(rounding)
            .with_require_full_week(self.require_full_week)
            .with_quantity_scale(to_decimal("quantity_scale", self.quantity_scale)?))
    }
}

/// Python 預測列
#[pyclass(name = "ForecastRow")]
#[derive(Clone)]
pub struct PyForecastRow {
    #[pyo3(get)]
    pub date: String,
    #[pyo3(get)]
    pub weekday: String,
    #[pyo3(get)]
    pub product_name: String,
    #[pyo3(get)]
    pub qty_to_prepare: u64,
}

#[pymethods]
impl PyForecastRow {
    fn __repr__(&self) -> String {
        format!(
            "ForecastRow(date='{}', weekday='{}', product_name='{}', qty_to_prepare={})",
            self.date, self.weekday, self.product_name, self.qty_to_prepare
        )
    }
}

impl From<ForecastRow> for PyForecastRow {
    fn from(row: ForecastRow) -> Self {
        Self {
            date: row.date.to_string(),
            weekday: row.weekday,
            product_name: row.product_name,
            qty_to_prepare: row.qty_to_prepare,
        }
    }
}

/// Python 預測器
///
/// 持有資料準備快照緩存；同一資料集重複載入時不重新計算。
#[pyclass(name = "Forecaster")]
pub struct PyForecaster {
    config: ForecastConfig,
    menu: BagelMenu,
    cache: DatasetCache,
    current: Option<(DatasetKey, Arc<PreparedData>)>,
}

#[pymethods]
impl PyForecaster {
    #[new]
    #[pyo3(signature = (config=None))]
    fn new(config: Option<PyForecastConfig>) -> PyResult<Self> {
        let config = match config {
            Some(config) => config.to_rust_config()?,
            None => ForecastConfig::default(),
        };

        Ok(Self {
            config,
            menu: BagelMenu::default(),
            cache: DatasetCache::new(),
            current: None,
        })
    }

    /// 載入資料集
    ///
    /// `products` 為 (品項名稱, 數量文字) 列表，`customers` 為 (日期文字, 客流文字) 列表。
    /// 回傳資料集指紋。
    fn load(
        &mut self,
        products: Vec<(String, String)>,
        customers: Vec<(String, String)>,
    ) -> PyResult<String> {
        let raw_products: Vec<RawProductRow> = products
            .into_iter()
            .map(|(name, quantity)| RawProductRow::new(name, quantity))
            .collect();
        let raw_customers: Vec<RawCustomerRow> = customers
            .into_iter()
            .map(|(date, count)| RawCustomerRow::new(date, count))
            .collect();

        let previous = self.current.as_ref().map(|(key, _)| *key);
        let (key, prepared) = self
            .cache
            .replace(previous, &raw_products, &raw_customers, &self.menu, &self.config)
            .map_err(to_py_err)?;
        self.current = Some((key, prepared));

        Ok(key.to_string())
    }

    /// 執行備貨預測
    ///
    /// 未指定 `target_date` 時，以最後觀測日的隔天為起始日；指定時必須晚於最後觀測日。
    #[pyo3(signature = (target_date=None, horizon_days=1, safety_percent=20.0))]
    fn forecast(
        &self,
        target_date: Option<String>,
        horizon_days: u32,
        safety_percent: f64,
    ) -> PyResult<Vec<PyForecastRow>> {
        let prepared = self.prepared()?;

        let target_date = target_date
            .map(|raw| bagel_core::parse_date(&raw))
            .transpose()
            .map_err(to_py_err)?;
        let request = ForecastRequest::starting(target_date, prepared.last_observed_date())
            .map_err(to_py_err)?
            .with_horizon_days(horizon_days)
            .with_safety_percent(to_decimal("safety_percent", safety_percent)?);

        let rows = ForecastCalculator::new(self.config.clone())
            .forecast(prepared, &request)
            .map_err(to_py_err)?;

        Ok(rows.into_iter().map(PyForecastRow::from).collect())
    }

    /// 最後觀測日期（YYYY-MM-DD）
    fn last_observed_date(&self) -> PyResult<String> {
        Ok(self.prepared()?.last_observed_date().to_string())
    }

    /// 不重複觀測天數
    fn nb_days(&self) -> PyResult<u32> {
        Ok(self.prepared()?.nb_days())
    }

    /// 被強制歸零的數量欄位筆數
    fn malformed_quantity_count(&self) -> PyResult<usize> {
        Ok(self.prepared()?.malformed_quantity_count())
    }

    /// 星期模式 [(星期全名, 倍數)]
    fn weekday_pattern(&self) -> PyResult<Vec<(String, f64)>> {
        Ok(self
            .prepared()?
            .weekday_pattern
            .named()
            .into_iter()
            .map(|(name, factor)| (name.to_string(), factor.to_f64().unwrap_or(f64::NAN)))
            .collect())
    }
}

impl PyForecaster {
    fn prepared(&self) -> PyResult<&PreparedData> {
        self.current
            .as_ref()
            .map(|(_, prepared)| prepared.as_ref())
            .ok_or_else(|| PyRuntimeError::new_err("No dataset loaded, call load() first"))
    }
}
