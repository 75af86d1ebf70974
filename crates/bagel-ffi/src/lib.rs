//! # Bagel FFI
//!
//! Python 綁定層（PyO3），供 Python 儀表板呼叫

use pyo3::prelude::*;

pub mod python;

/// Python 模組註冊
#[pymodule]
fn bagel_engine(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::PyForecaster>()?;
    m.add_class::<python::PyForecastRow>()?;
    m.add_class::<python::PyForecastConfig>()?;
    m.add("BAGEL_MENU", bagel_core::BAGEL_MENU.to_vec())?;
    Ok(())
}
