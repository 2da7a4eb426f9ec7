use cellnet_core::SimConfig;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Python bindings exposing cellnet-core to a plotting front end.
#[pyfunction]
fn version() -> &'static str {
    "0.1.0"
}

/// Default configuration as JSON, for front ends to seed their controls.
#[pyfunction]
fn default_config() -> PyResult<String> {
    serde_json::to_string(&SimConfig::default()).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Run a simulation and return its history as JSON.
///
/// `config_json` may set any subset of fields; missing ones take their defaults.
#[pyfunction]
#[pyo3(signature = (config_json=None))]
fn simulate(config_json: Option<&str>) -> PyResult<String> {
    let config = match config_json {
        Some(raw) => serde_json::from_str::<SimConfig>(raw)
            .map_err(|e| PyValueError::new_err(format!("invalid config JSON: {e}")))?,
        None => SimConfig::default(),
    };
    let history =
        cellnet_core::simulate(config).map_err(|e| PyValueError::new_err(e.to_string()))?;
    history
        .to_json()
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(version, m)?)?;
    m.add_function(wrap_pyfunction!(default_config, m)?)?;
    m.add_function(wrap_pyfunction!(simulate, m)?)?;
    Ok(())
}
