use pyo3::prelude::*;
use pyo3::types::PyModule;
use pyo3_polars::PyDataFrame;

use crate::aggregation::{brand_metrics, metrics_frame};
use crate::config::AnalysisConfig;
use crate::dataset::Dataset;
use crate::schema;

/// Industry bucket for a brand name.
#[pyfunction]
fn categorize_brand(brand: &str) -> &'static str {
    crate::category::categorize_brand(brand).as_str()
}

/// Brand health metrics for a frame with `id, brand, sentiment, text` columns.
#[pyfunction]
fn brand_health_metrics(records: PyDataFrame) -> PyResult<PyDataFrame> {
    let dataset = Dataset::from_dataframe(records.0)?;
    let metrics = brand_metrics(&dataset)?;
    Ok(PyDataFrame(metrics_frame(&metrics)?))
}

/// Run the full analysis against the default file names under `base_path`
/// and return the metrics table.
#[pyfunction]
#[pyo3(signature = (base_path="."))]
fn run_analysis(base_path: &str) -> PyResult<PyDataFrame> {
    let config = AnalysisConfig::default().with_base_path(base_path);
    let report = crate::run(&config)?;
    Ok(PyDataFrame(metrics_frame(&report.metrics)?))
}

/// Export column-name constants as Python submodules
fn add_schema_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Record
    let record = PyModule::new(m.py(), "record")?;
    record.add("ID", schema::record::ID)?;
    record.add("BRAND", schema::record::BRAND)?;
    record.add("SENTIMENT", schema::record::SENTIMENT)?;
    record.add("TEXT", schema::record::TEXT)?;
    m.add_submodule(&record)?;

    // Metrics
    let metrics = PyModule::new(m.py(), "metrics")?;
    for (name, column) in schema::metrics::EXPORTS {
        metrics.add(name, column)?;
    }
    metrics.add("ALL", schema::metrics::ALL.to_vec())?;
    m.add_submodule(&metrics)?;

    Ok(())
}

#[pymodule]
#[pyo3(name = "_core")]
fn brand_pulse_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(categorize_brand, m)?)?;
    m.add_function(wrap_pyfunction!(brand_health_metrics, m)?)?;
    m.add_function(wrap_pyfunction!(run_analysis, m)?)?;
    add_schema_exports(m)?;
    Ok(())
}
