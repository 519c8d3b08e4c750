use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("InvalidData: {0}")]
    InvalidData(String),

    #[error("Chart rendering failed: {0}")]
    Chart(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

impl<E> From<DrawingAreaErrorKind<E>> for AnalysisError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        AnalysisError::Chart(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<AnalysisError> for pyo3::PyErr {
    fn from(err: AnalysisError) -> pyo3::PyErr {
        pyo3::exceptions::PyRuntimeError::new_err(err.to_string())
    }
}
