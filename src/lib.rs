//! Brand health analytics over a labeled social-media sentiment dataset.
//!
//! The pipeline loads the training and validation files, computes the
//! sentiment distribution and per-brand health metrics, buckets brands into
//! industries, then writes a metrics CSV and two PNG dashboards.

pub mod aggregation;
pub mod category;
pub mod config;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod report;
pub mod schema;
pub mod visualization;

#[cfg(feature = "python")]
mod python;

use tracing::info;

pub use aggregation::{BrandMetric, HealthLabel, SentimentDistribution};
pub use category::{categorize_brand, Industry};
pub use config::AnalysisConfig;
pub use dataset::{Dataset, Record, Sentiment};
pub use error::{AnalysisError, Result};
pub use report::AnalysisReport;

/// Run the whole analysis: load, aggregate, categorize, write artifacts.
///
/// The first failure aborts the run; artifacts written before it are left
/// in place.
pub fn run(config: &AnalysisConfig) -> Result<AnalysisReport> {
    info!(base_path = %config.base_path.display(), "loading brand sentiment data");
    let dataset = Dataset::load(&config.training_path(), &config.validation_path())?;
    let overview = dataset.overview()?;
    info!(
        rows = overview.rows,
        brands = overview.distinct_brands,
        "dataset ready"
    );

    let distribution = aggregation::sentiment_distribution(&dataset)?;
    let top_brands = aggregation::top_brands(&dataset, config.top_brands)?;
    let metrics = aggregation::brand_metrics(&dataset)?;
    let industries = category::industry_breakdown(&dataset)?;

    let metrics_path = config.metrics_path();
    report::write_metrics_csv(&metrics, &metrics_path)?;

    let viz = visualization::VisualizationConfig::from(config);
    let dashboard_path = config.dashboard_path();
    visualization::render_dashboard(&dashboard_path, &distribution, &metrics, &viz)?;
    let industry_path = config.industry_path();
    visualization::render_industry_chart(&industry_path, &industries, &viz)?;

    info!("analysis complete");
    Ok(AnalysisReport {
        overview,
        distribution,
        top_brands,
        metrics,
        industries,
        artifacts: vec![dashboard_path, industry_path, metrics_path],
    })
}
