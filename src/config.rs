use std::path::{Path, PathBuf};

/// Input/output locations and report sizes for one analysis run.
///
/// `Default` gives the fixed file names the binary works with, resolved
/// against the current working directory.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Directory all file names below are resolved against.
    pub base_path: PathBuf,
    pub training_file: String,
    pub validation_file: String,
    pub metrics_file: String,
    pub dashboard_file: String,
    pub industry_file: String,
    /// Brands listed in the "most mentioned" console section.
    pub top_brands: usize,
    /// Brands shown in the mention and breakdown dashboard panels.
    pub dashboard_brands: usize,
    /// Brands shown in the sentiment score dashboard panel.
    pub score_brands: usize,
    /// Rows per key-insight section.
    pub insight_count: usize,
    /// Rows printed in the brand health table.
    pub health_table_rows: usize,
    pub dashboard_size: (u32, u32),
    pub industry_chart_size: (u32, u32),
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("."),
            training_file: "twitter_training.csv".to_string(),
            validation_file: "twitter_validation.csv".to_string(),
            metrics_file: "brand_health_metrics.csv".to_string(),
            dashboard_file: "twitter_sentiment_dashboard.png".to_string(),
            industry_file: "industry_sentiment_analysis.png".to_string(),
            top_brands: 15,
            dashboard_brands: 10,
            score_brands: 15,
            insight_count: 5,
            health_table_rows: 10,
            dashboard_size: (1600, 1200),
            industry_chart_size: (1600, 600),
        }
    }
}

impl AnalysisConfig {
    pub fn with_base_path(mut self, base_path: impl AsRef<Path>) -> Self {
        self.base_path = base_path.as_ref().to_path_buf();
        self
    }

    pub fn training_path(&self) -> PathBuf {
        self.base_path.join(&self.training_file)
    }

    pub fn validation_path(&self) -> PathBuf {
        self.base_path.join(&self.validation_file)
    }

    pub fn metrics_path(&self) -> PathBuf {
        self.base_path.join(&self.metrics_file)
    }

    pub fn dashboard_path(&self) -> PathBuf {
        self.base_path.join(&self.dashboard_file)
    }

    pub fn industry_path(&self) -> PathBuf {
        self.base_path.join(&self.industry_file)
    }
}
