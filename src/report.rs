use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::info;

use crate::aggregation::{
    bottom_by_score, metrics_frame, top_by_mentions, top_by_score, BrandMetric,
    SentimentDistribution,
};
use crate::category::IndustryBreakdown;
use crate::config::AnalysisConfig;
use crate::dataset::DatasetOverview;
use crate::error::Result;
use crate::schema::metrics;

/// Everything one run computed, plus the files it wrote.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub overview: DatasetOverview,
    pub distribution: SentimentDistribution,
    /// Most mentioned brands, descending.
    pub top_brands: Vec<(String, u64)>,
    /// Ordered by mentions, descending.
    pub metrics: Vec<BrandMetric>,
    pub industries: IndustryBreakdown,
    pub artifacts: Vec<PathBuf>,
}

/// Write the metrics table as CSV with a header row.
pub fn write_metrics_csv(metrics: &[BrandMetric], path: &Path) -> Result<()> {
    let mut df = metrics_frame(metrics)?;
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;
    info!(path = %path.display(), rows = df.height(), "saved brand metrics");
    Ok(())
}

// ── Console output ──────────────────────────────────────────────────────────

fn rule(out: &mut String, width: usize) {
    writeln!(out, "{}", "=".repeat(width)).unwrap();
}

fn heading(out: &mut String, title: &str, width: usize) {
    rule(out, width);
    writeln!(out, "{title}").unwrap();
    rule(out, width);
}

/// `1234567` → `1,234,567`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn format_overview(overview: &DatasetOverview) -> String {
    let mut out = String::new();
    writeln!(out, "Total tweets analyzed: {}", thousands(overview.rows as u64)).unwrap();
    writeln!(out, "Brands tracked: {}", overview.distinct_brands).unwrap();
    writeln!(out).unwrap();
    heading(&mut out, "DATASET OVERVIEW", 60);
    writeln!(out, "{:<12} {:>10} {:>10}", "column", "non-null", "null").unwrap();
    for (name, nulls) in &overview.null_counts {
        writeln!(
            out,
            "{:<12} {:>10} {:>10}",
            name,
            overview.rows.saturating_sub(*nulls),
            nulls
        )
        .unwrap();
    }
    rule(&mut out, 60);
    out
}

pub fn format_distribution(distribution: &SentimentDistribution) -> String {
    let mut out = String::from("Overall Sentiment Distribution:\n");
    for share in &distribution.shares {
        writeln!(
            out,
            "  {:<12}: {:>6} tweets ({:5.2}%)",
            share.sentiment.as_str(),
            thousands(share.count),
            share.percent
        )
        .unwrap();
    }
    out
}

pub fn format_top_brands(top: &[(String, u64)]) -> String {
    let mut out = format!("Top {} Most Mentioned Brands:\n", top.len());
    for (brand, count) in top {
        writeln!(out, "  {:<30}: {:>6} mentions", brand, thousands(*count)).unwrap();
    }
    out
}

pub fn format_health_table(metrics: &[BrandMetric], rows: usize) -> String {
    let mut out = String::new();
    heading(
        &mut out,
        &format!("BRAND HEALTH ANALYSIS - Top {rows} Brands"),
        80,
    );
    writeln!(
        out,
        "{:<20} {:>14} {:>8} {:>8} {:>7} {:>10} {:>15} {:>14} {:>14} {:>12}",
        metrics::BRAND,
        metrics::TOTAL_MENTIONS,
        metrics::POSITIVE,
        metrics::NEGATIVE,
        metrics::NEUTRAL,
        metrics::IRRELEVANT,
        metrics::SENTIMENT_SCORE,
        metrics::POSITIVE_RATIO,
        metrics::NEGATIVE_RATIO,
        metrics::BRAND_HEALTH,
    )
    .unwrap();
    for m in metrics.iter().take(rows) {
        writeln!(
            out,
            "{:<20} {:>14} {:>8} {:>8} {:>7} {:>10} {:>15.2} {:>14.2} {:>14.2} {:>12}",
            m.brand,
            m.total_mentions,
            m.positive_count,
            m.negative_count,
            m.neutral_count,
            m.irrelevant_count,
            m.sentiment_score,
            m.positive_ratio,
            m.negative_ratio,
            m.health_label.as_str(),
        )
        .unwrap();
    }
    out
}

pub fn format_insights(metrics: &[BrandMetric], n: usize) -> String {
    let mut out = String::new();
    heading(&mut out, "KEY INSIGHTS & RECOMMENDATIONS", 80);

    writeln!(out, "\nTOP {n} BRANDS BY SENTIMENT SCORE:").unwrap();
    for m in top_by_score(metrics, n) {
        score_line(&mut out, m);
    }

    writeln!(out, "\nBRANDS REQUIRING ATTENTION (Lowest Sentiment):").unwrap();
    for m in bottom_by_score(metrics, n) {
        score_line(&mut out, m);
    }

    writeln!(out, "\nHIGHEST ENGAGEMENT BRANDS:").unwrap();
    for m in top_by_mentions(metrics, n) {
        writeln!(
            out,
            "  {:<20} | {:>6} mentions | Positive: {:.1}% | Negative: {:.1}%",
            m.brand,
            thousands(m.total_mentions),
            m.positive_ratio,
            m.negative_ratio
        )
        .unwrap();
    }
    out
}

fn score_line(out: &mut String, m: &BrandMetric) {
    writeln!(
        out,
        "  {:<20} | Score: {:+6.2}% | Mentions: {}",
        m.brand,
        m.sentiment_score,
        thousands(m.total_mentions)
    )
    .unwrap();
}

pub fn format_industries(breakdown: &IndustryBreakdown) -> String {
    let mut out = String::from("Mentions by Industry:\n");
    for stats in &breakdown.industries {
        writeln!(
            out,
            "  {:<14}: {:>6} ({:5.1}%)",
            stats.industry.as_str(),
            thousands(stats.mentions),
            breakdown.mention_percent(stats)
        )
        .unwrap();
    }
    out
}

/// The full console report for one run.
pub fn render_console(report: &AnalysisReport, config: &AnalysisConfig) -> String {
    let mut out = String::new();
    out.push_str(&format_overview(&report.overview));
    out.push('\n');
    out.push_str(&format_distribution(&report.distribution));
    out.push('\n');
    out.push_str(&format_top_brands(&report.top_brands));
    out.push('\n');
    out.push_str(&format_health_table(&report.metrics, config.health_table_rows));
    out.push('\n');
    out.push_str(&format_industries(&report.industries));
    out.push('\n');
    out.push_str(&format_insights(&report.metrics, config.insight_count));
    out.push('\n');
    heading(&mut out, "ANALYSIS COMPLETE", 80);
    writeln!(out, "Generated Files:").unwrap();
    for (i, path) in report.artifacts.iter().enumerate() {
        writeln!(out, "  {}. {}", i + 1, path.display()).unwrap();
    }
    out
}
