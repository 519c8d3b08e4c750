//! Visualization module: static PNG dashboards.
//!
//! Two images are produced:
//! - the brand dashboard (2×2): sentiment pie, most mentioned brands,
//!   stacked sentiment breakdown, sentiment score per brand
//! - the industry chart (1×2): mentions per industry pie, sentiment share
//!   per industry as grouped bars
//!
//! Rendering goes through plotters' bitmap backend. Captions, axes, legends
//! and value labels need a font backend (the default `fonts` feature); a build
//! without it draws the chart geometry only.
use std::f64::consts::PI;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::info;

use crate::aggregation::{BrandMetric, SentimentDistribution};
use crate::category::IndustryBreakdown;
use crate::config::AnalysisConfig;
use crate::dataset::Sentiment;
use crate::error::Result;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const FONT: &str = "sans-serif";

/// Plotters' fallback font can measure text but panics when asked to draw it.
const DRAW_TEXT: bool = cfg!(feature = "fonts");

const POSITIVE_COLOR: RGBColor = RGBColor(0x2e, 0xcc, 0x71);
const NEGATIVE_COLOR: RGBColor = RGBColor(0xe7, 0x4c, 0x3c);
const NEUTRAL_COLOR: RGBColor = RGBColor(0x95, 0xa5, 0xa6);
const IRRELEVANT_COLOR: RGBColor = RGBColor(0xf3, 0x9c, 0x12);
const MENTION_COLOR: RGBColor = RGBColor(0x34, 0x98, 0xdb);

const INDUSTRY_PALETTE: [RGBColor; 5] = [
    RGBColor(0xf7, 0x75, 0x6f),
    RGBColor(0xa3, 0xa5, 0x00),
    RGBColor(0x00, 0xbf, 0x7d),
    RGBColor(0x00, 0xb0, 0xf6),
    RGBColor(0xe7, 0x6b, 0xf3),
];

// ── Config ──────────────────────────────────────────────────────────────────

/// Sizes and row counts for both images.
#[derive(Debug, Clone)]
pub struct VisualizationConfig {
    /// Pixel size of the brand dashboard.
    pub dashboard_size: (u32, u32),
    /// Pixel size of the industry chart.
    pub industry_size: (u32, u32),
    /// Brands in the mention and breakdown panels.
    pub dashboard_brands: usize,
    /// Brands in the sentiment score panel.
    pub score_brands: usize,
}

impl From<&AnalysisConfig> for VisualizationConfig {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            dashboard_size: config.dashboard_size,
            industry_size: config.industry_chart_size,
            dashboard_brands: config.dashboard_brands,
            score_brands: config.score_brands,
        }
    }
}

pub fn sentiment_color(sentiment: Sentiment) -> RGBColor {
    match sentiment {
        Sentiment::Positive => POSITIVE_COLOR,
        Sentiment::Negative => NEGATIVE_COLOR,
        Sentiment::Neutral => NEUTRAL_COLOR,
        Sentiment::Irrelevant => IRRELEVANT_COLOR,
    }
}

// ── Images ──────────────────────────────────────────────────────────────────

/// Render the brand dashboard. `metrics` must be ordered by mentions, descending.
pub fn render_dashboard(
    path: &Path,
    distribution: &SentimentDistribution,
    metrics: &[BrandMetric],
    config: &VisualizationConfig,
) -> Result<()> {
    let root = BitMapBackend::new(path, config.dashboard_size).into_drawing_area();
    root.fill(&WHITE)?;
    let root = titled(&root, "Twitter Brand Sentiment Analysis Dashboard", 36)?;
    let panels = root.split_evenly((2, 2));

    let slices: Vec<(String, f64, RGBColor)> = distribution
        .shares
        .iter()
        .map(|s| {
            (
                s.sentiment.to_string(),
                s.count as f64,
                sentiment_color(s.sentiment),
            )
        })
        .collect();
    draw_pie(&panels[0], "Overall Sentiment Distribution", &slices)?;

    let top: Vec<&BrandMetric> = metrics.iter().take(config.dashboard_brands).collect();
    draw_mentions(
        &panels[1],
        &format!("Top {} Most Mentioned Brands", config.dashboard_brands),
        &top,
    )?;
    draw_breakdown(
        &panels[2],
        &format!("Sentiment Breakdown by Brand (Top {})", config.dashboard_brands),
        &top,
    )?;

    let mut scored: Vec<&BrandMetric> = metrics.iter().take(config.score_brands).collect();
    scored.sort_by(|a, b| a.sentiment_score.total_cmp(&b.sentiment_score));
    draw_scores(
        &panels[3],
        "Brand Sentiment Score (Positive% - Negative%)",
        &scored,
    )?;

    root.present()?;
    info!(path = %path.display(), "saved dashboard");
    Ok(())
}

/// Render the industry chart.
pub fn render_industry_chart(
    path: &Path,
    breakdown: &IndustryBreakdown,
    config: &VisualizationConfig,
) -> Result<()> {
    let root = BitMapBackend::new(path, config.industry_size).into_drawing_area();
    root.fill(&WHITE)?;
    let root = titled(&root, "Industry Sentiment Analysis", 32)?;
    let halves = root.split_evenly((1, 2));

    let slices: Vec<(String, f64, RGBColor)> = breakdown
        .industries
        .iter()
        .enumerate()
        .map(|(i, s)| {
            (
                s.industry.to_string(),
                s.mentions as f64,
                INDUSTRY_PALETTE[i % INDUSTRY_PALETTE.len()],
            )
        })
        .collect();
    draw_pie(&halves[0], "Tweet Distribution by Industry", &slices)?;
    draw_industry_sentiment(&halves[1], breakdown)?;

    root.present()?;
    info!(path = %path.display(), "saved industry chart");
    Ok(())
}

// ── Panels ──────────────────────────────────────────────────────────────────

/// Title strip on top of `area`; returns the remaining area below it.
fn titled<'a>(area: &Area<'a>, title: &str, size: u32) -> Result<Area<'a>> {
    if DRAW_TEXT {
        Ok(area.titled(title, (FONT, size))?)
    } else {
        Ok(area.margin(size + size / 2, 0, 0, 0))
    }
}

/// Pie chart drawn as filled polygons, first slice starting at twelve o'clock
/// and running counter-clockwise.
fn draw_pie(area: &Area, title: &str, slices: &[(String, f64, RGBColor)]) -> Result<()> {
    let area = titled(area, title, 24)?;
    let total: f64 = slices.iter().map(|(_, v, _)| v).sum();
    if total <= 0.0 {
        return Ok(());
    }

    let (w, h) = area.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let radius = f64::from(w.min(h)) * 0.36;
    let label_style = TextStyle::from((FONT, 16).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));

    let mut start = -PI / 2.0;
    for (label, value, color) in slices {
        let sweep = value / total * 2.0 * PI;
        let steps = (sweep / (2.0 * PI) * 180.0).ceil().max(2.0) as usize;

        let mut points = Vec::with_capacity(steps + 2);
        points.push(center);
        for k in 0..=steps {
            let angle = start - sweep * k as f64 / steps as f64;
            points.push(polar(center, radius, angle));
        }
        area.draw(&Polygon::new(points, color.filled()))?;

        if DRAW_TEXT {
            let mid = start - sweep / 2.0;
            area.draw_text(
                &format!("{label} ({:.1}%)", value / total * 100.0),
                &label_style,
                polar(center, radius * 1.2, mid),
            )?;
        }
        start -= sweep;
    }
    Ok(())
}

fn polar(center: (i32, i32), radius: f64, angle: f64) -> (i32, i32) {
    (
        center.0 + (radius * angle.cos()).round() as i32,
        center.1 + (radius * angle.sin()).round() as i32,
    )
}

/// Label for a row of a horizontal bar chart. Row 0 of `names` is drawn on top.
fn row_label(names: &[&str], value: &SegmentValue<i32>) -> String {
    match value {
        SegmentValue::CenterOf(pos) => {
            let row = names.len() as i32 - 1 - pos;
            usize::try_from(row)
                .ok()
                .and_then(|r| names.get(r))
                .map(|n| n.to_string())
                .unwrap_or_default()
        }
        _ => String::new(),
    }
}

fn bar(
    from: f64,
    to: f64,
    row: i32,
    rows: usize,
    color: RGBColor,
) -> Rectangle<(f64, SegmentValue<i32>)> {
    let pos = rows as i32 - 1 - row;
    let mut rect = Rectangle::new(
        [
            (from, SegmentValue::Exact(pos)),
            (to, SegmentValue::Exact(pos + 1)),
        ],
        color.filled(),
    );
    rect.set_margin(4, 4, 0, 0);
    rect
}

fn draw_mentions(area: &Area, title: &str, metrics: &[&BrandMetric]) -> Result<()> {
    if metrics.is_empty() {
        titled(area, title, 24)?;
        return Ok(());
    }
    let rows = metrics.len();
    let names: Vec<&str> = metrics.iter().map(|m| m.brand.as_str()).collect();
    let max = metrics.iter().map(|m| m.total_mentions).max().unwrap_or(0) as f64;
    let label_for = |v: &SegmentValue<i32>| row_label(&names, v);

    let mut builder = ChartBuilder::on(area);
    builder.margin(10).x_label_area_size(40).y_label_area_size(140);
    if DRAW_TEXT {
        builder.caption(title, (FONT, 24));
    }
    let mut chart = builder.build_cartesian_2d(0f64..(max * 1.15).max(1.0), (0..rows as i32).into_segmented())?;

    if DRAW_TEXT {
        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(rows)
            .y_label_formatter(&label_for)
            .x_desc("Total Mentions")
            .draw()?;
    }

    chart.draw_series(
        metrics
            .iter()
            .enumerate()
            .map(|(i, m)| bar(0.0, m.total_mentions as f64, i as i32, rows, MENTION_COLOR)),
    )?;
    if !DRAW_TEXT {
        return Ok(());
    }
    chart.draw_series(metrics.iter().enumerate().map(|(i, m)| {
        Text::new(
            format!(" {}", m.total_mentions),
            (
                m.total_mentions as f64,
                SegmentValue::CenterOf(rows as i32 - 1 - i as i32),
            ),
            (FONT, 14),
        )
    }))?;
    Ok(())
}

fn draw_breakdown(area: &Area, title: &str, metrics: &[&BrandMetric]) -> Result<()> {
    const STACK: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    if metrics.is_empty() {
        titled(area, title, 24)?;
        return Ok(());
    }
    let rows = metrics.len();
    let names: Vec<&str> = metrics.iter().map(|m| m.brand.as_str()).collect();
    let widest = metrics
        .iter()
        .map(|m| STACK.iter().map(|s| m.count(*s)).sum::<u64>())
        .max()
        .unwrap_or(0) as f64;
    let label_for = |v: &SegmentValue<i32>| row_label(&names, v);

    let mut builder = ChartBuilder::on(area);
    builder.margin(10).x_label_area_size(40).y_label_area_size(140);
    if DRAW_TEXT {
        builder.caption(title, (FONT, 24));
    }
    let mut chart = builder.build_cartesian_2d(0f64..(widest * 1.05).max(1.0), (0..rows as i32).into_segmented())?;

    if DRAW_TEXT {
        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(rows)
            .y_label_formatter(&label_for)
            .x_desc("Number of Tweets")
            .draw()?;
    }

    for (j, sentiment) in STACK.iter().enumerate() {
        let color = sentiment_color(*sentiment);
        chart
            .draw_series(metrics.iter().enumerate().map(|(i, m)| {
                let offset: u64 = STACK[..j].iter().map(|s| m.count(*s)).sum();
                let to = offset + m.count(*sentiment);
                bar(offset as f64, to as f64, i as i32, rows, color)
            }))?
            .label(sentiment.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    if DRAW_TEXT {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }
    Ok(())
}

/// Sentiment score bars, `metrics` ordered lowest score first (drawn on top).
fn draw_scores(area: &Area, title: &str, metrics: &[&BrandMetric]) -> Result<()> {
    if metrics.is_empty() {
        titled(area, title, 24)?;
        return Ok(());
    }
    let rows = metrics.len();
    let names: Vec<&str> = metrics.iter().map(|m| m.brand.as_str()).collect();
    let lo = metrics
        .iter()
        .map(|m| m.sentiment_score)
        .fold(0.0f64, f64::min);
    let hi = metrics
        .iter()
        .map(|m| m.sentiment_score)
        .fold(0.0f64, f64::max);
    let label_for = |v: &SegmentValue<i32>| row_label(&names, v);

    let mut builder = ChartBuilder::on(area);
    builder.margin(10).x_label_area_size(40).y_label_area_size(140);
    if DRAW_TEXT {
        builder.caption(title, (FONT, 24));
    }
    let mut chart = builder.build_cartesian_2d((lo - 5.0)..(hi + 5.0), (0..rows as i32).into_segmented())?;

    if DRAW_TEXT {
        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(rows)
            .y_label_formatter(&label_for)
            .x_desc("Sentiment Score (%)")
            .draw()?;
    }

    chart.draw_series(metrics.iter().enumerate().map(|(i, m)| {
        let color = if m.sentiment_score > 0.0 {
            POSITIVE_COLOR
        } else {
            NEGATIVE_COLOR
        };
        bar(0.0, m.sentiment_score, i as i32, rows, color)
    }))?;

    chart.draw_series(LineSeries::new(
        vec![
            (0.0, SegmentValue::Exact(0)),
            (0.0, SegmentValue::Exact(rows as i32)),
        ],
        BLACK.stroke_width(1),
    ))?;
    Ok(())
}

fn draw_industry_sentiment(area: &Area, breakdown: &IndustryBreakdown) -> Result<()> {
    let title = "Sentiment Distribution by Industry";
    if breakdown.industries.is_empty() {
        titled(area, title, 24)?;
        return Ok(());
    }
    let n = breakdown.industries.len();
    let names: Vec<&str> = breakdown.industries.iter().map(|s| s.industry.as_str()).collect();
    let label_for = |x: &f64| {
        let idx = x.round();
        if (x - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        names
            .get(idx as usize)
            .map(|name| name.to_string())
            .unwrap_or_default()
    };

    let mut builder = ChartBuilder::on(area);
    builder.margin(10).x_label_area_size(50).y_label_area_size(60);
    if DRAW_TEXT {
        builder.caption(title, (FONT, 24));
    }
    let mut chart = builder.build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..100f64)?;

    if DRAW_TEXT {
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&label_for)
            .x_desc("Industry Category")
            .y_desc("Percentage (%)")
            .draw()?;
    }

    let width = 0.8 / Sentiment::ALL.len() as f64;
    for (j, sentiment) in Sentiment::ALL.iter().enumerate() {
        let color = sentiment_color(*sentiment);
        chart
            .draw_series(breakdown.industries.iter().enumerate().map(|(i, stats)| {
                let left = i as f64 - 0.4 + j as f64 * width;
                Rectangle::new(
                    [(left, 0.0), (left + width, stats.sentiment_percent(*sentiment))],
                    color.filled(),
                )
            }))?
            .label(sentiment.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    if DRAW_TEXT {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::SentimentShare;
    use crate::category::{Industry, IndustryStats};

    fn small_config() -> VisualizationConfig {
        VisualizationConfig {
            dashboard_size: (640, 480),
            industry_size: (640, 240),
            dashboard_brands: 10,
            score_brands: 15,
        }
    }

    fn is_png(path: &Path) -> bool {
        std::fs::read(path).unwrap().starts_with(b"\x89PNG")
    }

    #[test]
    fn charts_render_with_labels_and_values() {
        let dir = tempfile::tempdir().unwrap();
        let distribution = SentimentDistribution {
            total: 12,
            shares: vec![
                SentimentShare { sentiment: Sentiment::Negative, count: 7, percent: 58.33 },
                SentimentShare { sentiment: Sentiment::Positive, count: 5, percent: 41.67 },
            ],
        };
        let metrics = vec![
            BrandMetric::from_counts("Verizon", 1, 6, 0, 0),
            BrandMetric::from_counts("Apple", 4, 1, 0, 0),
        ];
        let breakdown = IndustryBreakdown {
            total: 12,
            industries: vec![
                IndustryStats { industry: Industry::Telecom, mentions: 7, counts: [1, 6, 0, 0] },
                IndustryStats { industry: Industry::Technology, mentions: 5, counts: [4, 1, 0, 0] },
            ],
        };

        let dashboard = dir.path().join("dashboard.png");
        let industry = dir.path().join("industry.png");
        render_dashboard(&dashboard, &distribution, &metrics, &small_config()).unwrap();
        render_industry_chart(&industry, &breakdown, &small_config()).unwrap();

        assert!(is_png(&dashboard));
        assert!(is_png(&industry));
    }

    #[test]
    fn empty_inputs_still_produce_images() {
        let dir = tempfile::tempdir().unwrap();
        let distribution = SentimentDistribution { total: 0, shares: vec![] };
        let breakdown = IndustryBreakdown { total: 0, industries: vec![] };

        let dashboard = dir.path().join("dashboard.png");
        let industry = dir.path().join("industry.png");
        render_dashboard(&dashboard, &distribution, &[], &small_config()).unwrap();
        render_industry_chart(&industry, &breakdown, &small_config()).unwrap();

        assert!(is_png(&dashboard));
        assert!(is_png(&industry));
    }
}
