use std::fmt;

use polars::prelude::*;
use tracing::debug;

use crate::dataset::{Dataset, Sentiment};
use crate::error::{AnalysisError, Result};
use crate::schema::{derived, metrics, record};

/// Coarse brand health bucket derived from the sentiment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthLabel {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl HealthLabel {
    /// Thresholds are strict: exactly 20 is `Good`, exactly 0 and exactly -20 are `Fair`.
    pub fn from_score(score: f64) -> Self {
        if score > 20.0 {
            HealthLabel::Excellent
        } else if score > 0.0 {
            HealthLabel::Good
        } else if score < -20.0 {
            HealthLabel::Poor
        } else {
            HealthLabel::Fair
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthLabel::Excellent => "Excellent",
            HealthLabel::Good => "Good",
            HealthLabel::Fair => "Fair",
            HealthLabel::Poor => "Poor",
        }
    }
}

impl fmt::Display for HealthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-brand sentiment counts and the indicators derived from them.
#[derive(Debug, Clone, PartialEq)]
pub struct BrandMetric {
    pub brand: String,
    pub total_mentions: u64,
    pub positive_count: u64,
    pub negative_count: u64,
    pub neutral_count: u64,
    pub irrelevant_count: u64,
    /// Positive share minus negative share, in percent. Not rounded.
    pub sentiment_score: f64,
    pub positive_ratio: f64,
    pub negative_ratio: f64,
    pub health_label: HealthLabel,
}

impl BrandMetric {
    /// Build a metric from raw label counts. The total is the sum of the four
    /// counts; a zero total yields zero score and ratios.
    pub fn from_counts(
        brand: impl Into<String>,
        positive: u64,
        negative: u64,
        neutral: u64,
        irrelevant: u64,
    ) -> Self {
        let total = positive + negative + neutral + irrelevant;
        let sentiment_score = percent(positive as f64 - negative as f64, total);

        Self {
            brand: brand.into(),
            total_mentions: total,
            positive_count: positive,
            negative_count: negative,
            neutral_count: neutral,
            irrelevant_count: irrelevant,
            sentiment_score,
            positive_ratio: percent(positive as f64, total),
            negative_ratio: percent(negative as f64, total),
            health_label: HealthLabel::from_score(sentiment_score),
        }
    }

    pub fn count(&self, sentiment: Sentiment) -> u64 {
        match sentiment {
            Sentiment::Positive => self.positive_count,
            Sentiment::Negative => self.negative_count,
            Sentiment::Neutral => self.neutral_count,
            Sentiment::Irrelevant => self.irrelevant_count,
        }
    }
}

// Multiply before dividing so splits that land on a threshold give the exact
// threshold value (2 of 10 is 20.0, not 20.000000000000004).
fn percent(part: f64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part * 100.0 / total as f64
    }
}

// Halves go to the even neighbour: 0.125 -> 0.12, 0.375 -> 0.38.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Share of one sentiment label over the whole table.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentShare {
    pub sentiment: Sentiment,
    pub count: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentDistribution {
    pub total: u64,
    /// Ordered by count, descending. Labels with no records are absent.
    pub shares: Vec<SentimentShare>,
}

impl SentimentDistribution {
    pub fn count(&self, sentiment: Sentiment) -> u64 {
        self.shares
            .iter()
            .find(|s| s.sentiment == sentiment)
            .map(|s| s.count)
            .unwrap_or(0)
    }
}

/// Count records per sentiment label over the full table.
pub fn sentiment_distribution(dataset: &Dataset) -> Result<SentimentDistribution> {
    let grouped = dataset
        .frame()
        .clone()
        .lazy()
        .group_by([col(record::SENTIMENT)])
        .agg([len().alias(derived::COUNT)])
        .collect()?;

    let labels = grouped.column(record::SENTIMENT)?.str()?;
    let counts = u64_values(&grouped, derived::COUNT)?;

    let mut pairs = Vec::with_capacity(counts.len());
    for (i, count) in counts.into_iter().enumerate() {
        let sentiment: Sentiment = labels
            .get(i)
            .ok_or_else(|| AnalysisError::InvalidData("null sentiment group".into()))?
            .parse()?;
        pairs.push((sentiment, count));
    }
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let total: u64 = pairs.iter().map(|(_, c)| c).sum();
    let shares = pairs
        .into_iter()
        .map(|(sentiment, count)| SentimentShare {
            sentiment,
            count,
            percent: percent(count as f64, total),
        })
        .collect();

    Ok(SentimentDistribution { total, shares })
}

/// The `n` most mentioned brands with their mention counts.
/// Ties are broken by brand name.
pub fn top_brands(dataset: &Dataset, n: usize) -> Result<Vec<(String, u64)>> {
    let grouped = dataset
        .frame()
        .clone()
        .lazy()
        .group_by([col(record::BRAND)])
        .agg([len().alias(derived::COUNT)])
        .collect()?;

    let brands = grouped.column(record::BRAND)?.str()?;
    let counts = u64_values(&grouped, derived::COUNT)?;

    let mut ranked: Vec<(String, u64)> = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| (brands.get(i).unwrap_or_default().to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(n);
    Ok(ranked)
}

/// Compute one [`BrandMetric`] per distinct brand.
///
/// Records are partitioned by brand, then counted per sentiment label.
/// The result is ordered by mentions, descending, ties broken by brand name.
pub fn brand_metrics(dataset: &Dataset) -> Result<Vec<BrandMetric>> {
    let label_count = |sentiment: Sentiment, alias: &str| {
        col(record::SENTIMENT)
            .eq(lit(sentiment.as_str()))
            .cast(DataType::UInt64)
            .sum()
            .alias(alias)
    };

    let grouped = dataset
        .frame()
        .clone()
        .lazy()
        .group_by([col(record::BRAND)])
        .agg([
            label_count(Sentiment::Positive, metrics::POSITIVE),
            label_count(Sentiment::Negative, metrics::NEGATIVE),
            label_count(Sentiment::Neutral, metrics::NEUTRAL),
            label_count(Sentiment::Irrelevant, metrics::IRRELEVANT),
        ])
        .collect()?;

    let brands = grouped.column(record::BRAND)?.str()?;
    let positive = u64_values(&grouped, metrics::POSITIVE)?;
    let negative = u64_values(&grouped, metrics::NEGATIVE)?;
    let neutral = u64_values(&grouped, metrics::NEUTRAL)?;
    let irrelevant = u64_values(&grouped, metrics::IRRELEVANT)?;

    let mut result = Vec::with_capacity(grouped.height());
    for i in 0..grouped.height() {
        let brand = brands
            .get(i)
            .ok_or_else(|| AnalysisError::InvalidData("null brand group".into()))?;
        result.push(BrandMetric::from_counts(
            brand,
            positive[i],
            negative[i],
            neutral[i],
            irrelevant[i],
        ));
    }

    result.sort_by(|a, b| {
        b.total_mentions
            .cmp(&a.total_mentions)
            .then_with(|| a.brand.cmp(&b.brand))
    });

    debug!(brands = result.len(), "computed brand metrics");
    Ok(result)
}

/// Highest sentiment scores first. Equal scores keep their input order.
pub fn top_by_score(metrics: &[BrandMetric], n: usize) -> Vec<&BrandMetric> {
    let mut ranked: Vec<&BrandMetric> = metrics.iter().collect();
    ranked.sort_by(|a, b| b.sentiment_score.total_cmp(&a.sentiment_score));
    ranked.truncate(n);
    ranked
}

/// Lowest sentiment scores first. Equal scores keep their input order.
pub fn bottom_by_score(metrics: &[BrandMetric], n: usize) -> Vec<&BrandMetric> {
    let mut ranked: Vec<&BrandMetric> = metrics.iter().collect();
    ranked.sort_by(|a, b| a.sentiment_score.total_cmp(&b.sentiment_score));
    ranked.truncate(n);
    ranked
}

pub fn top_by_mentions(metrics: &[BrandMetric], n: usize) -> Vec<&BrandMetric> {
    let mut ranked: Vec<&BrandMetric> = metrics.iter().collect();
    ranked.sort_by(|a, b| b.total_mentions.cmp(&a.total_mentions));
    ranked.truncate(n);
    ranked
}

/// Tabular form of the metrics, one row per brand, columns in output order.
/// Float columns are rounded to two decimals.
pub fn metrics_frame(metrics: &[BrandMetric]) -> Result<DataFrame> {
    let brands: Vec<&str> = metrics.iter().map(|m| m.brand.as_str()).collect();
    let counts = |f: fn(&BrandMetric) -> u64| metrics.iter().map(f).collect::<Vec<u64>>();
    let floats = |f: fn(&BrandMetric) -> f64| metrics.iter().map(|m| round2(f(m))).collect::<Vec<f64>>();
    let health: Vec<&str> = metrics.iter().map(|m| m.health_label.as_str()).collect();

    let df = DataFrame::new(vec![
        Column::new(metrics::BRAND.into(), brands),
        Column::new(metrics::TOTAL_MENTIONS.into(), counts(|m| m.total_mentions)),
        Column::new(metrics::POSITIVE.into(), counts(|m| m.positive_count)),
        Column::new(metrics::NEGATIVE.into(), counts(|m| m.negative_count)),
        Column::new(metrics::NEUTRAL.into(), counts(|m| m.neutral_count)),
        Column::new(metrics::IRRELEVANT.into(), counts(|m| m.irrelevant_count)),
        Column::new(metrics::SENTIMENT_SCORE.into(), floats(|m| m.sentiment_score)),
        Column::new(metrics::POSITIVE_RATIO.into(), floats(|m| m.positive_ratio)),
        Column::new(metrics::NEGATIVE_RATIO.into(), floats(|m| m.negative_ratio)),
        Column::new(metrics::BRAND_HEALTH.into(), health),
    ])?;
    Ok(df)
}

fn u64_values(df: &DataFrame, name: &str) -> Result<Vec<u64>> {
    let column = df.column(name)?.cast(&DataType::UInt64)?;
    let values = column.u64()?.into_iter().map(|v| v.unwrap_or(0)).collect();
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Record;

    #[test]
    fn health_thresholds_are_strict() {
        assert_eq!(HealthLabel::from_score(20.01), HealthLabel::Excellent);
        assert_eq!(HealthLabel::from_score(20.0), HealthLabel::Good);
        assert_eq!(HealthLabel::from_score(0.01), HealthLabel::Good);
        assert_eq!(HealthLabel::from_score(0.0), HealthLabel::Fair);
        assert_eq!(HealthLabel::from_score(-20.0), HealthLabel::Fair);
        assert_eq!(HealthLabel::from_score(-20.01), HealthLabel::Poor);
    }

    #[test]
    fn exact_threshold_splits_land_on_boundary() {
        // 3 positive, 1 negative out of 10: exactly 20.
        let m = BrandMetric::from_counts("Apple", 3, 1, 4, 2);
        assert_eq!(m.sentiment_score, 20.0);
        assert_eq!(m.health_label, HealthLabel::Good);

        let m = BrandMetric::from_counts("ATT", 1, 3, 4, 2);
        assert_eq!(m.sentiment_score, -20.0);
        assert_eq!(m.health_label, HealthLabel::Fair);
    }

    #[test]
    fn zero_total_is_guarded() {
        let m = BrandMetric::from_counts("Nobody", 0, 0, 0, 0);
        assert_eq!(m.total_mentions, 0);
        assert_eq!(m.sentiment_score, 0.0);
        assert_eq!(m.positive_ratio, 0.0);
        assert_eq!(m.negative_ratio, 0.0);
        assert_eq!(m.health_label, HealthLabel::Fair);
    }

    #[test]
    fn metrics_are_ordered_by_mentions_then_name() {
        let dataset = Dataset::from_records(&[
            Record::new(1, "Zynga", Sentiment::Positive, "a"),
            Record::new(2, "Amazon", Sentiment::Negative, "b"),
            Record::new(3, "Google", Sentiment::Neutral, "c"),
            Record::new(4, "Google", Sentiment::Irrelevant, "d"),
        ])
        .unwrap();

        let result = brand_metrics(&dataset).unwrap();
        let order: Vec<&str> = result.iter().map(|m| m.brand.as_str()).collect();
        assert_eq!(order, vec!["Google", "Amazon", "Zynga"]);
        assert_eq!(result[0].neutral_count, 1);
        assert_eq!(result[0].irrelevant_count, 1);
    }

    #[test]
    fn distribution_is_sorted_by_count() {
        let dataset = Dataset::from_records(&[
            Record::new(1, "FIFA", Sentiment::Negative, "a"),
            Record::new(2, "FIFA", Sentiment::Negative, "b"),
            Record::new(3, "FIFA", Sentiment::Positive, "c"),
            Record::new(4, "PUBG", Sentiment::Neutral, "d"),
        ])
        .unwrap();

        let dist = sentiment_distribution(&dataset).unwrap();
        assert_eq!(dist.total, 4);
        assert_eq!(dist.shares[0].sentiment, Sentiment::Negative);
        assert_eq!(dist.shares[0].percent, 50.0);
        // Positive and Neutral tie at one record; enum order decides.
        assert_eq!(dist.shares[1].sentiment, Sentiment::Positive);
        assert_eq!(dist.shares[2].sentiment, Sentiment::Neutral);
        assert_eq!(dist.count(Sentiment::Irrelevant), 0);
    }

    #[test]
    fn insight_rankings() {
        let metrics = vec![
            BrandMetric::from_counts("A", 5, 1, 0, 0),
            BrandMetric::from_counts("B", 0, 3, 0, 0),
            BrandMetric::from_counts("C", 1, 1, 8, 0),
        ];

        let top: Vec<&str> = top_by_score(&metrics, 2).iter().map(|m| m.brand.as_str()).collect();
        assert_eq!(top, vec!["A", "C"]);

        let bottom: Vec<&str> = bottom_by_score(&metrics, 1).iter().map(|m| m.brand.as_str()).collect();
        assert_eq!(bottom, vec!["B"]);

        let busiest: Vec<&str> = top_by_mentions(&metrics, 3).iter().map(|m| m.brand.as_str()).collect();
        assert_eq!(busiest, vec!["C", "A", "B"]);
    }

    #[test]
    fn frame_rounds_floats_and_keeps_column_order() {
        let df = metrics_frame(&[BrandMetric::from_counts("Dota2", 1, 0, 2, 0)]).unwrap();
        let names: Vec<&str> = df.get_column_names_str();
        assert_eq!(names, metrics::ALL.to_vec());

        let score = df.column(metrics::SENTIMENT_SCORE).unwrap().f64().unwrap().get(0);
        assert_eq!(score, Some(33.33));
    }

    #[test]
    fn frame_rounds_halves_to_even() {
        let df = metrics_frame(&[BrandMetric::from_counts("Overwatch", 3, 6, 2391, 0)]).unwrap();
        let ratio = |name: &str| df.column(name).unwrap().f64().unwrap().get(0);

        assert_eq!(ratio(metrics::POSITIVE_RATIO), Some(0.12));
        assert_eq!(ratio(metrics::NEGATIVE_RATIO), Some(0.25));
        assert_eq!(ratio(metrics::SENTIMENT_SCORE), Some(-0.12));
        assert_eq!(round2(0.375), 0.38);
    }
}
