use std::collections::HashMap;
use std::fmt;

use polars::prelude::*;
use tracing::debug;

use crate::dataset::{Dataset, Sentiment};
use crate::error::{AnalysisError, Result};
use crate::schema::{derived, record};

const TECHNOLOGY_BRANDS: [&str; 5] = ["Microsoft", "Google", "Apple", "Amazon", "Nvidia"];

const GAMING_BRANDS: [&str; 13] = [
    "CallOfDuty",
    "FIFA",
    "CS-GO",
    "Fortnite",
    "ApexLegends",
    "PUBG",
    "NBA2K",
    "Overwatch",
    "GTA",
    "RDR",
    "Hearthstone",
    "Dota2",
    "LeagueOfLegends",
];

const TELECOM_BRANDS: [&str; 3] = ["Verizon", "Comcast", "ATT"];

const SOCIAL_MEDIA_BRANDS: [&str; 3] = ["Facebook", "Twitter", "Instagram"];

/// Industry bucket a brand belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Industry {
    Technology,
    Gaming,
    Telecom,
    SocialMedia,
    Other,
}

impl Industry {
    pub const ALL: [Industry; 5] = [
        Industry::Technology,
        Industry::Gaming,
        Industry::Telecom,
        Industry::SocialMedia,
        Industry::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::Technology => "Technology",
            Industry::Gaming => "Gaming",
            Industry::Telecom => "Telecom",
            Industry::SocialMedia => "Social Media",
            Industry::Other => "Other",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.as_str() == label)
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a brand to its industry. Matching is exact and case-sensitive;
/// anything not in the lookup tables is `Other`.
pub fn categorize_brand(brand: &str) -> Industry {
    if TECHNOLOGY_BRANDS.contains(&brand) {
        Industry::Technology
    } else if GAMING_BRANDS.contains(&brand) {
        Industry::Gaming
    } else if TELECOM_BRANDS.contains(&brand) {
        Industry::Telecom
    } else if SOCIAL_MEDIA_BRANDS.contains(&brand) {
        Industry::SocialMedia
    } else {
        Industry::Other
    }
}

/// Mentions and sentiment split of one industry.
#[derive(Debug, Clone, PartialEq)]
pub struct IndustryStats {
    pub industry: Industry,
    pub mentions: u64,
    /// Record counts indexed like [`Sentiment::ALL`].
    pub counts: [u64; 4],
}

impl IndustryStats {
    /// Share of this industry's records carrying `sentiment`, in percent.
    pub fn sentiment_percent(&self, sentiment: Sentiment) -> f64 {
        if self.mentions == 0 {
            return 0.0;
        }
        self.counts[sentiment_index(sentiment)] as f64 * 100.0 / self.mentions as f64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndustryBreakdown {
    pub total: u64,
    /// Industries with at least one record, by mentions descending.
    pub industries: Vec<IndustryStats>,
}

impl IndustryBreakdown {
    pub fn mention_percent(&self, stats: &IndustryStats) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            stats.mentions as f64 * 100.0 / self.total as f64
        }
    }

    pub fn get(&self, industry: Industry) -> Option<&IndustryStats> {
        self.industries.iter().find(|s| s.industry == industry)
    }
}

/// Tag every record with its industry and cross-tabulate industry × sentiment.
pub fn industry_breakdown(dataset: &Dataset) -> Result<IndustryBreakdown> {
    let brands = dataset.frame().column(record::BRAND)?.str()?;
    let industries: Vec<&str> = brands
        .into_iter()
        .map(|b| categorize_brand(b.unwrap_or_default()).as_str())
        .collect();

    let mut tagged = dataset.frame().select([record::BRAND, record::SENTIMENT])?;
    tagged.with_column(Column::new(derived::INDUSTRY.into(), industries))?;

    let grouped = tagged
        .lazy()
        .group_by([col(derived::INDUSTRY), col(record::SENTIMENT)])
        .agg([len().alias(derived::COUNT)])
        .collect()?;

    let industry_col = grouped.column(derived::INDUSTRY)?.str()?;
    let sentiment_col = grouped.column(record::SENTIMENT)?.str()?;
    let counts = grouped.column(derived::COUNT)?.cast(&DataType::UInt64)?;
    let counts = counts.u64()?;

    let mut table: HashMap<Industry, [u64; 4]> = HashMap::new();
    for i in 0..grouped.height() {
        let industry = industry_col
            .get(i)
            .and_then(Industry::from_label)
            .ok_or_else(|| AnalysisError::InvalidData("unknown industry group".into()))?;
        let sentiment: Sentiment = sentiment_col
            .get(i)
            .ok_or_else(|| AnalysisError::InvalidData("null sentiment group".into()))?
            .parse()?;
        table.entry(industry).or_insert([0; 4])[sentiment_index(sentiment)] +=
            counts.get(i).unwrap_or(0);
    }

    let mut industries: Vec<IndustryStats> = table
        .into_iter()
        .map(|(industry, counts)| IndustryStats {
            industry,
            mentions: counts.iter().sum(),
            counts,
        })
        .collect();
    industries.sort_by(|a, b| {
        b.mentions
            .cmp(&a.mentions)
            .then(a.industry.cmp(&b.industry))
    });

    let total = industries.iter().map(|s| s.mentions).sum();
    debug!(industries = industries.len(), "computed industry breakdown");
    Ok(IndustryBreakdown { total, industries })
}

fn sentiment_index(sentiment: Sentiment) -> usize {
    Sentiment::ALL
        .iter()
        .position(|s| *s == sentiment)
        .unwrap_or_default()
}
