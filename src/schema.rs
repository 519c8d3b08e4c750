/// Column-name constants for brand-pulse tables.
/// Single source of truth for the loader, the aggregations and the CSV writer.

// ── Input record columns ────────────────────────────────────────────────────
pub mod record {
    pub const ID: &str = "id";
    pub const BRAND: &str = "brand";
    pub const SENTIMENT: &str = "sentiment";
    pub const TEXT: &str = "text";

    pub const ALL: [&str; 4] = [ID, BRAND, SENTIMENT, TEXT];
}

// ── Derived columns ─────────────────────────────────────────────────────────
pub mod derived {
    pub const INDUSTRY: &str = "industry";
    pub const COUNT: &str = "count";
}

// ── Sentiment label values ──────────────────────────────────────────────────
pub mod label {
    pub const POSITIVE: &str = "Positive";
    pub const NEGATIVE: &str = "Negative";
    pub const NEUTRAL: &str = "Neutral";
    pub const IRRELEVANT: &str = "Irrelevant";
}

// ── Brand health metrics output columns (in output order) ───────────────────
pub mod metrics {
    pub const BRAND: &str = "Brand";
    pub const TOTAL_MENTIONS: &str = "Total_Mentions";
    pub const POSITIVE: &str = "Positive";
    pub const NEGATIVE: &str = "Negative";
    pub const NEUTRAL: &str = "Neutral";
    pub const IRRELEVANT: &str = "Irrelevant";
    pub const SENTIMENT_SCORE: &str = "Sentiment_Score";
    pub const POSITIVE_RATIO: &str = "Positive_Ratio";
    pub const NEGATIVE_RATIO: &str = "Negative_Ratio";
    pub const BRAND_HEALTH: &str = "Brand_Health";

    pub const ALL: [&str; 10] = [
        BRAND,
        TOTAL_MENTIONS,
        POSITIVE,
        NEGATIVE,
        NEUTRAL,
        IRRELEVANT,
        SENTIMENT_SCORE,
        POSITIVE_RATIO,
        NEGATIVE_RATIO,
        BRAND_HEALTH,
    ];

    /// Python-side constant name for each column, in output order.
    pub const EXPORTS: [(&str, &str); 10] = [
        ("BRAND", BRAND),
        ("TOTAL_MENTIONS", TOTAL_MENTIONS),
        ("POSITIVE", POSITIVE),
        ("NEGATIVE", NEGATIVE),
        ("NEUTRAL", NEUTRAL),
        ("IRRELEVANT", IRRELEVANT),
        ("SENTIMENT_SCORE", SENTIMENT_SCORE),
        ("POSITIVE_RATIO", POSITIVE_RATIO),
        ("NEGATIVE_RATIO", NEGATIVE_RATIO),
        ("BRAND_HEALTH", BRAND_HEALTH),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_metrics_column_is_exported() {
        let columns: Vec<&str> = metrics::EXPORTS.iter().map(|(_, column)| *column).collect();
        assert_eq!(columns, metrics::ALL.to_vec());

        for (name, column) in metrics::EXPORTS {
            assert_eq!(name, column.to_uppercase(), "export name for {column}");
        }
    }
}
