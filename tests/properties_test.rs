use std::collections::HashMap;

use brand_pulse::aggregation::brand_metrics;
use brand_pulse::{categorize_brand, BrandMetric, Dataset, HealthLabel, Industry, Record, Sentiment};
use proptest::prelude::*;

const BRANDS: [&str; 6] = ["Nvidia", "FIFA", "Comcast", "Twitter", "Borderlands", "Xbox"];

fn dataset_from(picks: &[(usize, usize)]) -> Dataset {
    let records: Vec<Record> = picks
        .iter()
        .enumerate()
        .map(|(i, (b, s))| Record::new(i as i64, BRANDS[*b], Sentiment::ALL[*s], "post"))
        .collect();
    Dataset::from_records(&records).unwrap()
}

proptest! {
    #[test]
    fn label_counts_sum_to_mentions(picks in prop::collection::vec((0usize..6, 0usize..4), 1..200)) {
        let metrics = brand_metrics(&dataset_from(&picks)).unwrap();
        for m in &metrics {
            prop_assert_eq!(
                m.positive_count + m.negative_count + m.neutral_count + m.irrelevant_count,
                m.total_mentions
            );
        }
    }

    #[test]
    fn mentions_match_record_counts(picks in prop::collection::vec((0usize..6, 0usize..4), 1..200)) {
        let mut expected: HashMap<&str, u64> = HashMap::new();
        for (b, _) in &picks {
            *expected.entry(BRANDS[*b]).or_default() += 1;
        }

        let metrics = brand_metrics(&dataset_from(&picks)).unwrap();
        prop_assert_eq!(metrics.len(), expected.len());
        for m in &metrics {
            prop_assert_eq!(Some(&m.total_mentions), expected.get(m.brand.as_str()));
        }
        for pair in metrics.windows(2) {
            prop_assert!(pair[0].total_mentions >= pair[1].total_mentions);
        }
    }

    #[test]
    fn score_stays_in_range(pos in 0u64..10_000, neg in 0u64..10_000, neu in 0u64..10_000, irr in 0u64..10_000) {
        let m = BrandMetric::from_counts("Any", pos, neg, neu, irr);
        prop_assert!((-100.0..=100.0).contains(&m.sentiment_score));
        prop_assert!((0.0..=100.0).contains(&m.positive_ratio));
        prop_assert!((0.0..=100.0).contains(&m.negative_ratio));
        prop_assert_eq!(m.health_label, HealthLabel::from_score(m.sentiment_score));
    }

    #[test]
    fn every_brand_has_exactly_one_industry(brand in ".{0,24}") {
        let industry = categorize_brand(&brand);
        prop_assert_eq!(Industry::ALL.iter().filter(|i| **i == industry).count(), 1);
        prop_assert_eq!(categorize_brand(&brand), industry);
    }

    #[test]
    fn lowercase_names_fall_through_to_other(brand in "[a-z]{1,16}") {
        prop_assert_eq!(categorize_brand(&brand), Industry::Other);
    }
}
