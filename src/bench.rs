// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

// Set-overlap benchmarking: compares predicted value sets against reference value sets, key by
// key, and aggregates true/false positives into precision, recall and F-score.

use std::collections::BTreeSet;
use std::fmt::Debug;

use log::{debug, warn};
use serde::Serialize;
use statrs::distribution::{Binomial, DiscreteCDF};

use crate::errors::{Result, SeqBenchError};
use crate::sets::SetMap;

/// A compared key whose predicted set differs from its reference set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorDetail<K, V> {
    pub id: K,
    pub expected: BTreeSet<V>,
    pub predicted: BTreeSet<V>,
}

/// Per-key classification counters. A key can fall into several of these at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KeyCounts {
    /// Predicted set identical to the reference set.
    pub complete_match: usize,
    /// At least one predicted value is in the reference set.
    pub at_least_one_hit: usize,
    /// No predicted value is in the reference set.
    pub complete_mismatch: usize,
    /// More predicted values than reference values.
    pub too_many_predictions: usize,
    /// Fewer predicted values than reference values.
    pub not_enough_predictions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkResult<K, V> {
    pub tp: usize,
    #[serde(rename = "fn")]
    pub fn_: usize,
    pub fp: usize,
    pub precision: f64,
    pub recall: f64,
    pub f_score: f64,
    pub errors: Vec<ErrorDetail<K, V>>,
    /// Number of keys present in both inputs.
    pub obj_count: usize,
    /// Number of predicted values over the compared keys.
    pub pred_count: usize,
    pub counts: KeyCounts,
}

/// Compares `predicted` against `reference`, restricted to keys present in both. Predicted
/// keys missing from the reference are skipped.
///
/// Returns `None` when the two maps share no key at all; this is distinct from a result whose
/// metrics are all zero.
pub fn benchmark<K, V>(
    predicted: &SetMap<K, V>,
    reference: &SetMap<K, V>,
) -> Option<BenchmarkResult<K, V>>
where
    K: Ord + Clone + Debug,
    V: Ord + Clone,
{
    let (mut tp, mut fn_, mut fp) = (0, 0, 0);
    let mut obj_count = 0;
    let mut pred_count = 0;
    let mut counts = KeyCounts::default();
    let mut errors = Vec::new();

    for (key, pred_set) in predicted {
        let Some(ref_set) = reference.get(key) else {
            debug!("{:?} not in reference, skipping", key);
            continue;
        };
        obj_count += 1;
        pred_count += pred_set.len();

        let hits = pred_set.intersection(ref_set).count();
        let missed = ref_set.difference(pred_set).count();
        let wrong = pred_set.difference(ref_set).count();
        tp += hits;
        fn_ += missed;
        fp += wrong;

        if hits > 0 {
            counts.at_least_one_hit += 1;
        } else {
            counts.complete_mismatch += 1;
        }
        if pred_set.len() > ref_set.len() {
            counts.too_many_predictions += 1;
        } else if pred_set.len() < ref_set.len() {
            counts.not_enough_predictions += 1;
        }
        if hits == pred_set.len() && hits == ref_set.len() {
            counts.complete_match += 1;
        } else {
            errors.push(ErrorDetail {
                id: key.clone(),
                expected: ref_set.clone(),
                predicted: pred_set.clone(),
            });
        }
    }

    if obj_count == 0 {
        debug!("no keys in common between prediction and reference");
        return None;
    }

    let precision = if tp + fp > 0 {
        tp as f64 / (tp + fp) as f64
    } else {
        warn!("Cannot calculate precision because TP+FP = 0");
        0.0
    };
    let recall = if tp + fn_ > 0 {
        tp as f64 / (tp + fn_) as f64
    } else {
        warn!("Cannot calculate recall because TP+FN = 0");
        0.0
    };
    // F is 0 as soon as either component is 0.
    let f_score = if precision > 0.0 && recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        warn!("Cannot calculate F because precision or recall is 0");
        0.0
    };

    Some(BenchmarkResult {
        tp,
        fn_,
        fp,
        precision,
        recall,
        f_score,
        errors,
        obj_count,
        pred_count,
        counts,
    })
}

/// Enrichment of `foreground` among `genes`: `-log10(P(X <= tp))` with `tp` the number of genes
/// in the foreground and `X ~ Binomial(genes.len(), background_prob)`.
pub fn binom_score<T: Ord>(
    background: &BTreeSet<T>,
    foreground: &BTreeSet<T>,
    genes: &BTreeSet<T>,
    background_prob: f64,
) -> Result<f64> {
    let tp = genes.intersection(foreground).count();
    debug!(
        "binomial score: {} of {} genes in foreground, background of {}",
        tp,
        genes.len(),
        background.len()
    );
    let dist = Binomial::new(background_prob, genes.len() as u64)
        .map_err(|e| SeqBenchError::Format(format!("binomial distribution: {}", e)))?;
    Ok(-dist.cdf(tp as u64).log10())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn set_map(entries: Vec<(&str, Vec<u32>)>) -> SetMap<String, u32> {
        entries
            .into_iter()
            .map(|(k, vs)| (k.to_string(), vs.into_iter().collect()))
            .collect()
    }

    #[test]
    fn test_benchmark_overprediction() {
        let pred = set_map(vec![("a", vec![1, 2, 3]), ("b", vec![3, 4, 5])]);
        let refs = set_map(vec![("a", vec![1]), ("b", vec![4])]);
        let res = benchmark(&pred, &refs).expect("comparable keys");
        assert_eq!((res.tp, res.fn_, res.fp), (2, 0, 4));
        assert_relative_eq!(res.precision, 1.0 / 3.0);
        assert_relative_eq!(res.recall, 1.0);
        assert_relative_eq!(res.f_score, 0.5, epsilon = 1e-12);
        assert_eq!(res.obj_count, 2);
        assert_eq!(res.pred_count, 6);
        assert_eq!(
            res.errors,
            vec![
                ErrorDetail {
                    id: String::from("a"),
                    expected: [1].into_iter().collect(),
                    predicted: [1, 2, 3].into_iter().collect(),
                },
                ErrorDetail {
                    id: String::from("b"),
                    expected: [4].into_iter().collect(),
                    predicted: [3, 4, 5].into_iter().collect(),
                },
            ]
        );
        assert_eq!(
            res.counts,
            KeyCounts {
                complete_match: 0,
                at_least_one_hit: 2,
                complete_mismatch: 0,
                too_many_predictions: 2,
                not_enough_predictions: 0,
            }
        );
    }

    #[test]
    fn test_benchmark_no_shared_keys() {
        let pred = set_map(vec![("a", vec![1])]);
        let refs = set_map(vec![("b", vec![1])]);
        assert!(benchmark(&pred, &refs).is_none());
        assert!(benchmark(&SetMap::<String, u32>::new(), &refs).is_none());
    }

    #[test]
    fn test_benchmark_perfect() {
        let pred = set_map(vec![("a", vec![1, 2]), ("b", vec![7])]);
        let res = benchmark(&pred, &pred.clone()).unwrap();
        assert_eq!((res.tp, res.fn_, res.fp), (3, 0, 0));
        assert_relative_eq!(res.f_score, 1.0);
        assert!(res.errors.is_empty());
        assert_eq!(res.counts.complete_match, 2);
    }

    #[test]
    fn test_benchmark_skips_unknown_keys() {
        let pred = set_map(vec![("a", vec![1]), ("zzz", vec![1, 2, 3])]);
        let refs = set_map(vec![("a", vec![1, 2])]);
        let res = benchmark(&pred, &refs).unwrap();
        assert_eq!(res.obj_count, 1);
        assert_eq!((res.tp, res.fn_, res.fp), (1, 1, 0));
        assert_eq!(res.counts.not_enough_predictions, 1);
        assert_eq!(res.errors.len(), 1);
    }

    #[test]
    fn test_benchmark_complete_mismatch_degrades_metrics() {
        let pred = set_map(vec![("a", vec![1])]);
        let refs = set_map(vec![("a", vec![2])]);
        let res = benchmark(&pred, &refs).unwrap();
        assert_eq!((res.tp, res.fn_, res.fp), (0, 1, 1));
        assert_eq!(res.precision, 0.0);
        assert_eq!(res.recall, 0.0);
        assert_eq!(res.f_score, 0.0);
        assert_eq!(res.counts.complete_mismatch, 1);
    }

    #[test]
    fn test_benchmark_empty_sets() {
        // TP+FP = 0 and TP+FN = 0: everything degrades to 0 without panicking
        let pred = set_map(vec![("a", vec![])]);
        let refs = set_map(vec![("a", vec![])]);
        let res = benchmark(&pred, &refs).unwrap();
        assert_eq!(res.obj_count, 1);
        assert_eq!(res.precision, 0.0);
        assert_eq!(res.recall, 0.0);
        assert_eq!(res.f_score, 0.0);
        assert_eq!(res.counts.complete_match, 1);
        assert!(res.errors.is_empty());
    }

    #[test]
    fn test_benchmark_zero_recall_only() {
        // nothing predicted: TP+FP = 0 and recall 0, so F is forced to 0
        let pred = set_map(vec![("a", vec![])]);
        let refs = set_map(vec![("a", vec![5])]);
        let res = benchmark(&pred, &refs).unwrap();
        assert_eq!((res.tp, res.fn_, res.fp), (0, 1, 0));
        assert_eq!(res.precision, 0.0);
        assert_eq!(res.f_score, 0.0);
    }

    #[test]
    fn test_binom_score() {
        let background: BTreeSet<u32> = (1..=20).collect();
        let genes = BTreeSet::from([1, 2, 3, 4]);
        // tp = 2 of 4: P(X <= 2) = 11/16
        let score = binom_score(&background, &BTreeSet::from([1, 2, 9]), &genes, 0.5).unwrap();
        assert_relative_eq!(score, 0.162_727_297_497_699_7, epsilon = 1e-9);
        // tp = 0 of 3: P(X <= 0) = 1/8
        let score =
            binom_score(&background, &BTreeSet::from([7]), &BTreeSet::from([1, 2, 3]), 0.5)
                .unwrap();
        assert_relative_eq!(score, 0.903_089_986_991_943_5, epsilon = 1e-9);
    }

    #[test]
    fn test_binom_score_all_hits_is_zero() {
        let genes = BTreeSet::from(["a", "b"]);
        let score = binom_score(&genes, &genes, &genes, 0.3).unwrap();
        assert_relative_eq!(score, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_binom_score_bad_probability() {
        let genes = BTreeSet::from([1]);
        assert!(matches!(
            binom_score(&genes, &genes, &genes, 1.5),
            Err(SeqBenchError::Format(_))
        ));
    }
}
