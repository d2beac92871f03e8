// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::fmt::{self, Display};
use std::io::Write;

use crate::bench::{BenchmarkResult, ErrorDetail};
use crate::errors::Result;
use crate::sets::{assignment_count, SetMap};
use crate::table::{all_to_string, write_tsv_row, ToCell};

/// Size of one benchmark input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetSummary {
    pub name: String,
    pub keys: usize,
    pub assignments: usize,
}

impl SetSummary {
    pub fn of<K, V>(name: impl Into<String>, map: &SetMap<K, V>) -> Self {
        SetSummary {
            name: name.into(),
            keys: map.len(),
            assignments: assignment_count(map),
        }
    }

    fn average(&self) -> f64 {
        if self.keys == 0 {
            0.0
        } else {
            self.assignments as f64 / self.keys as f64
        }
    }
}

/// Human-readable benchmark report. `object_name` is what the keys are called in the text
/// ("documents", "genes", ...).
pub struct BenchmarkReport<'a, K, V> {
    pub object_name: &'a str,
    pub prediction: SetSummary,
    pub reference: SetSummary,
    pub common_keys: usize,
    pub pmax: Option<usize>,
    pub rmax: Option<usize>,
    pub result: &'a BenchmarkResult<K, V>,
}

impl<K, V> BenchmarkReport<'_, K, V> {
    fn share(&self, n: usize) -> String {
        let total = self.result.obj_count.max(1);
        format!("{}, {:.2} %", n, 100.0 * n as f64 / total as f64)
    }
}

impl<K, V> Display for BenchmarkReport<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let obj = self.object_name;
        let res = self.result;
        let counts = &res.counts;

        for (summary, role, what) in [
            (&self.prediction, "prediction", "predicted values"),
            (&self.reference, "reference", "values"),
        ] {
            writeln!(
                f,
                "Number of {} in {} set {}: {}",
                obj, role, summary.name, summary.keys
            )?;
            writeln!(
                f,
                "Number of total {}/value assignments in {} set: {}",
                obj, role, summary.assignments
            )?;
            writeln!(
                f,
                "Average number of {} per {} in {} set: {:.6}",
                what,
                obj,
                role,
                summary.average()
            )?;
            writeln!(f)?;
        }

        writeln!(
            f,
            "Number of {} with common key in prediction set and reference set: {}",
            obj, self.common_keys
        )?;
        if let Some(pmax) = self.pmax {
            writeln!(
                f,
                "Filtering: analysis is limited to {} with at most {} predicted values",
                obj, pmax
            )?;
        }
        if let Some(rmax) = self.rmax {
            writeln!(
                f,
                "Filtering: analysis is limited to {} with at most {} reference values",
                obj, rmax
            )?;
        }
        writeln!(f, "Number of {} considered: {}", obj, res.obj_count)?;
        writeln!(f)?;

        writeln!(f, "Details on a per-prediction basis")?;
        writeln!(f, "  - Number of predictions: {}", res.pred_count)?;
        writeln!(
            f,
            "  - TP={}, FP={}, FN={}, Prec={:.6}, Recall={:.6}, F={:.6}",
            res.tp, res.fp, res.fn_, res.precision, res.recall, res.f_score
        )?;
        writeln!(f, "TP : correct predictions")?;
        writeln!(f, "FP : incorrect predictions")?;
        writeln!(f, "FN : missed targets")?;
        writeln!(f, "Prec : correct predictions relative to all predictions")?;
        writeln!(f, "Recall : correct predictions relative to targets")?;
        writeln!(f)?;

        writeln!(f, "Details on a per-{} basis:", obj)?;
        writeln!(f, "- Perfect predictions: {}", self.share(counts.complete_match))?;
        writeln!(
            f,
            "- At least one correct prediction: {}",
            self.share(counts.at_least_one_hit)
        )?;
        writeln!(
            f,
            "- Not a single correct prediction: {}",
            self.share(counts.complete_mismatch)
        )?;
        writeln!(f, "- Over- or underpredicting?")?;
        writeln!(
            f,
            "  - {} with too few predictions: {}",
            obj,
            self.share(counts.not_enough_predictions)
        )?;
        writeln!(
            f,
            "  - {} with too many predictions: {}",
            obj,
            self.share(counts.too_many_predictions)
        )
    }
}

/// Writes one `id <TAB> expected <TAB> predicted` line per error, sets comma-joined.
pub fn write_error_details<W, K, V>(out: &mut W, errors: &[ErrorDetail<K, V>]) -> Result<()>
where
    W: Write,
    K: ToCell,
    V: ToCell,
{
    for err in errors {
        write_tsv_row(out, all_to_string(&[&err.id, &err.expected, &err.predicted]))?;
    }
    Ok(())
}
