// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::collections::{BTreeSet, HashSet};
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::rc::Rc;

use itertools::Itertools;

use crate::errors::{Result, SeqBenchError};
use crate::records::{FieldValue, Record};

/// One row of a tab-separated table whose columns are only known at runtime. All rows of a
/// table share the header.
#[derive(Debug, Clone, PartialEq)]
pub struct TsvRow {
    names: Rc<[String]>,
    values: Vec<FieldValue>,
}

impl TsvRow {
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        let index = self.names.iter().position(|n| n == name)?;
        self.values.get(index)
    }
}

impl Record for TsvRow {
    fn field_names(&self) -> Vec<&str> {
        self.names.iter().map(String::as_str).collect()
    }

    fn field(&self, index: usize) -> Option<FieldValue> {
        self.values.get(index).cloned()
    }
}

/// Reads a tab-separated table. The first line that is neither blank nor a '#' comment holds the
/// column names; a data line with more cells than there are columns is an error, one with fewer
/// is padded with nulls.
pub fn read_tsv_records<R: BufRead>(reader: R) -> Result<(Vec<String>, Vec<TsvRow>)> {
    let mut names: Option<Rc<[String]>> = None;
    let mut rows = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let l = line?;
        let trimmed = l.trim_end_matches(['\r', '\n']);
        if trimmed.trim().is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let cells = trimmed.split('\t');
        let Some(header) = names.clone() else {
            names = Some(cells.map(|c| c.trim().to_string()).collect());
            continue;
        };
        let mut values: Vec<FieldValue> = cells.map(FieldValue::parse).collect();
        if values.len() > header.len() {
            return Err(SeqBenchError::Format(format!(
                "line {}: {} cells but only {} columns",
                lineno + 1,
                values.len(),
                header.len()
            )));
        }
        values.resize(header.len(), FieldValue::Null);
        rows.push(TsvRow {
            names: header,
            values,
        });
    }
    let names = names.map(|n| n.to_vec()).unwrap_or_default();
    Ok((names, rows))
}

/// Joins values with commas, e.g. to print a set of labels in one cell.
pub fn join_values<I>(values: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    values.into_iter().join(",")
}

/// Text of one output cell. Collections are comma-joined, `None` is empty.
pub trait ToCell {
    fn to_cell(&self) -> String;
}

macro_rules! impl_to_cell_display {
    ($($t:ty),+) => {
        $(
            impl ToCell for $t {
                fn to_cell(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

impl_to_cell_display!(
    str, String, char, bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64,
    FieldValue
);

impl<T: ToCell + ?Sized> ToCell for &T {
    fn to_cell(&self) -> String {
        (**self).to_cell()
    }
}

impl<T: ToCell> ToCell for Option<T> {
    fn to_cell(&self) -> String {
        self.as_ref().map(ToCell::to_cell).unwrap_or_default()
    }
}

impl<T: ToCell> ToCell for [T] {
    fn to_cell(&self) -> String {
        join_values(self.iter().map(ToCell::to_cell))
    }
}

impl<T: ToCell> ToCell for Vec<T> {
    fn to_cell(&self) -> String {
        self.as_slice().to_cell()
    }
}

impl<T: ToCell> ToCell for BTreeSet<T> {
    fn to_cell(&self) -> String {
        join_values(self.iter().map(ToCell::to_cell))
    }
}

// Sorted, since iteration order of a HashSet is arbitrary.
impl<T: ToCell> ToCell for HashSet<T> {
    fn to_cell(&self) -> String {
        join_values(self.iter().map(ToCell::to_cell).sorted())
    }
}

/// Turns every field into its cell text, comma-joining set- or list-valued fields.
pub fn all_to_string(fields: &[&dyn ToCell]) -> Vec<String> {
    fields.iter().map(|f| f.to_cell()).collect()
}

/// Writes one tab-separated line.
pub fn write_tsv_row<W, I>(out: &mut W, fields: I) -> Result<()>
where
    W: Write,
    I: IntoIterator,
    I::Item: Display,
{
    writeln!(out, "{}", fields.into_iter().join("\t"))?;
    Ok(())
}
