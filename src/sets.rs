// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::info;

use crate::errors::{Result, SeqBenchError};

/// Key -> set of values, e.g. document -> assigned labels.
pub type SetMap<K, V> = BTreeMap<K, BTreeSet<V>>;

/// Reads `key<TAB>value` lines into a set map. Blank lines and lines starting with '#' are
/// skipped; a key that appears on several lines collects all of its values. Columns after the
/// second are ignored.
pub fn read_set_map<R: BufRead>(reader: R) -> Result<SetMap<String, String>> {
    let mut map: SetMap<String, String> = BTreeMap::new();
    for (lineno, line) in reader.lines().enumerate() {
        let l = line?;
        let trimmed = l.trim_end();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut fields = trimmed.split('\t');
        match (fields.next(), fields.next()) {
            (Some(key), Some(value)) => {
                map.entry(key.to_string())
                    .or_default()
                    .insert(value.to_string());
            }
            _ => {
                return Err(SeqBenchError::Format(format!(
                    "line {}: expected key and value separated by a tab",
                    lineno + 1
                )))
            }
        }
    }
    Ok(map)
}

pub fn read_set_map_file<P: AsRef<Path>>(path: P) -> Result<SetMap<String, String>> {
    let path = path.as_ref();
    info!("Parsing {}", path.display());
    read_set_map(BufReader::new(File::open(path)?))
}

/// All values of all keys, as one flat list (in key order).
pub fn flatten_values<K, V: Clone>(map: &SetMap<K, V>) -> Vec<V> {
    map.values().flat_map(|set| set.iter().cloned()).collect()
}

/// Total number of key/value assignments.
pub fn assignment_count<K, V>(map: &SetMap<K, V>) -> usize {
    map.values().map(BTreeSet::len).sum()
}

/// Keeps only the keys whose set has at most `max_size` values.
pub fn remove_big_sets<K: Ord, V>(map: SetMap<K, V>, max_size: usize) -> SetMap<K, V> {
    map.into_iter()
        .filter(|(_, set)| set.len() <= max_size)
        .collect()
}
