// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

// Sorting, grouping and filtering of tuple-like records by one of their fields. A field is
// picked with a FieldSelector (name or position), resolved once into a projection.

use std::{
    cmp::{Ordering, Reverse},
    collections::BTreeMap,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde::Serialize;

use crate::errors::{Result, SeqBenchError};

/// The value of one field of a record.
///
/// Values are totally ordered: `Null` sorts first, then numbers, then text. Integers and
/// floats compare numerically, so `Int(1) == Float(1.0)`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Parses a table cell: empty is `Null`, then integer, then float, else text.
    pub fn parse(cell: &str) -> FieldValue {
        let cell = cell.trim();
        if cell.is_empty() {
            FieldValue::Null
        } else if let Ok(i) = cell.parse::<i64>() {
            FieldValue::Int(i)
        } else if let Ok(x) = cell.parse::<f64>() {
            FieldValue::Float(x)
        } else {
            FieldValue::Text(cell.to_string())
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Int(_) | FieldValue::Float(_) => 1,
            FieldValue::Text(_) => 2,
        }
    }
}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use FieldValue::*;
        match (self, other) {
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => cmp_floats(*a, *b),
            (Int(a), Float(b)) => cmp_int_float(*a, *b),
            (Float(a), Int(b)) => cmp_int_float(*b, *a).reverse(),
            (Text(a), Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

// -0.0 and 0.0 are equal (both equal Int(0)); NaNs order as in total_cmp.
fn cmp_floats(a: f64, b: f64) -> Ordering {
    if a == b {
        Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}

// Exact comparison, without rounding the integer to f64.
fn cmp_int_float(i: i64, x: f64) -> Ordering {
    if x.is_nan() {
        return if x.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if x >= I64_BOUND {
        return Ordering::Less;
    }
    if x < -I64_BOUND {
        return Ordering::Greater;
    }
    let whole = x.trunc();
    i.cmp(&(whole as i64)).then_with(|| {
        if x > whole {
            Ordering::Less
        } else if x < whole {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    })
}

// 2^63
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// The value of an integral float, if an `Int` can hold it.
fn float_as_int(x: f64) -> Option<i64> {
    if x.is_finite() && x.trunc() == x && x >= -I64_BOUND && x < I64_BOUND {
        Some(x as i64)
    } else {
        None
    }
}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FieldValue {}

impl Hash for FieldValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            FieldValue::Null => 0u8.hash(state),
            FieldValue::Int(i) => {
                1u8.hash(state);
                i.hash(state);
            }
            FieldValue::Float(x) => match float_as_int(*x) {
                // Must agree with Eq: 1.0 hashes like 1.
                Some(i) => {
                    1u8.hash(state);
                    i.hash(state);
                }
                None => {
                    2u8.hash(state);
                    x.to_bits().hash(state);
                }
            },
            FieldValue::Text(s) => {
                3u8.hash(state);
                s.hash(state);
            }
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),+) => {
        $(
            impl From<$t> for FieldValue {
                fn from(v: $t) -> Self {
                    FieldValue::Int(i64::from(v))
                }
            }
        )+
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<usize> for FieldValue {
    fn from(v: usize) -> Self {
        match i64::try_from(v) {
            Ok(i) => FieldValue::Int(i),
            Err(_) => FieldValue::Float(v as f64),
        }
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        FieldValue::Float(f64::from(v))
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(FieldValue::Null, Into::into)
    }
}

/// Picks a field of a record, by name or by position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldSelector {
    Name(String),
    Index(usize),
}

impl FieldSelector {
    /// Resolves the selector to a field position, using `sample` to learn the record layout.
    pub fn resolve<R: Record>(&self, sample: &R) -> Result<usize> {
        match self {
            FieldSelector::Name(name) => sample
                .field_names()
                .iter()
                .position(|n| *n == name.as_str())
                .ok_or_else(|| SeqBenchError::UnknownField(name.clone())),
            FieldSelector::Index(index) if *index < sample.field_count() => Ok(*index),
            FieldSelector::Index(index) => Err(SeqBenchError::UnknownField(format!(
                "#{} (record has {} fields)",
                index,
                sample.field_count()
            ))),
        }
    }
}

// All digits means a position, anything else a name.
impl FromStr for FieldSelector {
    type Err = SeqBenchError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(SeqBenchError::UnknownField(String::from("(empty)")));
        }
        match s.parse::<usize>() {
            Ok(index) => Ok(FieldSelector::Index(index)),
            Err(_) => Ok(FieldSelector::Name(s.to_string())),
        }
    }
}

impl From<&str> for FieldSelector {
    fn from(name: &str) -> Self {
        FieldSelector::Name(name.to_string())
    }
}

impl From<usize> for FieldSelector {
    fn from(index: usize) -> Self {
        FieldSelector::Index(index)
    }
}

impl fmt::Display for FieldSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSelector::Name(name) => write!(f, "{}", name),
            FieldSelector::Index(index) => write!(f, "#{}", index),
        }
    }
}

/// A tuple-like value whose fields can be read by position, and optionally by name.
///
/// Use [`impl_record!`](crate::impl_record) for structs; tuples of up to six elements are
/// records with fields named "0", "1", ...
pub trait Record {
    /// Field names, in positional order. Empty for purely positional records.
    fn field_names(&self) -> Vec<&str>;

    fn field_count(&self) -> usize {
        self.field_names().len()
    }

    /// The value at `index`, or `None` past the last field.
    fn field(&self, index: usize) -> Option<FieldValue>;
}

/// Implements [`Record`] for a struct with the listed fields, in that order. Every listed field
/// must be `Clone` and convertible into a [`FieldValue`].
///
/// ```
/// use seqbench::impl_record;
///
/// #[derive(Debug, Clone)]
/// struct Hit {
///     query: String,
///     score: f64,
/// }
///
/// impl_record!(Hit: query, score);
/// ```
#[macro_export]
macro_rules! impl_record {
    ($record:ty : $($field:ident),+ $(,)?) => {
        impl $crate::records::Record for $record {
            fn field_names(&self) -> ::std::vec::Vec<&str> {
                ::std::vec![$(::std::stringify!($field)),+]
            }

            #[allow(unused_assignments)]
            fn field(&self, index: usize) -> ::std::option::Option<$crate::records::FieldValue> {
                let mut position = 0usize;
                $(
                    if position == index {
                        return ::std::option::Option::Some(
                            $crate::records::FieldValue::from(self.$field.clone()),
                        );
                    }
                    position += 1;
                )+
                ::std::option::Option::None
            }
        }
    };
}

macro_rules! impl_tuple_record {
    ($($idx:tt : $t:ident),+) => {
        impl<$($t: Clone + Into<FieldValue>),+> Record for ($($t,)+) {
            fn field_names(&self) -> Vec<&str> {
                vec![$(stringify!($idx)),+]
            }

            fn field(&self, index: usize) -> Option<FieldValue> {
                match index {
                    $($idx => Some(self.$idx.clone().into()),)+
                    _ => None,
                }
            }
        }
    };
}

impl_tuple_record!(0: A);
impl_tuple_record!(0: A, 1: B);
impl_tuple_record!(0: A, 1: B, 2: C);
impl_tuple_record!(0: A, 1: B, 2: C, 3: D);
impl_tuple_record!(0: A, 1: B, 2: C, 3: D, 4: E);
impl_tuple_record!(0: A, 1: B, 2: C, 3: D, 4: E, 5: F);

// Positional only.
impl Record for Vec<FieldValue> {
    fn field_names(&self) -> Vec<&str> {
        Vec::new()
    }

    fn field_count(&self) -> usize {
        self.len()
    }

    fn field(&self, index: usize) -> Option<FieldValue> {
        self.get(index).cloned()
    }
}

/// Returns a function projecting `selector`'s field out of records shaped like `sample`.
/// Records shorter than `sample` project to `Null`.
pub fn field_getter<R: Record>(
    selector: &FieldSelector,
    sample: &R,
) -> Result<impl Fn(&R) -> FieldValue> {
    let index = selector.resolve(sample)?;
    Ok(move |record: &R| record.field(index).unwrap_or(FieldValue::Null))
}

/// Stable sort by an arbitrary key; equal keys keep their relative order in both directions.
pub fn sort_with_key<R, K, F>(records: &mut [R], descending: bool, key: F)
where
    K: Ord,
    F: Fn(&R) -> K,
{
    if descending {
        records.sort_by_cached_key(|r| Reverse(key(r)));
    } else {
        records.sort_by_cached_key(|r| key(r));
    }
}

/// Stable sort of `records` by `field`. Sorting an empty slice is a no-op, even for an unknown
/// field.
pub fn sort_by_field<R: Record>(
    records: &mut [R],
    field: &FieldSelector,
    descending: bool,
) -> Result<()> {
    let Some(first) = records.first() else {
        return Ok(());
    };
    let key = field_getter(field, first)?;
    sort_with_key(records, descending, key);
    Ok(())
}

/// Keeps every record whose score equals the maximum score, ties included, in their original
/// relative order.
pub fn best_by_score<R: Record>(mut records: Vec<R>, score_field: &FieldSelector) -> Result<Vec<R>> {
    let Some(first) = records.first() else {
        return Err(SeqBenchError::EmptyInput(format!(
            "no records to take the best {} from",
            score_field
        )));
    };
    let score = field_getter(score_field, first)?;
    sort_with_key(&mut records, true, &score);
    let best = score(&records[0]);
    records.retain(|r| score(r) >= best);
    Ok(records)
}

/// Groups records by the value of `field`. Within a group, records keep their input order.
pub fn index_by_field<R, I>(records: I, field: &FieldSelector) -> Result<BTreeMap<FieldValue, Vec<R>>>
where
    R: Record,
    I: IntoIterator<Item = R>,
{
    let mut records = records.into_iter().peekable();
    let Some(first) = records.peek() else {
        return Ok(BTreeMap::new());
    };
    let key = field_getter(field, first)?;
    let mut index: BTreeMap<FieldValue, Vec<R>> = BTreeMap::new();
    for record in records {
        index.entry(key(&record)).or_default().push(record);
    }
    Ok(index)
}

/// Keeps, for each distinct `id_field` value, the records with that group's best `score_field`
/// (ties included). Groups come out in ascending id order.
///
/// ```
/// use seqbench::records::{best_per_group, FieldSelector};
///
/// let hits = vec![(1, 6), (1, 3), (2, 7), (2, 1000)];
/// let best = best_per_group(hits, &FieldSelector::Index(0), &FieldSelector::Index(1)).unwrap();
/// assert_eq!(best, vec![(1, 6), (2, 1000)]);
/// ```
pub fn best_per_group<R: Record>(
    records: Vec<R>,
    id_field: &FieldSelector,
    score_field: &FieldSelector,
) -> Result<Vec<R>> {
    let mut kept = Vec::new();
    for (_, group) in index_by_field(records, id_field)? {
        kept.extend(best_by_score(group, score_field)?);
    }
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Test {
        f1: i32,
        f2: i32,
    }

    impl_record!(Test: f1, f2);

    fn t(f1: i32, f2: i32) -> Test {
        Test { f1, f2 }
    }

    #[test]
    fn test_field_value_order() {
        let mut values = vec![
            FieldValue::from("b"),
            FieldValue::from(2.5),
            FieldValue::Null,
            FieldValue::from(3),
            FieldValue::from("a"),
            FieldValue::from(-1),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                FieldValue::Null,
                FieldValue::Int(-1),
                FieldValue::Float(2.5),
                FieldValue::Int(3),
                FieldValue::from("a"),
                FieldValue::from("b"),
            ]
        );
    }

    #[test]
    fn test_field_value_int_float_numeric() {
        assert_eq!(FieldValue::Int(1), FieldValue::Float(1.0));
        assert_eq!(FieldValue::Int(0), FieldValue::Float(-0.0));
        assert!(FieldValue::Float(1.5) > FieldValue::Int(1));
        assert!(FieldValue::Float(-1.5) < FieldValue::Int(-1));
        assert!(FieldValue::Int(i64::MAX) < FieldValue::Float(1e19));
        assert!(FieldValue::Int(9_007_199_254_740_993) > FieldValue::Float(9_007_199_254_740_992.0));
    }

    #[test]
    fn test_field_value_hash_agrees_with_eq() {
        use std::collections::HashSet;
        let set: HashSet<FieldValue> = [FieldValue::Int(1000), FieldValue::Float(1000.0)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 1);
        assert!(set.contains(&FieldValue::Float(1000.0)));
    }

    #[test]
    fn test_best_by_score_mixed_int_float_tie() {
        let recs = vec![
            vec![FieldValue::from("q"), FieldValue::from(1000)],
            vec![FieldValue::from("q"), FieldValue::from(1000.0)],
            vec![FieldValue::from("q"), FieldValue::from(3)],
        ];
        let best = best_by_score(recs, &FieldSelector::Index(1)).unwrap();
        assert_eq!(best.len(), 2);
    }

    #[test]
    fn test_index_by_field_merges_int_and_float_ids() {
        let recs = vec![
            vec![FieldValue::from(1), FieldValue::from(2)],
            vec![FieldValue::from(1.0), FieldValue::from(5)],
        ];
        let index = index_by_field(recs.clone(), &FieldSelector::Index(0)).unwrap();
        assert_eq!(index.len(), 1);
        let best = best_per_group(recs, &FieldSelector::Index(0), &FieldSelector::Index(1)).unwrap();
        assert_eq!(best, vec![vec![FieldValue::from(1.0), FieldValue::from(5)]]);
    }

    #[test]
    fn test_field_value_parse() {
        assert_eq!(FieldValue::parse(""), FieldValue::Null);
        assert_eq!(FieldValue::parse(" 42 "), FieldValue::Int(42));
        assert_eq!(FieldValue::parse("1e-5"), FieldValue::Float(1e-5));
        assert_eq!(FieldValue::parse("chr1"), FieldValue::from("chr1"));
    }

    #[test]
    fn test_selector_from_str() {
        assert_eq!("2".parse::<FieldSelector>().unwrap(), FieldSelector::Index(2));
        assert_eq!(
            "score".parse::<FieldSelector>().unwrap(),
            FieldSelector::Name(String::from("score"))
        );
        assert!("".parse::<FieldSelector>().is_err());
    }

    #[test]
    fn test_getter_by_name_and_index() {
        let rec = t(4, 7);
        let by_name = field_getter(&FieldSelector::from("f2"), &rec).unwrap();
        let by_index = field_getter(&FieldSelector::Index(1), &rec).unwrap();
        assert_eq!(by_name(&rec), FieldValue::Int(7));
        assert_eq!(by_index(&rec), FieldValue::Int(7));
    }

    #[test]
    fn test_getter_unknown_field() {
        let rec = t(4, 7);
        assert!(matches!(
            field_getter(&FieldSelector::from("f3"), &rec),
            Err(SeqBenchError::UnknownField(_))
        ));
        assert!(matches!(
            field_getter(&FieldSelector::Index(2), &rec),
            Err(SeqBenchError::UnknownField(_))
        ));
    }

    #[test]
    fn test_tuple_fields() {
        let rec = ("chr1", 12, 0.5);
        assert_eq!(rec.field_names(), vec!["0", "1", "2"]);
        assert_eq!(rec.field(0), Some(FieldValue::from("chr1")));
        assert_eq!(rec.field(2), Some(FieldValue::Float(0.5)));
        assert_eq!(rec.field(3), None);
        let getter = field_getter(&FieldSelector::from("1"), &rec).unwrap();
        assert_eq!(getter(&rec), FieldValue::Int(12));
    }

    #[test]
    fn test_sort_descending_is_stable() {
        let mut recs = vec![t(1, 6), t(4, 7), t(2, 7), t(3, 6)];
        sort_by_field(&mut recs, &FieldSelector::from("f2"), true).unwrap();
        assert_eq!(recs, vec![t(4, 7), t(2, 7), t(1, 6), t(3, 6)]);
    }

    #[test]
    fn test_sort_ascending() {
        let mut recs = vec![t(3, 0), t(1, 0), t(2, 0)];
        sort_by_field(&mut recs, &FieldSelector::Index(0), false).unwrap();
        assert_eq!(recs, vec![t(1, 0), t(2, 0), t(3, 0)]);
    }

    #[test]
    fn test_sort_with_key_override() {
        let mut recs = vec![t(1, -9), t(2, 3), t(3, -4)];
        sort_with_key(&mut recs, true, |r| r.f2.abs());
        assert_eq!(recs, vec![t(1, -9), t(3, -4), t(2, 3)]);
    }

    #[test]
    fn test_sort_empty() {
        let mut recs: Vec<Test> = Vec::new();
        sort_by_field(&mut recs, &FieldSelector::from("nope"), true).unwrap();
        assert!(recs.is_empty());
    }

    #[test]
    fn test_best_by_score() {
        let recs = vec![t(1, 6), t(4, 7), t(2, 7)];
        let best = best_by_score(recs, &FieldSelector::from("f2")).unwrap();
        assert_eq!(best, vec![t(4, 7), t(2, 7)]);
    }

    #[test]
    fn test_best_by_score_single() {
        let best = best_by_score(vec![t(1, 1)], &FieldSelector::Index(1)).unwrap();
        assert_eq!(best, vec![t(1, 1)]);
    }

    #[test]
    fn test_best_by_score_empty() {
        let recs: Vec<Test> = Vec::new();
        assert!(matches!(
            best_by_score(recs, &FieldSelector::from("f2")),
            Err(SeqBenchError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_index_by_field() {
        let recs = vec![t(1, 6), t(2, 7), t(1, 3), t(2, 1000)];
        let index = index_by_field(recs, &FieldSelector::from("f1")).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index[&FieldValue::Int(1)], vec![t(1, 6), t(1, 3)]);
        assert_eq!(index[&FieldValue::Int(2)], vec![t(2, 7), t(2, 1000)]);
    }

    #[test]
    fn test_index_by_field_empty() {
        let recs: Vec<Test> = Vec::new();
        assert!(index_by_field(recs, &FieldSelector::Index(0)).unwrap().is_empty());
    }

    #[test]
    fn test_best_per_group() {
        let recs = vec![t(1, 6), t(1, 3), t(2, 7), t(2, 1000)];
        let best =
            best_per_group(recs, &FieldSelector::from("f1"), &FieldSelector::from("f2")).unwrap();
        assert_eq!(best, vec![t(1, 6), t(2, 1000)]);
    }

    #[test]
    fn test_best_per_group_keeps_ties() {
        let recs = vec![("a", 5), ("b", 2), ("a", 5), ("a", 1)];
        let best = best_per_group(recs, &FieldSelector::Index(0), &FieldSelector::Index(1)).unwrap();
        assert_eq!(best, vec![("a", 5), ("a", 5), ("b", 2)]);
    }

    #[test]
    fn test_positional_vec_record() {
        let recs = vec![
            vec![FieldValue::from("x"), FieldValue::from(2)],
            vec![FieldValue::from("y"), FieldValue::from(9)],
        ];
        let best = best_by_score(recs, &FieldSelector::Index(1)).unwrap();
        assert_eq!(best.len(), 1);
        assert_eq!(best[0][0], FieldValue::from("y"));
        assert!(FieldSelector::from("name").resolve(&best[0]).is_err());
    }
}
