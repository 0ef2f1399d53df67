//! Structural diffing of maps, sets, and sequences.
//!
//! All comparisons here run on normalized values: every NaN float is
//! replaced by one canonical NaN so that two NaNs compare equal, and `-0.0`
//! is replaced by `0.0` so that signed zeros compare equal as numbers do.
//!
//! Diagnostics are sorted by their rendered text so the same pair of values
//! always produces the same messages in the same order.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use probity_foundation::{LtMap, LtSet, LtVec, Value};

/// Ordered keys leading from the root of a map to a leaf value.
pub type KeyPath = Vec<Value>;

// =============================================================================
// NaN Normalization
// =============================================================================

/// Returns `value` with every NaN float, at any depth, replaced by the
/// canonical NaN and every zero float replaced by positive zero.
#[must_use]
pub fn normalize_nan(value: &Value) -> Value {
    match value {
        Value::Float(n) if n.is_nan() => Value::Float(f64::NAN),
        Value::Float(n) if *n == 0.0 => Value::Float(0.0),
        Value::Vec(v) => Value::Vec(v.iter().map(normalize_nan).collect()),
        Value::Set(s) => Value::Set(s.iter().map(normalize_nan).collect()),
        Value::Map(m) => Value::Map(normalize_map(m)),
        Value::Membership(target) => Value::Membership(Arc::new(normalize_nan(target))),
        other => other.clone(),
    }
}

pub(crate) fn normalize_map(map: &LtMap<Value, Value>) -> LtMap<Value, Value> {
    map.iter()
        .map(|(k, v)| (normalize_nan(k), normalize_nan(v)))
        .collect()
}

/// Numeric-aware equality: NaN equals NaN and `-0.0` equals `0.0`.
#[must_use]
pub fn nan_eq(a: &Value, b: &Value) -> bool {
    normalize_nan(a) == normalize_nan(b)
}

fn sorted_rendering<'a>(values: impl IntoIterator<Item = &'a Value>) -> Vec<String> {
    let mut rendered: Vec<String> = values.into_iter().map(ToString::to_string).collect();
    rendered.sort();
    rendered
}

// =============================================================================
// Map Diff
// =============================================================================

/// Flattens a map into `(key path, leaf value)` pairs.
///
/// Nested non-empty maps are descended into; every other value, including an
/// empty map, is a leaf. Keeping empty maps as leaves means two maps are equal
/// exactly when their flattenings are equal.
#[must_use]
pub fn flatten(map: &LtMap<Value, Value>) -> HashSet<(KeyPath, Value)> {
    let mut out = HashSet::new();
    let mut prefix = Vec::new();
    flatten_into(map, &mut prefix, &mut out);
    out
}

fn flatten_into(
    map: &LtMap<Value, Value>,
    prefix: &mut KeyPath,
    out: &mut HashSet<(KeyPath, Value)>,
) {
    for (key, value) in map.iter() {
        prefix.push(key.clone());
        match value {
            Value::Map(inner) if !inner.is_empty() => flatten_into(inner, prefix, out),
            leaf => {
                out.insert((prefix.clone(), leaf.clone()));
            }
        }
        prefix.pop();
    }
}

/// A key present on both sides whose leaf values disagree.
#[derive(Clone, Debug, PartialEq)]
pub struct Mismatch {
    /// Keys leading to the disagreement, ending with the disagreeing key.
    pub path: KeyPath,
    /// Value on the expected side.
    pub expected: Value,
    /// Value on the actual side.
    pub actual: Value,
}

impl Mismatch {
    /// Renders as `a b expected 2 but was 3`.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "{} expected {} but was {}",
            render_path(&self.path),
            self.expected,
            self.actual
        )
    }
}

fn render_path(path: &[Value]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders a key path as `{k1 {k2 ...`.
fn render_open_path(path: &[Value]) -> String {
    let mut out: String = path.iter().map(|k| format!("{{{k} ")).collect();
    out.push_str("...");
    out
}

/// Differences between an expected map and an actual map.
///
/// The three diagnostic lists are independent and may overlap: a key whose
/// value is a map on one side and a scalar on the other shows up both as a
/// value disagreement and as missing leaf paths.
#[derive(Clone, Debug, Default)]
pub struct MapDiff {
    /// Key paths in expected's flattening but not in actual's.
    pub missing_in_actual: Vec<KeyPath>,
    /// Key paths in actual's flattening but not in expected's.
    pub missing_in_expected: Vec<KeyPath>,
    /// Leaf disagreements under keys present on both sides.
    pub mismatches: Vec<Mismatch>,
    equal: bool,
}

impl MapDiff {
    /// Diffs two maps.
    #[must_use]
    pub fn compute(expected: &LtMap<Value, Value>, actual: &LtMap<Value, Value>) -> Self {
        let expected = normalize_map(expected);
        let actual = normalize_map(actual);
        if expected == actual {
            return Self {
                equal: true,
                ..Self::default()
            };
        }

        let expected_paths: HashSet<KeyPath> =
            flatten(&expected).into_iter().map(|(path, _)| path).collect();
        let actual_paths: HashSet<KeyPath> =
            flatten(&actual).into_iter().map(|(path, _)| path).collect();

        let mut mismatches = Vec::new();
        collect_mismatches(&expected, &actual, &mut Vec::new(), &mut mismatches);
        mismatches.sort_by_cached_key(Mismatch::message);

        Self {
            missing_in_actual: sorted_paths(expected_paths.difference(&actual_paths)),
            missing_in_expected: sorted_paths(actual_paths.difference(&expected_paths)),
            mismatches,
            equal: false,
        }
    }

    /// Returns true if the maps are equal under NaN normalization.
    #[must_use]
    pub const fn is_equal(&self) -> bool {
        self.equal
    }

    /// `{k ... is in expected, but not in actual` for each missing path.
    #[must_use]
    pub fn expected_messages(&self) -> Vec<String> {
        self.missing_in_actual
            .iter()
            .map(|p| format!("{} is in expected, but not in actual", render_open_path(p)))
            .collect()
    }

    /// `{k ... is in actual, but not in expected` for each extra path.
    #[must_use]
    pub fn actual_messages(&self) -> Vec<String> {
        self.missing_in_expected
            .iter()
            .map(|p| format!("{} is in actual, but not in expected", render_open_path(p)))
            .collect()
    }

    /// One message per value disagreement.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.mismatches.iter().map(Mismatch::message).collect()
    }
}

fn sorted_paths<'a>(paths: impl Iterator<Item = &'a KeyPath>) -> Vec<KeyPath> {
    let mut paths: Vec<KeyPath> = paths.cloned().collect();
    paths.sort_by_cached_key(|p| render_path(p));
    paths
}

fn collect_mismatches(
    expected: &LtMap<Value, Value>,
    actual: &LtMap<Value, Value>,
    prefix: &mut KeyPath,
    out: &mut Vec<Mismatch>,
) {
    for (key, e) in expected.iter() {
        let Some(a) = actual.get(key) else {
            continue;
        };
        prefix.push(key.clone());
        match (e, a) {
            (Value::Map(e_inner), Value::Map(a_inner)) => {
                collect_mismatches(e_inner, a_inner, prefix, out);
            }
            _ if e != a => out.push(Mismatch {
                path: prefix.clone(),
                expected: e.clone(),
                actual: a.clone(),
            }),
            _ => {}
        }
        prefix.pop();
    }
}

// =============================================================================
// Set Diff
// =============================================================================

/// One-directional differences between two sets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SetDiff {
    /// Elements in expected but not in actual.
    pub only_in_expected: Vec<Value>,
    /// Elements in actual but not in expected.
    pub only_in_actual: Vec<Value>,
}

impl SetDiff {
    /// Diffs two sets.
    #[must_use]
    pub fn compute(expected: &LtSet<Value>, actual: &LtSet<Value>) -> Self {
        let expected: LtSet<Value> = expected.iter().map(normalize_nan).collect();
        let actual: LtSet<Value> = actual.iter().map(normalize_nan).collect();
        Self::between_normalized(&expected, &actual)
    }

    fn between_normalized(expected: &LtSet<Value>, actual: &LtSet<Value>) -> Self {
        let mut only_in_expected: Vec<Value> = expected.difference(actual).iter().cloned().collect();
        let mut only_in_actual: Vec<Value> = actual.difference(expected).iter().cloned().collect();
        only_in_expected.sort_by_cached_key(ToString::to_string);
        only_in_actual.sort_by_cached_key(ToString::to_string);
        Self {
            only_in_expected,
            only_in_actual,
        }
    }

    /// Returns true if neither side has elements the other lacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.only_in_expected.is_empty() && self.only_in_actual.is_empty()
    }

    /// `a, b are in expected, but not in actual`, if any.
    #[must_use]
    pub fn expected_message(&self) -> Option<String> {
        (!self.only_in_expected.is_empty()).then(|| {
            format!(
                "{} are in expected, but not in actual",
                sorted_rendering(&self.only_in_expected).join(", ")
            )
        })
    }

    /// `a, b are in actual, but not in expected`, if any.
    #[must_use]
    pub fn actual_message(&self) -> Option<String> {
        (!self.only_in_actual.is_empty()).then(|| {
            format!(
                "{} are in actual, but not in expected",
                sorted_rendering(&self.only_in_actual).join(", ")
            )
        })
    }
}

// =============================================================================
// Sequence Diff
// =============================================================================

/// Best guess at why two unequal sequences differ.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Discrepancy {
    /// Same elements with the same multiplicities, in a different order.
    DifferentOrdering,
    /// Same distinct elements; actual repeats some of them more.
    DuplicatesInActual,
    /// Same distinct elements; expected repeats some of them more.
    DuplicatesInExpected,
    /// Actual has more elements.
    ActualLarger,
    /// Expected has more elements.
    ExpectedLarger,
}

impl Discrepancy {
    /// Human-readable description.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::DifferentOrdering => {
                "lists appear to contain the same items with different ordering"
            }
            Self::DuplicatesInActual => "actual contains duplicate items not present in expected",
            Self::DuplicatesInExpected => {
                "expected contains duplicate items not present in actual"
            }
            Self::ActualLarger => "actual is larger than expected",
            Self::ExpectedLarger => "expected is larger than actual",
        }
    }
}

/// Differences between two ordered sequences.
#[derive(Clone, Debug, Default)]
pub struct SequenceDiff {
    /// Unordered element differences (informational).
    pub elements: SetDiff,
    /// Classification of the discrepancy, if one applies.
    pub discrepancy: Option<Discrepancy>,
    equal: bool,
}

impl SequenceDiff {
    /// Diffs two sequences. Order matters for equality.
    #[must_use]
    pub fn compute(expected: &LtVec<Value>, actual: &LtVec<Value>) -> Self {
        let expected: Vec<Value> = expected.iter().map(normalize_nan).collect();
        let actual: Vec<Value> = actual.iter().map(normalize_nan).collect();
        if expected == actual {
            return Self {
                equal: true,
                ..Self::default()
            };
        }

        let expected_items: LtSet<Value> = expected.iter().cloned().collect();
        let actual_items: LtSet<Value> = actual.iter().cloned().collect();
        let discrepancy = classify_discrepancy(&expected, &actual, expected_items == actual_items);

        Self {
            elements: SetDiff::between_normalized(&expected_items, &actual_items),
            discrepancy,
            equal: false,
        }
    }

    /// Returns true if the sequences are elementwise equal.
    #[must_use]
    pub const fn is_equal(&self) -> bool {
        self.equal
    }
}

fn frequencies(items: &[Value]) -> HashMap<&Value, usize> {
    let mut counts = HashMap::new();
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }
    counts
}

/// Checks are ordered; the first that applies wins.
fn classify_discrepancy(
    expected: &[Value],
    actual: &[Value],
    same_items: bool,
) -> Option<Discrepancy> {
    use std::cmp::Ordering;

    if same_items && frequencies(expected) == frequencies(actual) {
        return Some(Discrepancy::DifferentOrdering);
    }
    match (same_items, expected.len().cmp(&actual.len())) {
        (true, Ordering::Less) => Some(Discrepancy::DuplicatesInActual),
        (true, Ordering::Greater) => Some(Discrepancy::DuplicatesInExpected),
        (false, Ordering::Less) => Some(Discrepancy::ActualLarger),
        (false, Ordering::Greater) => Some(Discrepancy::ExpectedLarger),
        (_, Ordering::Equal) => None,
    }
}
