//! Read-time query shaping
//!
//! [`QueryOptions`] attach filtering, truncation and sorting to a `get`.
//! [`apply_query`] runs the recognized options over the *values* of the
//! resolved collection in a fixed order:
//!
//! 1. `where` predicate over `(value, index)`
//! 2. `limit` truncation
//! 3. `order_by` sort on a named property (descending when `desc` is set)
//! 4. `asc` re-sort on raw values
//! 5. `desc` re-sort on raw values
//!
//! Each sort replaces the previous one, so `asc`/`desc` override `order_by`
//! and `desc` wins over `asc`.
//!
//! # Known limitation
//!
//! The sort comparators never report equality: a tie compares as "before"
//! (or "after" when descending), and the `asc`/`desc` comparators rank by
//! type first, so strings and non-strings partition and non-strings come out
//! in the opposite direction. This reproduces the established observable
//! ordering; [`merge_sort_by`] is used because it stays well-defined with a
//! comparator that is not a total order.

use crate::value::{is_truthy, loose_gt, loose_lt, property, values_of};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Predicate over an enumerated element and its position
pub type Predicate = Arc<dyn Fn(&Value, usize) -> bool + Send + Sync>;

/// Options shaping the result of a read
///
/// # Example
///
/// ```
/// use jstore_core::query::{apply_query, QueryOptions};
/// use serde_json::json;
///
/// let users = json!({
///     "15": {"name": "A", "age": 26},
///     "13": {"name": "B", "age": 33}
/// });
/// let options = QueryOptions::new().order_by("age").desc();
/// assert_eq!(
///     apply_query(&users, &options),
///     json!([{"name": "B", "age": 33}, {"name": "A", "age": 26}])
/// );
/// ```
#[derive(Clone, Default)]
pub struct QueryOptions {
    filter: Option<Predicate>,
    order_by: Option<String>,
    asc: bool,
    desc: bool,
    limit: Option<i64>,
}

impl QueryOptions {
    /// Empty options (no shaping)
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep elements for which `predicate(value, index)` holds
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Value, usize) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(predicate));
        self
    }

    /// Keep elements whose `field` equals `expected`
    pub fn where_eq(self, field: impl Into<String>, expected: Value) -> Self {
        let field = field.into();
        self.filter(move |value, _| property(value, &field) == Some(&expected))
    }

    /// Sort by a named property
    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(field.into());
        self
    }

    /// Re-sort ascending on raw values
    pub fn asc(mut self) -> Self {
        self.asc = true;
        self
    }

    /// Descending `order_by`, then re-sort descending on raw values
    pub fn desc(mut self) -> Self {
        self.desc = true;
        self
    }

    /// Keep at most `n` elements; zero or negative keeps none
    pub fn limit(mut self, n: i64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Read options from a JSON object.
    ///
    /// Recognizes `orderBy`, `asc`, `desc` and `limit`; every other key is
    /// ignored. Flags follow truthiness; `limit` must be an integer.
    pub fn from_json(value: &Value) -> Self {
        let mut options = QueryOptions::new();
        if let Some(field) = value.get("orderBy").and_then(Value::as_str) {
            options.order_by = Some(field.to_string());
        }
        options.asc = value.get("asc").map(is_truthy).unwrap_or(false);
        options.desc = value.get("desc").map(is_truthy).unwrap_or(false);
        options.limit = value.get("limit").and_then(Value::as_i64);
        options
    }

    /// The `order_by` property, if set and non-empty
    pub fn order_field(&self) -> Option<&str> {
        self.order_by.as_deref().filter(|f| !f.is_empty())
    }

    /// Whether a filter predicate is installed
    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    /// Whether `asc` is set
    pub fn is_asc(&self) -> bool {
        self.asc
    }

    /// Whether `desc` is set
    pub fn is_desc(&self) -> bool {
        self.desc
    }

    /// The `limit`, if set
    pub fn limit_value(&self) -> Option<i64> {
        self.limit
    }

    /// True when no recognized option would change the result
    pub fn is_empty(&self) -> bool {
        self.filter.is_none()
            && self.order_field().is_none()
            && !self.asc
            && !self.desc
            && self.limit.is_none()
    }
}

impl fmt::Debug for QueryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryOptions")
            .field("filter", &self.filter.as_ref().map(|_| "<fn>"))
            .field("order_by", &self.order_by)
            .field("asc", &self.asc)
            .field("desc", &self.desc)
            .field("limit", &self.limit)
            .finish()
    }
}

/// Apply `options` to a resolved value
///
/// Returns `value` unchanged when no option applies; otherwise the result is
/// always a sequence of the collection's values.
pub fn apply_query(value: &Value, options: &QueryOptions) -> Value {
    if options.is_empty() {
        return value.clone();
    }

    let mut items = values_of(value);

    if let Some(predicate) = &options.filter {
        items = items
            .into_iter()
            .enumerate()
            .filter(|(i, v)| predicate(v, *i))
            .map(|(_, v)| v)
            .collect();
    }

    if let Some(n) = options.limit {
        items.truncate(usize::try_from(n).unwrap_or(0));
    }

    if let Some(field) = options.order_field() {
        let desc = options.desc;
        items = merge_sort_by(items, &|a: &Value, b: &Value| {
            let greater = loose_gt(property(a, field), property(b, field));
            match (greater, desc) {
                (true, false) | (false, true) => Ordering::Greater,
                (true, true) | (false, false) => Ordering::Less,
            }
        });
    }

    if options.asc {
        items = merge_sort_by(items, &|a: &Value, b: &Value| {
            let before = loose_lt(Some(a), Some(b));
            rank_by_type(before, a)
        });
    }

    if options.desc {
        items = merge_sort_by(items, &|a: &Value, b: &Value| {
            let before = loose_gt(Some(a), Some(b));
            rank_by_type(before, a)
        });
    }

    Value::Array(items)
}

/// Raw-value comparator shared by `asc` and `desc`: strings follow the
/// comparison, everything else goes the other way.
fn rank_by_type(holds: bool, a: &Value) -> Ordering {
    match (holds, a.is_string()) {
        (true, true) | (false, false) => Ordering::Less,
        (true, false) | (false, true) => Ordering::Greater,
    }
}

/// Top-down merge sort driven by `cmp`.
///
/// Takes the left element unless `cmp(left, right)` is `Greater`. Never
/// panics, even when `cmp` is not a total order.
pub fn merge_sort_by<F>(mut items: Vec<Value>, cmp: &F) -> Vec<Value>
where
    F: Fn(&Value, &Value) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort_by(items, cmp);
    let right = merge_sort_by(right, cmp);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => cmp(l, r) == Ordering::Greater,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        let next = if take_right { right.next() } else { left.next() };
        merged.extend(next);
    }
    merged
}
