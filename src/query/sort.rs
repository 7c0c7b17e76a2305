//! Row ordering
//!
//! Rows are compared on raw field values with the loose `<`/`>` semantics hosts
//! expect from script tables: text against text compares by code point, anything
//! else compares numerically after coercion, and incomparable pairs are equal.
//!
//! That comparator is not a total order (mixed text and numbers can form cycles),
//! so rows are ordered with a stable merge sort that tolerates any comparator
//! instead of the standard library sort, which may panic on inconsistent orderings.

use crate::data::{Row, Value};
use crate::query::ast::SortDefinition;
use std::cmp::Ordering;

/// Compare two optional cell values
///
/// A missing value on either side compares equal, as does a `NaN` coercion.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let (Some(a), Some(b)) = (a, b) else {
        return Ordering::Equal;
    };

    match (a, b) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => a
            .to_number()
            .partial_cmp(&b.to_number())
            .unwrap_or(Ordering::Equal),
    }
}

/// Stable-sort borrowed rows by a sort definition
///
/// Equal keys keep their relative input order in both directions.
pub fn sort_rows(rows: &mut Vec<&Row>, sort: &SortDefinition) {
    let column = sort.column.as_str();
    stable_sort_by(rows, |a, b| {
        sort.order
            .apply(compare_values(a.get(column), b.get(column)))
    });
}

/// Bottom-up merge sort; never panics regardless of comparator consistency
pub fn stable_sort_by<T: Copy, F>(items: &mut Vec<T>, mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let len = items.len();
    if len < 2 {
        return;
    }

    let mut src = std::mem::take(items);
    let mut dst: Vec<T> = Vec::with_capacity(len);
    let mut width = 1;

    while width < len {
        dst.clear();
        let mut start = 0;
        while start < len {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            merge(&src[start..mid], &src[mid..end], &mut dst, &mut compare);
            start = end;
        }
        std::mem::swap(&mut src, &mut dst);
        width *= 2;
    }

    *items = src;
}

/// Merge two sorted runs, taking from the left run on ties
fn merge<T: Copy, F>(left: &[T], right: &[T], out: &mut Vec<T>, compare: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        if compare(&right[j], &left[i]) == Ordering::Less {
            out.push(right[j]);
            j += 1;
        } else {
            out.push(left[i]);
            i += 1;
        }
    }
    out.extend_from_slice(&left[i..]);
    out.extend_from_slice(&right[j..]);
}
