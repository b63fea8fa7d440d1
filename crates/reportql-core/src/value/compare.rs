use crate::value::Value;
use std::cmp::Ordering;

/// Total canonical comparator used for result-set ordering.
///
/// Ordering rules:
/// 1. Canonical variant rank
/// 2. Variant-specific comparison for same-ranked values
///
/// Mixed-variant comparisons are rank-only and must remain deterministic.
#[must_use]
pub fn canonical_cmp(left: &Value, right: &Value) -> Ordering {
    let rank = left.canonical_rank().cmp(&right.canonical_rank());
    if rank != Ordering::Equal {
        return rank;
    }

    canonical_cmp_same_rank(left, right)
}

/// Strict comparator for orderable variant pairs.
///
/// Returns `None` for mismatched or non-orderable variants; predicate
/// evaluation treats that as a non-match.
#[must_use]
pub fn strict_order_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => a.partial_cmp(b),
        (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
        (Value::Float(a), Value::Float(b)) => Some(a.total_cmp(b)),
        (Value::Date(a), Value::Date(b)) => a.partial_cmp(b),
        (Value::DateTime(a), Value::DateTime(b)) => a.partial_cmp(b),
        // Date-typed rows against day-start datetime boundaries.
        (Value::Date(a), Value::DateTime(b)) => a.partial_cmp(&b.date()),
        (Value::DateTime(a), Value::Date(b)) => a.date().partial_cmp(b),
        (Value::Text(a), Value::Text(b)) => a.partial_cmp(b),
        (Value::Ref(a), Value::Ref(b)) => a.partial_cmp(b),
        (Value::Int(a), Value::Ref(b)) => as_i128(*a).partial_cmp(&i128::from(*b)),
        (Value::Ref(a), Value::Int(b)) => i128::from(*a).partial_cmp(&as_i128(*b)),
        _ => None,
    }
}

/// Equality across encodings, or `None` when the pair is not comparable.
#[must_use]
pub fn value_eq(left: &Value, right: &Value) -> Option<bool> {
    match (left, right) {
        (Value::Null, Value::Null) => Some(true),
        (Value::Null, _) | (_, Value::Null) => Some(false),
        (Value::Ref(a), Value::Int(b)) => Some(i128::from(*a) == as_i128(*b)),
        (Value::Int(a), Value::Ref(b)) => Some(as_i128(*a) == i128::from(*b)),
        _ if left.canonical_rank() == right.canonical_rank() => {
            Some(canonical_cmp_same_rank(left, right) == Ordering::Equal)
        }
        _ => None,
    }
}

const fn as_i128(n: i64) -> i128 {
    n as i128
}

fn canonical_cmp_same_rank(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Int(a), Value::Ref(b)) => as_i128(*a).cmp(&i128::from(*b)),
        (Value::Ref(a), Value::Int(b)) => i128::from(*a).cmp(&as_i128(*b)),
        (Value::Ref(a), Value::Ref(b)) => a.cmp(b),
        (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
        (Value::Date(a), Value::Date(b)) => a.cmp(b),
        (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
        (Value::Text(a), Value::Text(b)) => a.cmp(b),
        (Value::List(a), Value::List(b)) => canonical_cmp_value_list(a, b),
        (Value::Null, Value::Null) => Ordering::Equal,
        _ => Ordering::Equal,
    }
}

fn canonical_cmp_value_list(left: &[Value], right: &[Value]) -> Ordering {
    for (left, right) in left.iter().zip(right.iter()) {
        let cmp = canonical_cmp(left, right);
        if cmp != Ordering::Equal {
            return cmp;
        }
    }

    left.len().cmp(&right.len())
}
