//! Order rows by descending metric.

use crate::dataset::Columns;
use std::cmp::Reverse;

/// Return columns reordered by descending metric.
///
/// The sort is stable: rows with equal metrics keep their relative order.
pub fn sort_descending(columns: &Columns) -> Columns {
    let metric = columns.metric();
    let mut order: Vec<usize> = (0..columns.len()).collect();
    order.sort_by_key(|&i| Reverse(metric[i]));
    columns.permuted(&order)
}
