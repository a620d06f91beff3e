//! Summary statistics.

use crate::dataset::{Columns, Dataset, Metric, Summary};

/// Arithmetic mean of the metric values. Empty input yields 0.0.
///
/// Integer summation is exact, so the result does not depend on row order.
pub fn arithmetic_mean(values: &[Metric]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let total: u64 = values.iter().map(|&v| u64::from(v)).sum();
    total as f64 / values.len() as f64
}

/// Attach a summary to the columns, producing the final dataset.
pub fn summarize(columns: Columns, title: &str) -> Dataset {
    let summary = Summary {
        title: title.to_string(),
        mean: arithmetic_mean(columns.metric()),
    };
    Dataset::new(columns, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::sort_descending;

    #[test]
    fn test_mean() {
        assert_eq!(arithmetic_mean(&[50, 60, 70]), 60.0);
        assert_eq!(arithmetic_mean(&[1, 2]), 1.5);
        assert_eq!(arithmetic_mean(&[42]), 42.0);
        assert_eq!(arithmetic_mean(&[]), 0.0);
        assert_eq!(arithmetic_mean(&[u32::MAX, u32::MAX]), u32::MAX as f64);
    }

    #[test]
    fn test_mean_is_order_independent() {
        let values = [127, 117, 50, 63, 253, 184];
        let expected = arithmetic_mean(&values);

        let mut rotated = values;
        for _ in 0..values.len() {
            rotated.rotate_left(1);
            assert_eq!(arithmetic_mean(&rotated), expected);
        }
        let mut reversed = values;
        reversed.reverse();
        assert_eq!(arithmetic_mean(&reversed), expected);
    }

    #[test]
    fn test_summarize_after_sort_keeps_mean() {
        let columns = Columns::from_rows([
            ("AT".parse().unwrap(), "Austria", 50),
            ("BE".parse().unwrap(), "Belgium", 61),
            ("DE".parse().unwrap(), "Germany", 70),
        ]);
        let unsorted_mean = arithmetic_mean(columns.metric());
        let dataset = summarize(sort_descending(&columns), "Title\nSubtitle");

        assert_eq!(dataset.summary().mean, unsorted_mean);
        assert_eq!(dataset.summary().title, "Title\nSubtitle");
        assert_eq!(dataset.metric(), [70, 61, 50]);
        assert_eq!(dataset.len(), 3);
    }
}
