//! Columnar dataset types produced by the pipeline.
//!
//! Rows are never materialized as owned objects: a dataset is three
//! index-aligned columns, and [`Record`] is a borrowed view of one row.

use crate::region::RegionCode;
use serde::{Deserialize, Serialize};

/// Per-region statistic. Wide enough for every [`MetricWidth`].
pub type Metric = u32;

/// Largest value a metric may take in a run.
///
/// Values above the configured width fail the run instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricWidth {
    U8,
    #[default]
    U16,
    U32,
}

impl MetricWidth {
    pub fn max_value(self) -> Metric {
        match self {
            Self::U8 => u8::MAX as Metric,
            Self::U16 => u16::MAX as Metric,
            Self::U32 => u32::MAX,
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            Self::U8 => 8,
            Self::U16 => 16,
            Self::U32 => 32,
        }
    }
}

/// One row of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub code: RegionCode,
    pub name: &'a str,
    pub metric: Metric,
}

/// Three parallel columns of equal length, before a summary is attached.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Columns {
    codes: Vec<RegionCode>,
    names: Vec<String>,
    metric: Vec<Metric>,
}

impl Columns {
    /// Build columns from rows; lengths are equal by construction.
    pub fn from_rows<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = (RegionCode, S, Metric)>,
        S: Into<String>,
    {
        let mut columns = Self::default();
        for (code, name, metric) in rows {
            columns.codes.push(code);
            columns.names.push(name.into());
            columns.metric.push(metric);
        }
        columns
    }

    pub fn codes(&self) -> &[RegionCode] {
        &self.codes
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn metric(&self) -> &[Metric] {
        &self.metric
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Row view at `index`.
    pub fn record(&self, index: usize) -> Option<Record<'_>> {
        Some(Record {
            code: *self.codes.get(index)?,
            name: self.names.get(index)?,
            metric: *self.metric.get(index)?,
        })
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> + '_ {
        (0..self.len()).filter_map(move |i| self.record(i))
    }

    /// Replace one name, keeping every other column as is.
    pub(crate) fn with_name(mut self, index: usize, name: String) -> Self {
        if let Some(slot) = self.names.get_mut(index) {
            *slot = name;
        }
        self
    }

    /// Reorder all columns by the same permutation of row indices.
    pub(crate) fn permuted(&self, order: &[usize]) -> Self {
        debug_assert_eq!(order.len(), self.len());
        Self {
            codes: order.iter().map(|&i| self.codes[i]).collect(),
            names: order.iter().map(|&i| self.names[i].clone()).collect(),
            metric: order.iter().map(|&i| self.metric[i]).collect(),
        }
    }
}

/// Title and mean accompanying a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub title: String,
    pub mean: f64,
}

/// Sorted, summarized result of a pipeline run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    codes: Vec<RegionCode>,
    names: Vec<String>,
    metric: Vec<Metric>,
    summary: Summary,
}

impl Dataset {
    pub(crate) fn new(columns: Columns, summary: Summary) -> Self {
        let Columns {
            codes,
            names,
            metric,
        } = columns;
        Self {
            codes,
            names,
            metric,
            summary,
        }
    }

    pub fn codes(&self) -> &[RegionCode] {
        &self.codes
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn metric(&self) -> &[Metric] {
        &self.metric
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> + '_ {
        self.codes
            .iter()
            .zip(&self.names)
            .zip(&self.metric)
            .map(|((code, name), metric)| Record {
                code: *code,
                name,
                metric: *metric,
            })
    }

    /// Largest metric value, if any rows exist.
    pub fn max_metric(&self) -> Option<Metric> {
        self.metric.iter().copied().max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> RegionCode {
        s.parse().unwrap()
    }

    #[test]
    fn test_metric_width_limits() {
        assert_eq!(MetricWidth::U8.max_value(), 255);
        assert_eq!(MetricWidth::U16.max_value(), 65_535);
        assert_eq!(MetricWidth::U32.max_value(), u32::MAX);
        assert_eq!(MetricWidth::default(), MetricWidth::U16);
        assert_eq!(MetricWidth::U16.bits(), 16);
    }

    #[test]
    fn test_metric_width_serde() {
        let width: MetricWidth = serde_json::from_str("\"u32\"").unwrap();
        assert_eq!(width, MetricWidth::U32);
        assert_eq!(serde_json::to_string(&MetricWidth::U8).unwrap(), "\"u8\"");
    }

    #[test]
    fn test_columns_from_rows() {
        let columns = Columns::from_rows([(code("AT"), "Austria", 50), (code("BE"), "Belgium", 60)]);
        assert_eq!(columns.len(), 2);
        assert_eq!(columns.names(), ["Austria", "Belgium"]);
        assert_eq!(columns.metric(), [50, 60]);

        let record = columns.record(1).unwrap();
        assert_eq!(record.code, code("BE"));
        assert_eq!(record.name, "Belgium");
        assert!(columns.record(2).is_none());
    }

    #[test]
    fn test_permuted_keeps_rows_aligned() {
        let columns = Columns::from_rows([
            (code("AT"), "Austria", 50),
            (code("BE"), "Belgium", 60),
            (code("DE"), "Germany", 70),
        ]);
        let permuted = columns.permuted(&[2, 0, 1]);
        let rows: Vec<_> = permuted.records().map(|r| (r.code.to_string(), r.metric)).collect();
        assert_eq!(
            rows,
            vec![("DE".to_string(), 70), ("AT".to_string(), 50), ("BE".to_string(), 60)]
        );
        // Source untouched
        assert_eq!(columns.metric(), [50, 60, 70]);
    }

    #[test]
    fn test_dataset_serializes_columnar() {
        let columns = Columns::from_rows([(code("DE"), "Germany", 70)]);
        let dataset = Dataset::new(
            columns,
            Summary {
                title: "t".to_string(),
                mean: 70.0,
            },
        );
        let json = serde_json::to_value(&dataset).unwrap();
        assert_eq!(json["codes"][0], "DE");
        assert_eq!(json["names"][0], "Germany");
        assert_eq!(json["metric"][0], 70);
        assert_eq!(json["summary"]["mean"], 70.0);
        assert_eq!(dataset.max_metric(), Some(70));
    }
}
