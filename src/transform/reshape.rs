//! Reshape a raw response into region-ordered columns.

use crate::dataset::{Columns, Metric, MetricWidth};
use crate::error::{DataUnavailable, Result};
use crate::region::{RegionCode, RegionSet};
use crate::source::RawDataset;

/// Build columns in region-set order from a raw response.
///
/// Every region must have an index entry, a label and a non-null value;
/// otherwise the whole reshape fails rather than producing holes.
pub fn reshape(raw: &RawDataset, regions: &RegionSet, width: MetricWidth) -> Result<Columns> {
    let category = raw.geo();

    let rows = regions
        .codes()
        .iter()
        .map(|&code| {
            let position = category
                .index
                .position(code.as_str())
                .ok_or_else(|| missing(code, "index"))?;
            let name = category
                .label
                .get(code.as_str())
                .ok_or_else(|| missing(code, "label"))?;
            let value = raw.value.get(position).ok_or_else(|| missing(code, "value"))?;

            Ok((code, name.clone(), to_metric(code, value, width)?))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Columns::from_rows(rows))
}

/// Convert a raw observation to a metric.
///
/// Fractional values are truncated toward zero. Negative, non-finite and
/// out-of-range values are rejected.
pub fn to_metric(code: RegionCode, value: f64, width: MetricWidth) -> Result<Metric> {
    let invalid = |reason: String| DataUnavailable::InvalidValue {
        code: code.to_string(),
        value,
        reason,
    };

    if !value.is_finite() {
        return Err(invalid("not a finite number".to_string()));
    }
    if value < 0.0 {
        return Err(invalid("negative".to_string()));
    }

    let truncated = value.trunc();
    if truncated > width.max_value() as f64 {
        return Err(invalid(format!(
            "exceeds the {}-bit metric range (max {})",
            width.bits(),
            width.max_value()
        )));
    }

    Ok(truncated as Metric)
}

fn missing(code: RegionCode, field: &'static str) -> DataUnavailable {
    DataUnavailable::MissingRegion {
        code: code.to_string(),
        field,
    }
}
