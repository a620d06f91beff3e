//! Strip the trailing annotation from one designated region's label.
//!
//! Upstream labels one region as e.g. "Germany (until 1990 former territory
//! of the FRG)". Only that region is touched, even if other labels happen to
//! carry a similar suffix.

use crate::dataset::Columns;
use crate::region::RegionCode;
use regex::Regex;
use std::sync::LazyLock;

static TRAILING_ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" \([a-zA-Z0-9 ]*\)$").expect("annotation pattern is valid"));

/// Remove trailing ` (...)` annotations from a label.
///
/// Repeats until no annotation remains, so applying it twice is the same as
/// applying it once.
pub fn strip_annotation(name: &str) -> String {
    let mut cleaned = name.to_string();
    while let Some(found) = TRAILING_ANNOTATION.find(&cleaned) {
        cleaned.truncate(found.start());
    }
    cleaned
}

/// Return columns with the designated region's label cleaned.
///
/// A no-op when the region is not present.
pub fn clean(columns: Columns, target: RegionCode) -> Columns {
    let Some(index) = columns.codes().iter().position(|c| *c == target) else {
        tracing::debug!("Region {} not in dataset, nothing to clean", target);
        return columns;
    };

    let original = &columns.names()[index];
    let cleaned = strip_annotation(original);
    if cleaned == *original {
        return columns;
    }

    tracing::debug!("Cleaned label of {}: '{}' -> '{}'", target, original, cleaned);
    columns.with_name(index, cleaned)
}
