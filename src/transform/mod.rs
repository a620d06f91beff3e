//! Pure transformation stages: reshape, clean, sort, summarize.
//!
//! Each stage takes a value and returns a new one; nothing is mutated in
//! place across stages.

mod clean;
mod reshape;
mod sort;
mod summary;

pub use clean::{clean, strip_annotation};
pub use reshape::{reshape, to_metric};
pub use sort::sort_descending;
pub use summary::{arithmetic_mean, summarize};
