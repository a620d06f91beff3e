//! Remote dataset retrieval: timed HTTP fetch and the raw response model.

mod fetch;
mod raw;

pub use fetch::{race_timeout, HttpSource};
#[cfg(test)]
pub(crate) use fetch::refused_base_url;
pub use raw::{Category, CategoryIndex, RawDataset, Values};
