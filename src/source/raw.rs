//! JSON-stat response model.
//!
//! Only the `geo` dimension and the flat value array are read; every other
//! field of the response is ignored.

use crate::error::Result;
use serde::Deserialize;
use std::collections::HashMap;

/// Response from the statistics API.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDataset {
    pub dimension: Dimensions,
    pub value: Values,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Dimensions {
    pub geo: Dimension,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Dimension {
    pub category: Category,
}

/// Category labels and the mapping from code to flat-array position.
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub label: HashMap<String, String>,
    pub index: CategoryIndex,
}

/// JSON-stat allows the index as a `{code: position}` object or as an
/// array of codes where the array position is the value position.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CategoryIndex {
    Map(HashMap<String, usize>),
    List(Vec<String>),
}

impl CategoryIndex {
    /// Flat-array position of a code.
    pub fn position(&self, code: &str) -> Option<usize> {
        match self {
            Self::Map(map) => map.get(code).copied(),
            Self::List(codes) => codes.iter().position(|c| c == code),
        }
    }
}

/// Observation values, dense (array) or sparse (`{"position": value}`).
/// Missing observations may appear as `null`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Values {
    Dense(Vec<Option<f64>>),
    Sparse(HashMap<String, Option<f64>>),
}

impl Values {
    /// Value at a flat-array position, if present and not null.
    pub fn get(&self, position: usize) -> Option<f64> {
        match self {
            Self::Dense(values) => values.get(position).copied().flatten(),
            Self::Sparse(values) => values.get(&position.to_string()).copied().flatten(),
        }
    }
}

impl RawDataset {
    /// Parse a response body.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Category of the `geo` dimension.
    pub fn geo(&self) -> &Category {
        &self.dimension.geo.category
    }
}
