//! Region codes and the fixed, ordered set of regions a run reports on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// EEA member countries without Liechtenstein, in reporting order.
pub const EEA_CODES: [&str; 31] = [
    "AT", "BE", "BG", "HR", "CY", "CZ", "DK", "EE", "FI", "FR", "DE", "EL", "HU", "IS", "IE", "IT",
    "LV", "LT", "LU", "MT", "NL", "NO", "PL", "PT", "RO", "SK", "SI", "ES", "SE", "CH", "UK",
];

/// Two-letter uppercase region identifier (Eurostat flavour of ISO 3166-1 alpha-2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegionCode([u8; 2]);

impl RegionCode {
    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII uppercase bytes are ever stored.
        std::str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl FromStr for RegionCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.as_bytes() {
            [a, b] if a.is_ascii_uppercase() && b.is_ascii_uppercase() => Ok(Self([*a, *b])),
            _ => anyhow::bail!("Invalid region code '{}': expected two uppercase letters", s),
        }
    }
}

impl TryFrom<String> for RegionCode {
    type Error = anyhow::Error;

    fn try_from(value: String) -> anyhow::Result<Self> {
        value.parse()
    }
}

impl From<RegionCode> for String {
    fn from(code: RegionCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered, duplicate-free set of regions.
///
/// The order is the pre-sort row order of every dataset built from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSet {
    codes: Vec<RegionCode>,
}

impl RegionSet {
    /// Build a set from codes, rejecting duplicates and empty input.
    pub fn new(codes: Vec<RegionCode>) -> anyhow::Result<Self> {
        if codes.is_empty() {
            anyhow::bail!("Region set must contain at least one code");
        }
        for (i, code) in codes.iter().enumerate() {
            if codes[..i].contains(code) {
                anyhow::bail!("Duplicate region code {} in region set", code);
            }
        }
        Ok(Self { codes })
    }

    /// Parse a set from string codes.
    pub fn parse<S: AsRef<str>>(codes: &[S]) -> anyhow::Result<Self> {
        let parsed = codes
            .iter()
            .map(|c| c.as_ref().parse())
            .collect::<anyhow::Result<Vec<RegionCode>>>()?;
        Self::new(parsed)
    }

    /// The default EEA set.
    pub fn eea() -> Self {
        Self {
            codes: EEA_CODES
                .iter()
                .map(|c| RegionCode([c.as_bytes()[0], c.as_bytes()[1]]))
                .collect(),
        }
    }

    pub fn codes(&self) -> &[RegionCode] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn contains(&self, code: &RegionCode) -> bool {
        self.codes.contains(code)
    }

    /// Position of a code within the set.
    pub fn position(&self, code: &RegionCode) -> Option<usize> {
        self.codes.iter().position(|c| c == code)
    }
}

impl Default for RegionSet {
    fn default() -> Self {
        Self::eea()
    }
}
