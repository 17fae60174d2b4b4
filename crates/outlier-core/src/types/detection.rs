//! Detection selectors: algorithm, detection kind, data source, ordering.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Statistical algorithm used by the Z-score family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Algorithm {
    /// Mean and population standard deviation.
    #[default]
    ZScore,
    /// Median and normal-consistent median absolute deviation.
    ModifiedZScore,
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ZScore => "Z_SCORE",
            Self::ModifiedZScore => "MODIFIED_Z_SCORE",
        }
    }

    /// Parse from the canonical name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "Z_SCORE" => Some(Self::ZScore),
            "MODIFIED_Z_SCORE" | "MOD_Z_SCORE" => Some(Self::ModifiedZScore),
            _ => None,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Detection kind. Selected independently of [`Algorithm`], which only
/// applies to `Statistical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetectionKind {
    #[default]
    Statistical,
    /// Range check against stored min-max bounds.
    MinMax,
    /// Structural check of the stored value text.
    InvalidNumeric,
}

impl DetectionKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Statistical => "STATISTICAL",
            Self::MinMax => "MIN_MAX",
            Self::InvalidNumeric => "INVALID_NUMERIC",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "STATISTICAL" => Some(Self::Statistical),
            "MIN_MAX" => Some(Self::MinMax),
            "INVALID_NUMERIC" => Some(Self::InvalidNumeric),
            _ => None,
        }
    }
}

impl fmt::Display for DetectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Physical layout the statement reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSource {
    /// Row-oriented transactional fact table.
    #[default]
    RawDataValues,
    /// Pre-aggregated fact table with denormalized display metadata.
    PreAggregated,
}

impl DataSource {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RawDataValues => "RAW_DATA_VALUES",
            Self::PreAggregated => "PRE_AGGREGATED",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "RAW_DATA_VALUES" | "RAW" => Some(Self::RawDataValues),
            "PRE_AGGREGATED" | "ANALYTICS" => Some(Self::PreAggregated),
            _ => None,
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Primary sort column of the generated statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderBy {
    /// Absolute deviation from the center (or boundary distance).
    #[default]
    AbsDev,
    /// Score column of the active algorithm.
    ZScore,
    /// Mean or median.
    MiddleValue,
    /// Standard deviation or scaled MAD.
    Spread,
    /// Reported value.
    Value,
}

impl OrderBy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AbsDev => "ABS_DEV",
            Self::ZScore => "Z_SCORE",
            Self::MiddleValue => "MIDDLE_VALUE",
            Self::Spread => "SPREAD",
            Self::Value => "VALUE",
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// SQL keyword for this direction.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}
