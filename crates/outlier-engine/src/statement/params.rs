//! Placeholder names and bound parameter values.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Named placeholders a processor may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Placeholder {
    DataElementIds,
    StartDate,
    EndDate,
    DataStartDate,
    DataEndDate,
    Threshold,
    MaxResults,
}

impl Placeholder {
    /// Binding key, without the leading colon.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DataElementIds => "data_element_ids",
            Self::StartDate => "start_date",
            Self::EndDate => "end_date",
            Self::DataStartDate => "data_start_date",
            Self::DataEndDate => "data_end_date",
            Self::Threshold => "threshold",
            Self::MaxResults => "max_results",
        }
    }

    /// Reference as written in query text, e.g. `:start_date`.
    pub fn sql(&self) -> String {
        format!(":{}", self.name())
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.name())
    }
}

/// A value bound to a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ParamValue {
    Text(String),
    /// Expanded element-wise when rendered positionally.
    TextList(Vec<String>),
    Date(NaiveDate),
    Real(f64),
    Integer(i64),
}

impl From<NaiveDate> for ParamValue {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        Self::TextList(values)
    }
}
