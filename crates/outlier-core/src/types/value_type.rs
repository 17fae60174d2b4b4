//! Value and aggregation types attached to a data item.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared value type of a data item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    Number,
    Integer,
    IntegerPositive,
    IntegerNegative,
    IntegerZeroOrPositive,
    Percentage,
    UnitInterval,
    Text,
    LongText,
    Boolean,
    TrueOnly,
    Date,
}

impl ValueType {
    /// Whether values of this type are stored as decimal text.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Number
                | Self::Integer
                | Self::IntegerPositive
                | Self::IntegerNegative
                | Self::IntegerZeroOrPositive
                | Self::Percentage
                | Self::UnitInterval
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Number => "NUMBER",
            Self::Integer => "INTEGER",
            Self::IntegerPositive => "INTEGER_POSITIVE",
            Self::IntegerNegative => "INTEGER_NEGATIVE",
            Self::IntegerZeroOrPositive => "INTEGER_ZERO_OR_POSITIVE",
            Self::Percentage => "PERCENTAGE",
            Self::UnitInterval => "UNIT_INTERVAL",
            Self::Text => "TEXT",
            Self::LongText => "LONG_TEXT",
            Self::Boolean => "BOOLEAN",
            Self::TrueOnly => "TRUE_ONLY",
            Self::Date => "DATE",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How values of a data item aggregate across periods and org units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregationType {
    #[default]
    Sum,
    Average,
    AverageSumOrgUnit,
    Count,
    Min,
    Max,
    None,
}

impl AggregationType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sum => "SUM",
            Self::Average => "AVERAGE",
            Self::AverageSumOrgUnit => "AVERAGE_SUM_ORG_UNIT",
            Self::Count => "COUNT",
            Self::Min => "MIN",
            Self::Max => "MAX",
            Self::None => "NONE",
        }
    }
}

impl fmt::Display for AggregationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
