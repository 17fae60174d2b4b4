//! Warehouse table names.
//!
//! Names are spliced into generated statements as identifiers, so they are
//! validated against a strict identifier grammar before use.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_ANALYTICS_TABLE;
use crate::errors::ConfigError;

/// Schema and table names of the data warehouse.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct TablesConfig {
    /// Schema prefix. Unqualified names when unset.
    pub schema: Option<String>,
    pub data_value: Option<String>,
    pub period: Option<String>,
    pub period_type: Option<String>,
    pub org_unit: Option<String>,
    pub data_element: Option<String>,
    pub category_option_combo: Option<String>,
    pub min_max: Option<String>,
    pub analytics: Option<String>,
}

impl TablesConfig {
    pub fn data_value(&self) -> String {
        self.qualify(self.data_value.as_deref().unwrap_or("datavalue"))
    }

    pub fn period(&self) -> String {
        self.qualify(self.period.as_deref().unwrap_or("period"))
    }

    pub fn period_type(&self) -> String {
        self.qualify(self.period_type.as_deref().unwrap_or("periodtype"))
    }

    pub fn org_unit(&self) -> String {
        self.qualify(self.org_unit.as_deref().unwrap_or("organisationunit"))
    }

    pub fn data_element(&self) -> String {
        self.qualify(self.data_element.as_deref().unwrap_or("dataelement"))
    }

    pub fn category_option_combo(&self) -> String {
        self.qualify(
            self.category_option_combo
                .as_deref()
                .unwrap_or("categoryoptioncombo"),
        )
    }

    pub fn min_max(&self) -> String {
        self.qualify(self.min_max.as_deref().unwrap_or("minmaxdataelement"))
    }

    pub fn analytics(&self) -> String {
        self.qualify(self.analytics.as_deref().unwrap_or(DEFAULT_ANALYTICS_TABLE))
    }

    /// Every explicitly configured name, keyed by its config field.
    pub fn configured_names(&self) -> Vec<(&'static str, &str)> {
        [
            ("tables.schema", self.schema.as_deref()),
            ("tables.data_value", self.data_value.as_deref()),
            ("tables.period", self.period.as_deref()),
            ("tables.period_type", self.period_type.as_deref()),
            ("tables.org_unit", self.org_unit.as_deref()),
            ("tables.data_element", self.data_element.as_deref()),
            (
                "tables.category_option_combo",
                self.category_option_combo.as_deref(),
            ),
            ("tables.min_max", self.min_max.as_deref()),
            ("tables.analytics", self.analytics.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, name)| name.map(|n| (field, n)))
        .collect()
    }

    /// Reject any configured name that is not a plain SQL identifier.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, name) in self.configured_names() {
            if !identifier_regex().is_match(name) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: format!("'{name}' is not a plain SQL identifier"),
                });
            }
        }
        Ok(())
    }

    fn qualify(&self, table: &str) -> String {
        match self.schema.as_deref() {
            Some(schema) => format!("{schema}.{table}"),
            None => table.to_string(),
        }
    }
}

fn identifier_regex() -> &'static Regex {
    static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    IDENTIFIER.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_injected_names() {
        let tables = TablesConfig {
            data_value: Some("datavalue dv; delete from period --".to_string()),
            ..TablesConfig::default()
        };
        let err = tables.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::ValidationFailed { ref field, .. } if field == "tables.data_value")
        );

        let tables = TablesConfig {
            schema: Some("dw.x".to_string()),
            ..TablesConfig::default()
        };
        assert!(tables.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_defaults_and_plain_names() {
        assert!(TablesConfig::default().validate().is_ok());
        let tables = TablesConfig {
            schema: Some("warehouse".to_string()),
            analytics: Some("analytics_2024".to_string()),
            ..TablesConfig::default()
        };
        assert!(tables.validate().is_ok());
        assert_eq!(tables.analytics(), "warehouse.analytics_2024");
    }
}
