//! The statement handed to the external executor.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use outlier_core::errors::StatementError;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use super::params::{ParamValue, Placeholder};

/// Query text with named placeholders and the values bound to them.
///
/// Every placeholder in `sql` has exactly one entry in `params`, and every
/// entry is referenced by the text. The empty statement has no text and no
/// bindings; it is what a missing request generates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeneratedStatement {
    sql: String,
    params: BTreeMap<String, ParamValue>,
}

/// Statement rewritten to `$n` positional parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionalStatement {
    pub sql: String,
    pub values: Vec<ParamValue>,
}

impl GeneratedStatement {
    pub fn new(sql: String, params: BTreeMap<String, ParamValue>) -> Self {
        Self { sql, params }
    }

    /// The statement generated for a missing request.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &BTreeMap<String, ParamValue> {
        &self.params
    }

    pub fn param(&self, placeholder: Placeholder) -> Option<&ParamValue> {
        self.params.get(placeholder.name())
    }

    pub fn into_parts(self) -> (String, BTreeMap<String, ParamValue>) {
        (self.sql, self.params)
    }

    /// Distinct placeholder names in order of first appearance.
    /// PostgreSQL `::type` casts are not placeholders.
    pub fn placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for caps in placeholder_regex().captures_iter(&self.sql) {
            let name = &caps[2];
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }

    /// Rewrite named placeholders into `$1..$n` form for drivers without
    /// named parameter support. List bindings expand to one positional
    /// parameter per element; a repeated name reuses its positions.
    pub fn to_positional(&self) -> Result<PositionalStatement, StatementError> {
        let mut values: Vec<ParamValue> = Vec::new();
        let mut rendered: BTreeMap<String, String> = BTreeMap::new();

        for name in self.placeholders() {
            let value = self
                .params
                .get(&name)
                .ok_or_else(|| StatementError::UnboundPlaceholder { name: name.clone() })?;

            let replacement = match value {
                ParamValue::TextList(items) => {
                    if items.is_empty() {
                        return Err(StatementError::EmptyList { name });
                    }
                    let positions: Vec<String> = items
                        .iter()
                        .map(|item| {
                            values.push(ParamValue::Text(item.clone()));
                            format!("${}", values.len())
                        })
                        .collect();
                    positions.join(", ")
                }
                scalar => {
                    values.push(scalar.clone());
                    format!("${}", values.len())
                }
            };
            rendered.insert(name, replacement);
        }

        let sql = placeholder_regex()
            .replace_all(&self.sql, |caps: &Captures| {
                format!("{}{}", &caps[1], rendered[&caps[2]])
            })
            .into_owned();

        Ok(PositionalStatement { sql, values })
    }
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"(^|[^:]):([a-z_][a-z0-9_]*)").expect("placeholder pattern is valid")
    })
}
