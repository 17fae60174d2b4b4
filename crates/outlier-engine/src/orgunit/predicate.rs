//! Path Predicate Builder.
//!
//! Renders "row lies at or below one of the selected units" as an
//! OR-combination of per-unit path tests. Paths are structural identifiers,
//! so they are embedded as literals instead of bound parameters.

use std::collections::BTreeSet;
use std::fmt;

use outlier_core::errors::RequestError;
use outlier_core::traits::OrgUnitHierarchy;
use outlier_core::types::OrgUnitUid;

use crate::request::OrgUnit;

/// A rendered containment filter fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrgUnitPathPredicate {
    fragment: String,
    unit_count: usize,
}

impl OrgUnitPathPredicate {
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Number of distinct paths combined into the fragment.
    pub fn unit_count(&self) -> usize {
        self.unit_count
    }
}

impl fmt::Display for OrgUnitPathPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fragment)
    }
}

/// Builds [`OrgUnitPathPredicate`]s against one path column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPredicateBuilder {
    column: String,
}

impl PathPredicateBuilder {
    /// `column` is the qualified path column, e.g. `ou.path`.
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }

    /// Render the fragment for `units`.
    ///
    /// Paths are sorted and deduplicated first, so the same set yields the
    /// same text in any construction order. An empty set renders `false`.
    pub fn build<'a, I>(&self, units: I) -> OrgUnitPathPredicate
    where
        I: IntoIterator<Item = &'a OrgUnit>,
    {
        self.build_paths(units.into_iter().map(OrgUnit::path))
    }

    /// Resolve `uids` through the hierarchy provider and render their
    /// fragment. Paths are read once and not retained.
    pub fn build_from_hierarchy<H, I, U>(
        &self,
        hierarchy: &H,
        uids: I,
    ) -> Result<OrgUnitPathPredicate, RequestError>
    where
        H: OrgUnitHierarchy + ?Sized,
        I: IntoIterator<Item = U>,
        U: Into<OrgUnitUid>,
    {
        let mut units = Vec::new();
        for uid in uids {
            let uid = uid.into();
            let record = hierarchy
                .org_unit(&uid)
                .map_err(|e| RequestError::hierarchy_lookup(uid.as_str(), &e))?
                .ok_or_else(|| RequestError::UnknownOrgUnit {
                    uid: uid.as_str().to_string(),
                })?;
            units.push(OrgUnit::from_record(record)?);
        }
        Ok(self.build(&units))
    }

    fn build_paths<'a>(&self, paths: impl Iterator<Item = &'a str>) -> OrgUnitPathPredicate {
        let paths: BTreeSet<&str> = paths.collect();
        if paths.is_empty() {
            return OrgUnitPathPredicate {
                fragment: "false".to_string(),
                unit_count: 0,
            };
        }

        let tests: Vec<String> = paths
            .iter()
            .map(|path| {
                format!(
                    "({col} = '{eq}' or {col} like '{prefix}/%')",
                    col = self.column,
                    eq = quote_literal(path),
                    prefix = quote_literal(&escape_like(path)),
                )
            })
            .collect();

        OrgUnitPathPredicate {
            fragment: format!("({})", tests.join(" or ")),
            unit_count: paths.len(),
        }
    }
}

/// Double single quotes for a SQL string literal.
fn quote_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Escape LIKE wildcards with the default backslash escape.
fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
