//! Operator Resolution Table.
//!
//! Maps `(type-category, symbol)` to a template with exactly two levels:
//! the exact category, then `default`. There is no inheritance chain between
//! categories, so a category never has to guess which of several parents
//! wins.

use rustc_hash::FxHashMap;

use crate::error::{RenderError, DEFAULT_CATEGORY};
use crate::fragment::{Separators, Template};
use crate::loader::{self, OperatorSource};

/// Every symbol an operator file may define.
pub const OPERATOR_SYMBOLS: &[&str] = &[
    // Binary
    "+", "-", "*", "/", "%", "==", "!=", "<", ">", "<=", ">=", "&&", "||", "&", "|", "^", "<<", ">>",
    // Unary
    "!", "~", "neg",
    // Expression forms
    "paren", "cast", "id_ref", "id_val", "lit", "sizeof", "isnull",
];

/// Entry for one symbol under one category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OpEntry {
    Template(Template),
    /// Explicitly defer to the `default` entry.
    InheritDefault,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OperatorTable {
    categories: FxHashMap<String, FxHashMap<String, OpEntry>>,
}

impl OperatorTable {
    /// Load an operator file and check coverage.
    pub fn parse(file: &str, source: &str, separators: &Separators) -> Result<Self, RenderError> {
        let entries = loader::read_operators(file, source)?;
        Self::from_sources(file, entries, separators)
    }

    pub fn from_sources(
        file: &str,
        entries: impl IntoIterator<Item = OperatorSource>,
        separators: &Separators,
    ) -> Result<Self, RenderError> {
        let mut table = OperatorTable::default();
        for entry in entries {
            let key = format!("{}.{}", entry.category, entry.symbol);
            let op = match &entry.body {
                Some(body) => OpEntry::Template(Template::parse(&key, body, separators)?),
                None if entry.category == DEFAULT_CATEGORY => {
                    return Err(RenderError::malformed(
                        file,
                        entry.offset,
                        format!("`{key}` cannot inherit from itself"),
                    ));
                }
                None => OpEntry::InheritDefault,
            };
            let symbols = table.categories.entry(entry.category).or_default();
            if symbols.insert(entry.symbol, op).is_some() {
                return Err(RenderError::malformed(
                    file,
                    entry.offset,
                    format!("duplicate operator `{key}`"),
                ));
            }
        }
        table.check_coverage(file)?;
        Ok(table)
    }

    /// Every symbol mentioned under a specific category must also exist under
    /// `default`, so fallback can never miss.
    fn check_coverage(&self, file: &str) -> Result<(), RenderError> {
        let defaults = self.categories.get(DEFAULT_CATEGORY);
        let mut missing: Vec<String> = self
            .categories
            .iter()
            .filter(|(category, _)| category.as_str() != DEFAULT_CATEGORY)
            .flat_map(|(category, symbols)| {
                symbols
                    .keys()
                    .filter(move |symbol| {
                        !defaults.is_some_and(|d| d.contains_key(symbol.as_str()))
                    })
                    .map(move |symbol| format!("{category}.{symbol}"))
            })
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        missing.sort();
        Err(RenderError::malformed(
            file,
            0,
            format!("no `default` entry for {}", missing.join(", ")),
        ))
    }

    /// Resolve `(category, symbol)`: exact category first, then `default`.
    pub fn resolve(&self, category: &str, symbol: &str) -> Result<&Template, RenderError> {
        if category.is_empty() {
            return Err(RenderError::UnresolvedOperator {
                category: String::new(),
                symbol: symbol.to_string(),
            });
        }
        if let Some(OpEntry::Template(template)) = self.entry(category, symbol) {
            return Ok(template);
        }
        if category != DEFAULT_CATEGORY {
            tracing::trace!(category, symbol, "operator falls back to default");
        }
        match self.entry(DEFAULT_CATEGORY, symbol) {
            Some(OpEntry::Template(template)) => Ok(template),
            _ => Err(RenderError::UnresolvedOperator {
                category: category.to_string(),
                symbol: symbol.to_string(),
            }),
        }
    }

    pub fn entry(&self, category: &str, symbol: &str) -> Option<&OpEntry> {
        self.categories.get(category)?.get(symbol)
    }

    /// Categories with at least one entry, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<_> = self.categories.keys().map(String::as_str).collect();
        out.sort_unstable();
        out
    }

    /// Total number of entries across all categories.
    pub fn len(&self) -> usize {
        self.categories.values().map(|symbols| symbols.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
