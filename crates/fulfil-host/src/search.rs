//! Saved-search contract

use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Filter operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// Exact text match against the single value
    Is,
    /// Match any of the values
    AnyOf,
    /// Text prefix match
    StartsWith,
}

/// One search filter; all filters of a query must hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub operator: Operator,
    pub values: Vec<String>,
}

impl Filter {
    pub fn is(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: Operator::Is,
            values: vec![value.into()],
        }
    }

    pub fn any_of(field: impl Into<String>, values: impl IntoIterator<Item = String>) -> Self {
        Self {
            field: field.into(),
            operator: Operator::AnyOf,
            values: values.into_iter().collect(),
        }
    }

    pub fn starts_with(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: Operator::StartsWith,
            values: vec![value.into()],
        }
    }

    /// Evaluate the filter against a text value
    #[must_use]
    pub fn matches(&self, value: Option<&str>) -> bool {
        let Some(value) = value else {
            return false;
        };
        match self.operator {
            Operator::Is | Operator::AnyOf => self.values.iter().any(|v| v == value),
            Operator::StartsWith => self.values.iter().any(|v| value.starts_with(v.as_str())),
        }
    }
}

/// Result column, optionally read through a join
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            join: None,
        }
    }

    pub fn joined(name: impl Into<String>, join: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            join: Some(join.into()),
        }
    }

    /// Key of the column in a result row: `join.name` or `name`
    #[must_use]
    pub fn key(&self) -> String {
        match &self.join {
            Some(join) => format!("{join}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

/// A search over one record type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub record_type: String,
    pub filters: Vec<Filter>,
    pub columns: Vec<Column>,
    pub max_results: Option<usize>,
}

impl SearchQuery {
    pub fn new(record_type: impl Into<String>) -> Self {
        Self {
            record_type: record_type.into(),
            filters: Vec::new(),
            columns: Vec::new(),
            max_results: None,
        }
    }

    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use]
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    #[must_use]
    pub fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }
}

/// One result row keyed by [`Column::key`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchRow {
    pub values: BTreeMap<String, Value>,
}

impl SearchRow {
    pub fn new(values: BTreeMap<String, Value>) -> Self {
        Self { values }
    }

    /// Raw value of a column
    #[must_use]
    pub fn get(&self, column: &Column) -> Option<&Value> {
        self.values.get(&column.key())
    }

    /// Value of a column rendered as text, `None` when absent or empty
    #[must_use]
    pub fn text(&self, column: &Column) -> Option<String> {
        self.get(column).and_then(fulfil_model::record::text)
    }
}

/// Runs searches against the host
pub trait Search {
    /// Rows matching every filter, in host order, truncated to
    /// `max_results` when set
    ///
    /// # Errors
    ///
    /// Returns an error when the search cannot be executed.
    fn search(&self, query: &SearchQuery) -> Result<Vec<SearchRow>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_operators() {
        assert!(Filter::is("code", "A").matches(Some("A")));
        assert!(!Filter::is("code", "A").matches(Some("AB")));
        assert!(Filter::any_of("id", vec!["1".to_string(), "2".to_string()]).matches(Some("2")));
        assert!(Filter::starts_with("binnumber", "A-0").matches(Some("A-01")));
        assert!(!Filter::starts_with("binnumber", "B").matches(Some("A-01")));
        assert!(!Filter::is("code", "A").matches(None));
    }

    #[test]
    fn test_column_keys() {
        assert_eq!(Column::new("internalid").key(), "internalid");
        assert_eq!(
            Column::joined("custrecord_pe_ubigeo", "Address").key(),
            "Address.custrecord_pe_ubigeo"
        );
    }

    #[test]
    fn test_row_text() {
        let row: SearchRow = serde_json::from_value(serde_json::json!({
            "internalid": 301,
            "Address.custrecord_pe_ubigeo": ""
        }))
        .unwrap();

        assert_eq!(row.text(&Column::new("internalid")), Some("301".to_string()));
        assert!(row.text(&Column::joined("custrecord_pe_ubigeo", "Address")).is_none());
    }
}
