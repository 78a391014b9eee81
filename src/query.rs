//! Declarative report queries.
//!
//! A [`QuerySpec`] holds the pieces of a SELECT statement as separate fields
//! so that a filter predicate can be spliced in structurally: the WHERE
//! clause (if any) is known at construction, and GROUP BY / ORDER BY / LIMIT
//! always follow the predicate regardless of how the spec was written.

use std::collections::HashSet;

use crate::error::{DashboardError, Result};

/// How a filter value is compared against its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMatch {
    /// `column IN (:p0, :p1, ...)`, values bound as integers.
    Equals,
    /// `(column LIKE '%' || :p0 || '%' OR ...)`, values bound as text.
    /// Covers date columns stored as free-form text.
    Contains,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterTarget {
    name: String,
    column: String,
    matching: FilterMatch,
}
impl FilterTarget {
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn column(&self) -> &str {
        &self.column
    }
    pub fn matching(&self) -> FilterMatch {
        self.matching
    }
}

#[derive(Debug, Clone)]
pub struct QuerySpec {
    id: String,
    base_statement: String,
    where_clause: Option<String>,
    filters: Vec<FilterTarget>,
    group_by: Option<String>,
    default_order: Option<String>,
    row_limit: Option<u32>,
}

impl QuerySpec {
    /// `base_statement` is the SELECT ... FROM ... [JOIN ...] part only.
    pub fn new(id: &str, base_statement: &str) -> Self {
        Self {
            id: id.to_string(),
            base_statement: base_statement.trim().trim_end_matches(';').trim_end().to_string(),
            where_clause: None,
            filters: Vec::new(),
            group_by: None,
            default_order: None,
            row_limit: None,
        }
    }
    pub fn with_where(mut self, clause: &str) -> Self {
        self.where_clause = Some(clause.trim().to_string());
        self
    }
    pub fn filter_on(mut self, name: &str, column: &str, matching: FilterMatch) -> Self {
        self.filters.push(FilterTarget {
            name: name.to_string(),
            column: column.to_string(),
            matching,
        });
        self
    }
    pub fn group_by(mut self, columns: &str) -> Self {
        self.group_by = Some(columns.trim().to_string());
        self
    }
    pub fn order_by(mut self, order: &str) -> Self {
        self.default_order = Some(order.trim().to_string());
        self
    }
    pub fn limit(mut self, rows: u32) -> Self {
        self.row_limit = Some(rows);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn base_statement(&self) -> &str {
        &self.base_statement
    }
    pub fn has_where(&self) -> bool {
        self.where_clause.is_some()
    }
    pub fn row_limit(&self) -> Option<u32> {
        self.row_limit
    }
    pub fn allowed_filters(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(|f| f.name())
    }
    pub fn target(&self, filter: &str) -> Option<&FilterTarget> {
        self.filters.iter().find(|f| f.name == filter)
    }

    /// Checks the construction-time invariants. Called when a page is built.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(DashboardError::Config("query spec id must not be empty".into()));
        }
        if self.base_statement.is_empty() {
            return Err(DashboardError::Config(format!("query spec '{}' has an empty statement", self.id)));
        }
        if self.row_limit == Some(0) {
            return Err(DashboardError::Config(format!("query spec '{}' has a zero row limit", self.id)));
        }
        let mut seen = HashSet::new();
        for f in &self.filters {
            // filter names become placeholder names
            if f.name.is_empty() || !f.name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(DashboardError::Config(format!(
                    "query spec '{}' has an invalid filter name '{}'",
                    self.id, f.name
                )));
            }
            if !seen.insert(f.name.as_str()) {
                return Err(DashboardError::Config(format!(
                    "query spec '{}' declares filter '{}' twice",
                    self.id, f.name
                )));
            }
        }
        Ok(())
    }

    /// Renders the statement text with an optional extra predicate placed
    /// after the static WHERE clause and before any trailing clause.
    pub(crate) fn assemble(&self, predicate: Option<&str>) -> String {
        let mut sql = self.base_statement.clone();
        match (&self.where_clause, predicate) {
            (Some(w), Some(p)) => {
                sql.push_str(&format!("\nWHERE ({}) AND {}", w, p));
            }
            (Some(w), None) => {
                sql.push_str(&format!("\nWHERE {}", w));
            }
            (None, Some(p)) => {
                sql.push_str(&format!("\nWHERE {}", p));
            }
            (None, None) => (),
        }
        if let Some(g) = &self.group_by {
            sql.push_str(&format!("\nGROUP BY {}", g));
        }
        if let Some(o) = &self.default_order {
            sql.push_str(&format!("\nORDER BY {}", o));
        }
        if let Some(l) = self.row_limit {
            sql.push_str(&format!("\nLIMIT {}", l));
        }
        sql
    }
}
