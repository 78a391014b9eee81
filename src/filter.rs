//! Turning user filter input into bound predicates.
//!
//! The only user-controlled text in a render cycle is the raw filter input.
//! It is parsed into a closed token grammar (four digit years) and every
//! surviving token travels as a bind parameter. No token is ever written into
//! statement text.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::datatype::Value;
use crate::query::{FilterMatch, QuerySpec};

lazy_static! {
    static ref YEAR: Regex = Regex::new(r"^[0-9]{4}$").unwrap();
}

/// Name of the year filter, the one filter the dashboard exposes.
pub const YEAR_FILTER: &str = "year";

/// Parsed filter input for one render cycle.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FilterState {
    name: String,
    raw_input: String,
    values: Vec<String>,
    rejected: Vec<String>,
}

impl FilterState {
    /// Trims, splits on commas, drops empty tokens and keeps only four digit
    /// years (first occurrence wins). Anything else lands in `rejected`.
    pub fn parse(name: &str, raw_input: &str) -> Self {
        let mut values: Vec<String> = Vec::new();
        let mut rejected = Vec::new();
        for token in raw_input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if YEAR.is_match(token) {
                if !values.iter().any(|v| v == token) {
                    values.push(token.to_string());
                }
            } else {
                debug!(filter = name, token, "dropping invalid filter token");
                rejected.push(token.to_string());
            }
        }
        Self { name: name.to_string(), raw_input: raw_input.to_string(), values, rejected }
    }
    pub fn years(raw_input: &str) -> Self {
        Self::parse(YEAR_FILTER, raw_input)
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }
    pub fn values(&self) -> &[String] {
        &self.values
    }
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A statement ready for execution together with its bind parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundQuery {
    id: String,
    statement: String,
    parameters: Vec<(String, Value)>,
}

impl BoundQuery {
    pub fn new(id: &str, statement: String, parameters: Vec<(String, Value)>) -> Self {
        Self { id: id.to_string(), statement, parameters }
    }
    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn statement(&self) -> &str {
        &self.statement
    }
    pub fn parameters(&self) -> &[(String, Value)] {
        &self.parameters
    }
}

pub struct FilterBinder;

impl FilterBinder {
    pub fn bind(state: &FilterState, spec: &QuerySpec) -> BoundQuery {
        let target = match spec.target(state.name()) {
            Some(t) if !state.is_empty() => t,
            _ => return BoundQuery::new(spec.id(), spec.assemble(None), Vec::new()),
        };
        let mut parameters = Vec::with_capacity(state.values().len());
        let mut terms = Vec::with_capacity(state.values().len());
        for (i, token) in state.values().iter().enumerate() {
            let placeholder = format!("{}_{}", target.name(), i);
            let value = match target.matching() {
                // tokens are four ascii digits, so this parse cannot fail
                FilterMatch::Equals => token.parse::<i64>().map(Value::Integer).unwrap_or(Value::Null),
                FilterMatch::Contains => Value::Text(token.clone()),
            };
            terms.push(format!(":{}", placeholder));
            parameters.push((placeholder, value));
        }
        let predicate = match target.matching() {
            FilterMatch::Equals => format!("{} IN ({})", target.column(), terms.join(", ")),
            FilterMatch::Contains => {
                let likes: Vec<String> = terms
                    .iter()
                    .map(|t| format!("{} LIKE '%' || {} || '%'", target.column(), t))
                    .collect();
                format!("({})", likes.join(" OR "))
            }
        };
        debug!(report = spec.id(), filter = state.name(), values = parameters.len(), "bound filter");
        BoundQuery::new(spec.id(), spec.assemble(Some(&predicate)), parameters)
    }
}
