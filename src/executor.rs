//! Running bound queries against a data source.
//!
//! A [`DataSource`] is anything that can execute a statement with named bind
//! parameters. The [`QueryExecutor`] sits in front of it and refuses any
//! statement whose placeholders and parameters disagree, so a value can only
//! ever reach the store through the bind interface.

use std::path::{Path, PathBuf};
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use rusqlite::types::ToSql;
use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info, warn};

use crate::datatype::Value;
use crate::error::{DashboardError, Result};
use crate::filter::BoundQuery;

/// Immutable tabular output of one query.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        if let Some(i) = rows.iter().position(|r| r.len() != columns.len()) {
            return Err(DashboardError::Invariant(format!(
                "row {} has {} cells but the result set has {} columns",
                i,
                rows[i].len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// A parameterized-query execution interface. Parameter names carry no colon.
pub trait DataSource {
    /// Placeholders of `statement` as the store parses them, spelled as written
    /// (`:name`, `?1`, `@name`, ...). Anonymous positional ones are `?`.
    fn placeholders(&self, statement: &str) -> Result<Vec<String>>;
    fn query(&self, statement: &str, parameters: &[(String, Value)]) -> Result<ResultSet>;
}

/// Acquires the data source for one render cycle.
pub trait Connector {
    type Source: DataSource;
    fn connect(&self) -> Result<Self::Source>;
}

impl<S, F> Connector for F
where
    S: DataSource,
    F: Fn() -> Result<S>,
{
    type Source = S;
    fn connect(&self) -> Result<S> {
        self()
    }
}

// ------------- SQLite -------------
pub struct SqliteSource {
    connection: Mutex<Connection>,
}

impl SqliteSource {
    /// Opens an existing database file without write access. A missing file
    /// is an error rather than a freshly created empty database.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let connection = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| DashboardError::Resource(format!("cannot open {}: {}", path.display(), e)))?;
        Ok(Self::from_connection(connection))
    }
    pub fn from_connection(connection: Connection) -> Self {
        Self { connection: Mutex::new(connection) }
    }
}

impl SqliteSource {
    fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|e| DashboardError::Invariant(format!("connection lock poisoned: {}", e)))
    }
}

impl DataSource for SqliteSource {
    fn placeholders(&self, statement: &str) -> Result<Vec<String>> {
        let connection = self.connection()?;
        let prepared = connection.prepare_cached(statement)?;
        Ok((1..=prepared.parameter_count())
            .map(|i| prepared.parameter_name(i).unwrap_or("?").to_string())
            .collect())
    }

    fn query(&self, statement: &str, parameters: &[(String, Value)]) -> Result<ResultSet> {
        let connection = self.connection()?;
        let mut prepared = connection.prepare_cached(statement)?;
        let columns: Vec<String> = prepared.column_names().into_iter().map(String::from).collect();
        let names: Vec<String> = parameters.iter().map(|(k, _)| format!(":{}", k)).collect();
        let named: Vec<(&str, &dyn ToSql)> = names
            .iter()
            .zip(parameters)
            .map(|(k, (_, v))| (k.as_str(), v as &dyn ToSql))
            .collect();
        let mut rows = prepared.query(named.as_slice())?;
        let mut collected = Vec::new();
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                cells.push(row.get::<_, Value>(i)?);
            }
            collected.push(cells);
        }
        ResultSet::new(columns, collected)
    }
}

/// Opens the configured database file once per render cycle.
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    path: PathBuf,
}
impl SqliteConnector {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
}
impl Connector for SqliteConnector {
    type Source = SqliteSource;
    fn connect(&self) -> Result<SqliteSource> {
        let source = SqliteSource::open_read_only(&self.path)?;
        info!(path = %self.path.display(), "data source acquired");
        Ok(source)
    }
}

// ------------- Executor -------------
pub struct QueryExecutor;

impl QueryExecutor {
    /// Executes `bound` exactly once. Either every row comes back or an error
    /// does; there are no partial results.
    pub fn execute<S: DataSource + ?Sized>(bound: &BoundQuery, source: &S) -> Result<ResultSet> {
        let placeholders = source.placeholders(bound.statement()).map_err(Self::as_query_error)?;
        Self::audit(bound, &placeholders)?;
        let started = Instant::now();
        let result = source.query(bound.statement(), bound.parameters());
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        match &result {
            Ok(rs) => debug!(report = bound.id(), params = bound.parameters().len(), rows = rs.row_count(), ms = elapsed_ms, "query complete"),
            Err(e) => warn!(report = bound.id(), error = %e, ms = elapsed_ms, "query failed"),
        }
        result.map_err(Self::as_query_error)
    }

    /// Every placeholder must be a `:name` with a parameter, and every
    /// parameter must be referenced.
    fn audit(bound: &BoundQuery, placeholders: &[String]) -> Result<()> {
        let mut unsupported = Vec::new();
        let mut referenced = BTreeSet::new();
        for p in placeholders {
            match p.strip_prefix(':') {
                Some(name) if !name.is_empty() => {
                    referenced.insert(name);
                }
                _ => unsupported.push(p.as_str()),
            }
        }
        let provided: BTreeSet<&str> = bound.parameters().iter().map(|(k, _)| k.as_str()).collect();
        let unbound: Vec<&str> = referenced.difference(&provided).copied().collect();
        let unused: Vec<&str> = provided.difference(&referenced).copied().collect();
        if unsupported.is_empty() && unbound.is_empty() && unused.is_empty() {
            return Ok(());
        }
        warn!(report = bound.id(), ?unsupported, ?unbound, ?unused, "refusing statement with mismatched bindings");
        Err(DashboardError::Query(format!(
            "statement for '{}' has unsupported placeholders {:?}, unbound placeholders {:?} and unused parameters {:?}",
            bound.id(),
            unsupported,
            unbound,
            unused
        )))
    }

    fn as_query_error(e: DashboardError) -> DashboardError {
        match e {
            DashboardError::Query(_) => e,
            other => DashboardError::Query(other.to_string()),
        }
    }
}
