use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Resource error: {0}")]
    Resource(String),
    #[error("Query error: {0}")]
    Query(String),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("Internal invariant violated: {0}")]
    Invariant(String),
}

impl DashboardError {
    /// Short tag used when an error is shown inline in a report slot.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Resource(_) => "resource",
            Self::Query(_) => "query",
            Self::Render(_) => "render",
            Self::Invariant(_) => "invariant",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("{kind} requires column '{column}' which is not in the result set")]
    MissingColumn { kind: &'static str, column: String },
    #[error("{kind} requires the descriptor field '{field}'")]
    MissingField { kind: &'static str, field: &'static str },
    #[error("column '{column}' holds a non-numeric value in row {row}")]
    NonNumeric { column: String, row: usize },
}

pub type Result<T> = std::result::Result<T, DashboardError>;

// Helper conversions
impl From<rusqlite::Error> for DashboardError {
    fn from(e: rusqlite::Error) -> Self { Self::Query(e.to_string()) }
}

impl From<::config::ConfigError> for DashboardError {
    fn from(e: ::config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
