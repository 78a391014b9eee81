//! ancine-dashboard – a small reporting engine for the ANCINE work registry.
//!
//! A dashboard page is a list of *reports*. Each report pairs a declarative
//! query with a presentation:
//! * A [`query::QuerySpec`] holds a base SELECT, an optional static WHERE,
//!   named filter targets, GROUP BY, ORDER BY and a row limit as separate parts.
//! * A [`filter::FilterState`] is the parsed year field of the page; the
//!   [`filter::FilterBinder`] turns it into a [`filter::BoundQuery`] where every
//!   user-derived value is a bind parameter.
//! * The [`executor::QueryExecutor`] runs a bound query once against a
//!   [`executor::DataSource`] and returns an immutable [`executor::ResultSet`].
//! * The [`render::ReportRenderer`] maps a result set onto a table, a ranked bar
//!   chart or a chronological line chart, with summary statistics.
//! * A [`page::ReportPage`] evaluates all of its reports under one filter state
//!   and one data source handle, isolating per-report failures.
//!
//! ## Quick Start
//! ```
//! use rusqlite::Connection;
//! use ancine_dashboard::{error::Result, executor::SqliteSource, page::{Report, ReportPage},
//!     query::{FilterMatch, QuerySpec}, render::ReportDescriptor};
//! let connector = || -> Result<SqliteSource> {
//!     let conn = Connection::open_in_memory()?;
//!     conn.execute_batch("create table Obras (PAIS text, ANO_PRODUCAO integer);
//!         insert into Obras values ('Brasil', 2020), ('Brasil', 2021), ('Chile', 2021);")?;
//!     Ok(SqliteSource::from_connection(conn))
//! };
//! let spec = QuerySpec::new("paises", "SELECT PAIS, COUNT(*) AS TOTAL FROM Obras")
//!     .filter_on("year", "ANO_PRODUCAO", FilterMatch::Equals)
//!     .group_by("PAIS");
//! let page = ReportPage::new("Dados Ancine", vec![
//!     Report::new(spec, ReportDescriptor::bar_chart("Obras por país", "PAIS", "TOTAL")),
//! ]).unwrap();
//! let view = page.render("2021", &connector).unwrap();
//! assert_eq!(view.successes(), 1);
//! ```
//!
//! The data source is acquired per render cycle through a
//! [`executor::Connector`] and released when the cycle ends.

pub mod catalog;
pub mod config;
pub mod datatype;
pub mod error;
pub mod executor;
pub mod filter;
pub mod page;
pub mod query;
pub mod render;
pub mod server;
