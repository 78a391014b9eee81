use std::path::PathBuf;

use ::config::{Config, File};
use serde::Deserialize;

use crate::error::{DashboardError, Result};

/// Base name of the optional settings file (`dashboard.toml`, `dashboard.json`, ...).
pub const CONFIG_NAME: &str = "dashboard";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DashboardConfig {
    /// SQLite database holding Obras, Requisicao and Requerentes.
    pub database: PathBuf,
    pub listen: String,
    pub log_level: String,
    pub title: String,
    /// Evaluate the reports of a page on scoped threads.
    pub concurrent: bool,
}

impl DashboardConfig {
    /// Defaults overlaid with the settings file, if there is one.
    pub fn load(name: &str) -> Result<Self> {
        let settings = Config::builder()
            .set_default("database", "ancine.db")?
            .set_default("listen", "127.0.0.1:8080")?
            .set_default("log_level", "info")?
            .set_default("title", "Dados Ancine")?
            .set_default("concurrent", false)?
            .add_source(File::with_name(name).required(false))
            .build()?;
        let loaded: DashboardConfig = settings.try_deserialize()?;
        if loaded.title.trim().is_empty() {
            return Err(DashboardError::Config("title must not be empty".into()));
        }
        Ok(loaded)
    }
}
