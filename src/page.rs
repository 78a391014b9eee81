//! A dashboard page: several reports evaluated under one filter state.
//!
//! A render cycle acquires the data source once, evaluates every report
//! against it and drops it when the cycle ends. One report failing never
//! aborts the others; only failing to acquire the source aborts the page.

use std::collections::HashSet;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{DashboardError, Result};
use crate::executor::{Connector, DataSource, QueryExecutor};
use crate::filter::{FilterBinder, FilterState};
use crate::query::QuerySpec;
use crate::render::{Metric, RenderedReport, ReportDescriptor, ReportRenderer};

/// One query paired with its presentation.
#[derive(Debug, Clone)]
pub struct Report {
    pub spec: QuerySpec,
    pub descriptor: ReportDescriptor,
}
impl Report {
    pub fn new(spec: QuerySpec, descriptor: ReportDescriptor) -> Self {
        Self { spec, descriptor }
    }

    /// bind -> execute -> render
    pub fn evaluate<S: DataSource + ?Sized>(&self, filter: &FilterState, source: &S) -> Result<RenderedReport> {
        let bound = FilterBinder::bind(filter, &self.spec);
        let result = QueryExecutor::execute(&bound, source)?;
        Ok(ReportRenderer::render(&result, &self.descriptor)?)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SlotOutcome {
    Rendered { report: RenderedReport, metrics: Vec<Metric> },
    Failed { kind: String, message: String },
}
impl SlotOutcome {
    fn from_result(result: Result<RenderedReport>) -> Self {
        match result {
            Ok(report) => {
                let metrics = report.metrics();
                SlotOutcome::Rendered { report, metrics }
            }
            Err(e) => SlotOutcome::Failed { kind: e.kind().to_string(), message: e.to_string() },
        }
    }
    pub fn is_rendered(&self) -> bool {
        matches!(self, SlotOutcome::Rendered { .. })
    }
    pub fn report(&self) -> Option<&RenderedReport> {
        match self {
            SlotOutcome::Rendered { report, .. } => Some(report),
            SlotOutcome::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSlot {
    pub id: String,
    pub title: String,
    pub outcome: SlotOutcome,
}

/// Everything the display host needs for one render cycle.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub title: String,
    pub filter: FilterState,
    pub rendered_at: DateTime<Utc>,
    pub slots: Vec<ReportSlot>,
}
impl PageView {
    pub fn successes(&self) -> usize {
        self.slots.iter().filter(|s| s.outcome.is_rendered()).count()
    }
    pub fn failures(&self) -> usize {
        self.slots.len() - self.successes()
    }
    pub fn slot(&self, id: &str) -> Option<&ReportSlot> {
        self.slots.iter().find(|s| s.id == id)
    }
}

#[derive(Debug, Clone)]
pub struct ReportPage {
    title: String,
    reports: Vec<Report>,
}

impl ReportPage {
    pub fn new(title: &str, reports: Vec<Report>) -> Result<Self> {
        let mut ids = HashSet::new();
        for report in &reports {
            report.spec.validate()?;
            if !ids.insert(report.spec.id().to_string()) {
                return Err(DashboardError::Config(format!("duplicate report id '{}'", report.spec.id())));
            }
        }
        Ok(Self { title: title.to_string(), reports })
    }
    pub fn title(&self) -> &str {
        &self.title
    }
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Evaluates every report in declared order on the calling thread.
    pub fn render<C: Connector>(&self, filter_input: &str, connector: &C) -> Result<PageView> {
        let filter = FilterState::years(filter_input);
        let started = Instant::now();
        // dropped on every exit path below, which closes the connection
        let source = connector.connect().map_err(Self::acquisition_failed)?;
        let slots = self
            .reports
            .iter()
            .map(|report| self.slot(report, report.evaluate(&filter, &source)))
            .collect();
        Ok(self.finish(filter, slots, started))
    }

    /// Evaluates reports on scoped threads sharing one source. Slots still
    /// follow the declared order, whatever order the reports complete in.
    pub fn render_concurrent<C>(&self, filter_input: &str, connector: &C) -> Result<PageView>
    where
        C: Connector,
        C::Source: Sync,
    {
        let filter = FilterState::years(filter_input);
        let started = Instant::now();
        let source = connector.connect().map_err(Self::acquisition_failed)?;
        let slots = std::thread::scope(|scope| {
            let handles: Vec<_> = self
                .reports
                .iter()
                .map(|report| {
                    let (filter, source) = (&filter, &source);
                    scope.spawn(move || report.evaluate(filter, source))
                })
                .collect();
            handles
                .into_iter()
                .zip(&self.reports)
                .map(|(handle, report)| {
                    let result = handle
                        .join()
                        .unwrap_or_else(|_| Err(DashboardError::Invariant("report worker panicked".into())));
                    self.slot(report, result)
                })
                .collect()
        });
        Ok(self.finish(filter, slots, started))
    }

    fn acquisition_failed(e: DashboardError) -> DashboardError {
        warn!(error = %e, "cannot acquire data source, aborting page");
        match e {
            DashboardError::Resource(_) => e,
            other => DashboardError::Resource(other.to_string()),
        }
    }

    fn slot(&self, report: &Report, result: Result<RenderedReport>) -> ReportSlot {
        if let Err(e) = &result {
            warn!(report = report.spec.id(), error = %e, "report failed");
        }
        ReportSlot {
            id: report.spec.id().to_string(),
            title: report.descriptor.title().to_string(),
            outcome: SlotOutcome::from_result(result),
        }
    }

    fn finish(&self, filter: FilterState, slots: Vec<ReportSlot>, started: Instant) -> PageView {
        let view = PageView { title: self.title.clone(), filter, rendered_at: Utc::now(), slots };
        info!(
            page = %self.title,
            years = ?view.filter.values(),
            ok = view.successes(),
            failed = view.failures(),
            ms = started.elapsed().as_secs_f64() * 1000.0,
            "page rendered"
        );
        view
    }
}
