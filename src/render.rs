//! Presentation of result sets.
//!
//! The renderer maps a [`ResultSet`] onto one of a closed set of views. Views
//! are plain serializable data handed to the display host; no widget or
//! layout decision is taken here.
//!
//! Bar chart statistics are computed over the bars that are shown, i.e.
//! after ranking and truncation. Line charts always read chronologically,
//! whatever order the query produced.

use serde::Serialize;

use crate::datatype::Value;
use crate::error::RenderError;
use crate::executor::ResultSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportKind {
    Table,
    BarChart,
    LineChart,
}
impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Table => "Table",
            ReportKind::BarChart => "BarChart",
            ReportKind::LineChart => "LineChart",
        }
    }
}

pub const DEFAULT_COLOR_SCHEME: &str = "blues";

/// How a result set should be presented.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDescriptor {
    kind: ReportKind,
    title: String,
    category_column: Option<String>,
    value_column: Option<String>,
    color_scheme: String,
    limit: Option<usize>,
}

impl ReportDescriptor {
    pub fn table(title: &str) -> Self {
        Self {
            kind: ReportKind::Table,
            title: title.to_string(),
            category_column: None,
            value_column: None,
            color_scheme: DEFAULT_COLOR_SCHEME.to_string(),
            limit: None,
        }
    }
    pub fn bar_chart(title: &str, category_column: &str, value_column: &str) -> Self {
        Self {
            kind: ReportKind::BarChart,
            category_column: Some(category_column.to_string()),
            value_column: Some(value_column.to_string()),
            ..Self::table(title)
        }
    }
    pub fn line_chart(title: &str, category_column: &str, value_column: &str) -> Self {
        Self {
            kind: ReportKind::LineChart,
            category_column: Some(category_column.to_string()),
            value_column: Some(value_column.to_string()),
            ..Self::table(title)
        }
    }
    /// A descriptor with the given kind and no columns. Rendering a chart
    /// built this way fails until the columns are named.
    pub fn of_kind(kind: ReportKind, title: &str) -> Self {
        Self { kind, ..Self::table(title) }
    }
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
    pub fn with_color_scheme(mut self, scheme: &str) -> Self {
        self.color_scheme = scheme.to_string();
        self
    }
    pub fn kind(&self) -> ReportKind {
        self.kind
    }
    pub fn title(&self) -> &str {
        &self.title
    }
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}

// ------------- Views -------------
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSpec {
    pub name: String,
    /// Storage class of the first non-null cell, `Null` when the column is empty.
    pub data_type: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub title: String,
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<Vec<Value>>,
    pub total_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub category: Value,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSummary {
    pub items: usize,
    pub max: Option<f64>,
    pub min: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChartView {
    pub title: String,
    pub color_scheme: String,
    pub category_column: String,
    pub value_column: String,
    pub bars: Vec<Point>,
    pub summary: BarSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSummary {
    pub categories: usize,
    pub max_category: Option<Value>,
    pub min_category: Option<Value>,
    pub growth_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChartView {
    pub title: String,
    pub color_scheme: String,
    pub category_column: String,
    pub value_column: String,
    pub points: Vec<Point>,
    pub summary: LineSummary,
}

/// A labeled scalar for the host's metric strip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: f64,
}
impl Metric {
    fn new(label: &str, value: f64) -> Self {
        Self { label: label.to_string(), value }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum RenderedReport {
    Table(TableView),
    BarChart(BarChartView),
    LineChart(LineChartView),
}

impl RenderedReport {
    pub fn kind(&self) -> ReportKind {
        match self {
            RenderedReport::Table(_) => ReportKind::Table,
            RenderedReport::BarChart(_) => ReportKind::BarChart,
            RenderedReport::LineChart(_) => ReportKind::LineChart,
        }
    }
    pub fn title(&self) -> &str {
        match self {
            RenderedReport::Table(t) => &t.title,
            RenderedReport::BarChart(b) => &b.title,
            RenderedReport::LineChart(l) => &l.title,
        }
    }
    pub fn metrics(&self) -> Vec<Metric> {
        match self {
            RenderedReport::Table(t) => vec![Metric::new("Total de registros", t.total_rows as f64)],
            RenderedReport::BarChart(b) => {
                let mut metrics = vec![Metric::new("Itens", b.summary.items as f64)];
                if let (Some(max), Some(min)) = (b.summary.max, b.summary.min) {
                    metrics.push(Metric::new("Máximo", max));
                    metrics.push(Metric::new("Mínimo", min));
                }
                metrics
            }
            RenderedReport::LineChart(l) => vec![
                Metric::new("Categorias", l.summary.categories as f64),
                Metric::new("Crescimento (%)", l.summary.growth_percent),
            ],
        }
    }
}

// ------------- Renderer -------------
pub struct ReportRenderer;

impl ReportRenderer {
    pub fn render(result: &ResultSet, descriptor: &ReportDescriptor) -> Result<RenderedReport, RenderError> {
        match descriptor.kind {
            ReportKind::Table => Ok(RenderedReport::Table(Self::table(result, descriptor))),
            ReportKind::BarChart => Self::bar_chart(result, descriptor).map(RenderedReport::BarChart),
            ReportKind::LineChart => Self::line_chart(result, descriptor).map(RenderedReport::LineChart),
        }
    }

    fn table(result: &ResultSet, descriptor: &ReportDescriptor) -> TableView {
        let columns = result
            .columns()
            .iter()
            .enumerate()
            .map(|(i, name)| ColumnSpec {
                name: name.clone(),
                data_type: result
                    .rows()
                    .iter()
                    .map(|r| &r[i])
                    .find(|v| !v.is_null())
                    .map(Value::data_type)
                    .unwrap_or("Null"),
            })
            .collect();
        let shown = descriptor.limit.unwrap_or(usize::MAX);
        TableView {
            title: descriptor.title.clone(),
            columns,
            rows: result.rows().iter().take(shown).cloned().collect(),
            total_rows: result.row_count(),
        }
    }

    fn bar_chart(result: &ResultSet, descriptor: &ReportDescriptor) -> Result<BarChartView, RenderError> {
        let (category_column, value_column, mut bars) = Self::points(result, descriptor)?;
        // stable, so ties keep query order
        bars.sort_by(|a, b| b.value.total_cmp(&a.value));
        if let Some(limit) = descriptor.limit {
            bars.truncate(limit);
        }
        let summary = BarSummary {
            items: bars.len(),
            max: bars.iter().map(|p| p.value).reduce(f64::max),
            min: bars.iter().map(|p| p.value).reduce(f64::min),
        };
        Ok(BarChartView {
            title: descriptor.title.clone(),
            color_scheme: descriptor.color_scheme.clone(),
            category_column,
            value_column,
            bars,
            summary,
        })
    }

    fn line_chart(result: &ResultSet, descriptor: &ReportDescriptor) -> Result<LineChartView, RenderError> {
        let (category_column, value_column, mut points) = Self::points(result, descriptor)?;
        points.sort_by(|a, b| a.category.cmp_category(&b.category));
        let mut categories: Vec<&Value> = Vec::new();
        for p in &points {
            if !categories.iter().any(|c| c.cmp_category(&p.category).is_eq()) {
                categories.push(&p.category);
            }
        }
        let mut max: Option<&Point> = None;
        let mut min: Option<&Point> = None;
        for p in &points {
            if max.is_none_or(|m| p.value > m.value) {
                max = Some(p);
            }
            if min.is_none_or(|m| p.value < m.value) {
                min = Some(p);
            }
        }
        let growth_percent = match (points.first(), points.last()) {
            (Some(first), Some(last)) if points.len() > 1 && first.value != 0.0 => {
                (last.value - first.value) / first.value * 100.0
            }
            _ => 0.0,
        };
        let summary = LineSummary {
            categories: categories.len(),
            max_category: max.map(|p| p.category.clone()),
            min_category: min.map(|p| p.category.clone()),
            growth_percent,
        };
        Ok(LineChartView {
            title: descriptor.title.clone(),
            color_scheme: descriptor.color_scheme.clone(),
            category_column,
            value_column,
            points,
            summary,
        })
    }

    /// Resolves the chart columns and extracts (category, value) pairs in
    /// query order.
    fn points(result: &ResultSet, descriptor: &ReportDescriptor) -> Result<(String, String, Vec<Point>), RenderError> {
        let kind = descriptor.kind.as_str();
        let category_column = descriptor
            .category_column
            .clone()
            .ok_or(RenderError::MissingField { kind, field: "category_column" })?;
        let value_column = descriptor
            .value_column
            .clone()
            .ok_or(RenderError::MissingField { kind, field: "value_column" })?;
        let category_at = result
            .column_index(&category_column)
            .ok_or_else(|| RenderError::MissingColumn { kind, column: category_column.clone() })?;
        let value_at = result
            .column_index(&value_column)
            .ok_or_else(|| RenderError::MissingColumn { kind, column: value_column.clone() })?;
        let mut points = Vec::with_capacity(result.row_count());
        for (row_number, row) in result.rows().iter().enumerate() {
            let value = row[value_at]
                .as_f64()
                .ok_or_else(|| RenderError::NonNumeric { column: value_column.clone(), row: row_number })?;
            points.push(Point { category: row[category_at].clone(), value });
        }
        Ok((category_column, value_column, points))
    }
}
