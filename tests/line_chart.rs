use ancine_dashboard::datatype::Value;
use ancine_dashboard::error::RenderError;
use ancine_dashboard::executor::ResultSet;
use ancine_dashboard::render::{LineChartView, RenderedReport, ReportDescriptor, ReportRenderer};

fn series(points: &[(i64, i64)]) -> ResultSet {
    let rows = points.iter().map(|(y, v)| vec![Value::Integer(*y), Value::Integer(*v)]).collect();
    ResultSet::new(vec!["ANO".into(), "TOTAL".into()], rows).unwrap()
}

fn render(result: &ResultSet) -> LineChartView {
    let descriptor = ReportDescriptor::line_chart("Por ano", "ANO", "TOTAL");
    match ReportRenderer::render(result, &descriptor).expect("render ok") {
        RenderedReport::LineChart(l) => l,
        other => panic!("expected a line chart, got {:?}", other.kind()),
    }
}

#[test]
fn growth_is_last_over_first_after_sorting() {
    let chart = render(&series(&[(2020, 10), (2021, 20), (2022, 5)]));
    assert_eq!(chart.summary.growth_percent, -50.0);
    // same rows in reverse query order give the same answer
    let reversed = render(&series(&[(2022, 5), (2021, 20), (2020, 10)]));
    assert_eq!(reversed.summary.growth_percent, -50.0);
    let years: Vec<Value> = reversed.points.iter().map(|p| p.category.clone()).collect();
    assert_eq!(years, [Value::Integer(2020), Value::Integer(2021), Value::Integer(2022)]);
    assert_eq!(reversed.summary.max_category, Some(Value::Integer(2021)));
    assert_eq!(reversed.summary.min_category, Some(Value::Integer(2022)));
    assert_eq!(reversed.summary.categories, 3);
}

#[test]
fn zero_first_value_yields_zero_growth() {
    let chart = render(&series(&[(2021, 5), (2020, 0)]));
    assert_eq!(chart.summary.growth_percent, 0.0);
    assert_eq!(chart.summary.min_category, Some(Value::Integer(2020)));
}

#[test]
fn single_row_yields_zero_growth() {
    let chart = render(&series(&[(2019, 42)]));
    assert_eq!(chart.summary.growth_percent, 0.0);
    assert_eq!(chart.summary.categories, 1);
    assert_eq!(chart.summary.max_category, chart.summary.min_category);
}

#[test]
fn empty_series_has_no_extremes() {
    let chart = render(&series(&[]));
    assert_eq!(chart.summary.growth_percent, 0.0);
    assert_eq!(chart.summary.categories, 0);
    assert_eq!(chart.summary.max_category, None);
}

#[test]
fn text_years_sort_and_count_as_distinct_categories() {
    let rows = vec![
        vec![Value::from("2021"), Value::Integer(4)],
        vec![Value::from("2019"), Value::Integer(2)],
        vec![Value::from("2021"), Value::Integer(1)],
    ];
    let result = ResultSet::new(vec!["ANO".into(), "TOTAL".into()], rows).unwrap();
    let chart = render(&result);
    assert_eq!(chart.points[0].category, Value::from("2019"));
    assert_eq!(chart.summary.categories, 2);
    assert_eq!(chart.summary.growth_percent, -50.0);
}

#[test]
fn missing_value_column_is_a_render_error() {
    let descriptor = ReportDescriptor::line_chart("Por ano", "ANO", "QUANTIDADE");
    let err = ReportRenderer::render(&series(&[(2020, 1)]), &descriptor).unwrap_err();
    assert_eq!(err, RenderError::MissingColumn { kind: "LineChart", column: "QUANTIDADE".into() });
}

#[test]
fn infinity_category_sorts_as_text_after_years() {
    let rows = vec![
        vec![Value::from("inf"), Value::Integer(9)],
        vec![Value::from("2021"), Value::Integer(4)],
        vec![Value::Integer(2020), Value::Integer(2)],
    ];
    let result = ResultSet::new(vec!["ANO".into(), "TOTAL".into()], rows).unwrap();
    let chart = render(&result);
    let order: Vec<String> = chart.points.iter().map(|p| p.category.to_string()).collect();
    assert_eq!(order, ["2020", "2021", "inf"]);
    assert_eq!(chart.summary.growth_percent, 350.0);
}
