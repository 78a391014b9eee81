use ancine_dashboard::datatype::Value;
use ancine_dashboard::error::RenderError;
use ancine_dashboard::executor::ResultSet;
use ancine_dashboard::render::{RenderedReport, ReportDescriptor, ReportKind, ReportRenderer};

fn cities(count: i64) -> ResultSet {
    // values 1..=count in scrambled order
    let rows = (1..=count)
        .map(|i| {
            let v = (i * 7) % count + 1;
            vec![Value::from(format!("city{:02}", v)), Value::Integer(v)]
        })
        .collect();
    ResultSet::new(vec!["MUNICIPIO".into(), "TOTAL".into()], rows).unwrap()
}

fn render(result: &ResultSet, descriptor: &ReportDescriptor) -> ancine_dashboard::render::BarChartView {
    match ReportRenderer::render(result, descriptor).expect("render ok") {
        RenderedReport::BarChart(b) => b,
        other => panic!("expected a bar chart, got {:?}", other.kind()),
    }
}

#[test]
fn top_ten_of_fifteen_with_stats_after_truncation() {
    let result = cities(15);
    let descriptor = ReportDescriptor::bar_chart("Top", "MUNICIPIO", "TOTAL").with_limit(10);
    let chart = render(&result, &descriptor);
    let values: Vec<f64> = chart.bars.iter().map(|b| b.value).collect();
    assert_eq!(values, (6..=15).rev().map(|v| v as f64).collect::<Vec<_>>());
    assert_eq!(chart.bars[0].category, Value::from("city15"));
    assert_eq!(chart.summary.items, 10);
    assert_eq!(chart.summary.max, Some(15.0));
    // the minimum of what is shown, not of all fifteen rows
    assert_eq!(chart.summary.min, Some(6.0));
}

#[test]
fn without_limit_every_row_is_ranked() {
    let chart = render(&cities(4), &ReportDescriptor::bar_chart("All", "MUNICIPIO", "TOTAL"));
    assert_eq!(chart.summary.items, 4);
    assert_eq!(chart.summary.min, Some(1.0));
    assert_eq!(chart.color_scheme, "blues");
}

#[test]
fn ties_keep_query_order() {
    let rows = vec![
        vec![Value::from("SP"), Value::Integer(3)],
        vec![Value::from("RJ"), Value::Integer(5)],
        vec![Value::from("MG"), Value::Integer(3)],
    ];
    let result = ResultSet::new(vec!["UF".into(), "TOTAL".into()], rows).unwrap();
    let chart = render(&result, &ReportDescriptor::bar_chart("UF", "UF", "TOTAL").with_color_scheme("greens"));
    let order: Vec<String> = chart.bars.iter().map(|b| b.category.to_string()).collect();
    assert_eq!(order, ["RJ", "SP", "MG"]);
    assert_eq!(chart.color_scheme, "greens");
}

#[test]
fn empty_result_has_no_extremes() {
    let result = ResultSet::new(vec!["UF".into(), "TOTAL".into()], vec![]).unwrap();
    let report = ReportRenderer::render(&result, &ReportDescriptor::bar_chart("UF", "UF", "TOTAL")).unwrap();
    assert_eq!(report.metrics().len(), 1);
    if let RenderedReport::BarChart(chart) = report {
        assert_eq!((chart.summary.items, chart.summary.max, chart.summary.min), (0, None, None));
    }
}

#[test]
fn missing_category_column_is_a_render_error() {
    let descriptor = ReportDescriptor::bar_chart("Top", "CIDADE", "TOTAL");
    let err = ReportRenderer::render(&cities(3), &descriptor).unwrap_err();
    assert_eq!(err, RenderError::MissingColumn { kind: "BarChart", column: "CIDADE".into() });
}

#[test]
fn descriptor_without_columns_is_a_render_error() {
    let descriptor = ReportDescriptor::of_kind(ReportKind::BarChart, "Top");
    let err = ReportRenderer::render(&cities(3), &descriptor).unwrap_err();
    assert!(matches!(err, RenderError::MissingField { field: "category_column", .. }));
}

#[test]
fn non_numeric_values_are_refused() {
    let rows = vec![
        vec![Value::from("SP"), Value::Integer(3)],
        vec![Value::from("RJ"), Value::from("muitos")],
    ];
    let result = ResultSet::new(vec!["UF".into(), "TOTAL".into()], rows).unwrap();
    let err = ReportRenderer::render(&result, &ReportDescriptor::bar_chart("UF", "UF", "TOTAL")).unwrap_err();
    assert_eq!(err, RenderError::NonNumeric { column: "TOTAL".into(), row: 1 });
}

#[test]
fn nan_and_infinity_text_are_not_numbers() {
    for word in ["NaN", "inf", "-infinity"] {
        let rows = vec![
            vec![Value::from("SP"), Value::Integer(3)],
            vec![Value::from("RJ"), Value::from(word)],
        ];
        let result = ResultSet::new(vec!["UF".into(), "TOTAL".into()], rows).unwrap();
        let err = ReportRenderer::render(&result, &ReportDescriptor::bar_chart("UF", "UF", "TOTAL")).unwrap_err();
        assert_eq!(err, RenderError::NonNumeric { column: "TOTAL".into(), row: 1 }, "{word}");
    }
    let rows = vec![vec![Value::from("SP"), Value::Real(f64::NAN)]];
    let result = ResultSet::new(vec!["UF".into(), "TOTAL".into()], rows).unwrap();
    assert!(ReportRenderer::render(&result, &ReportDescriptor::bar_chart("UF", "UF", "TOTAL")).is_err());
}
