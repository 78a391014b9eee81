use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use ancine_dashboard::datatype::Value;
use ancine_dashboard::executor::ResultSet;
use ancine_dashboard::filter::{FilterBinder, FilterState};
use ancine_dashboard::query::{FilterMatch, QuerySpec};
use ancine_dashboard::render::{ReportDescriptor, ReportRenderer};

fn series(n: i64) -> ResultSet {
    let rows = (0..n)
        .map(|i| vec![Value::Integer(1900 + (i * 37) % n), Value::Integer((i * 7919) % 1000)])
        .collect();
    ResultSet::new(vec!["ANO".into(), "TOTAL".into()], rows).unwrap()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let spec = QuerySpec::new("requests", "SELECT CRT FROM Requisicao")
        .with_where("SITUACAO_CRT = 'IRREGULAR'")
        .filter_on("year", "DATA_REQUERIMENTO_CRT", FilterMatch::Contains)
        .order_by("CRT")
        .limit(50);
    let raw = (1990..2030).map(|y| y.to_string()).collect::<Vec<_>>().join(", ");
    c.bench_function("parse 40 years", |b| b.iter(|| FilterState::years(black_box(&raw))));
    let state = FilterState::years(&raw);
    c.bench_function("bind 40 years", |b| b.iter(|| FilterBinder::bind(black_box(&state), &spec)));

    let bar = ReportDescriptor::bar_chart("Top", "ANO", "TOTAL").with_limit(10);
    let line = ReportDescriptor::line_chart("Por ano", "ANO", "TOTAL");
    for n in [100, 10_000] {
        let result = series(n);
        c.bench_function(&format!("bar chart {}", n), |b| b.iter(|| ReportRenderer::render(black_box(&result), &bar)));
        c.bench_function(&format!("line chart {}", n), |b| b.iter(|| ReportRenderer::render(black_box(&result), &line)));
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
