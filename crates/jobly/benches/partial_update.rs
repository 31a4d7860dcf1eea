use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use jobly::{ColumnMap, FieldMap, sql_for_partial_update};

/// `n` fields, every other one translated: f0 -> col_0, f2 -> col_2, ...
fn build_input(n: usize) -> (FieldMap, ColumnMap) {
    let data: FieldMap = (0..n).map(|i| (format!("f{i}"), i as i64)).collect();
    let columns: ColumnMap = (0..n)
        .step_by(2)
        .map(|i| (format!("f{i}"), format!("col_{i}")))
        .collect();
    (data, columns)
}

fn bench_partial_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("partial_update/build");

    for n in [1, 5, 10, 50, 100] {
        let input = build_input(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &input, |b, (data, columns)| {
            b.iter(|| black_box(sql_for_partial_update(data, columns)));
        });
    }

    group.finish();
}

fn bench_from_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("partial_update/from_json");

    for n in [5, 20, 100] {
        let body = serde_json::Value::Object(
            (0..n)
                .map(|i| (format!("f{i}"), serde_json::Value::from(i)))
                .collect(),
        );
        group.bench_with_input(BenchmarkId::from_parameter(n), &body, |b, body| {
            b.iter(|| black_box(FieldMap::from_json(body.clone())));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_partial_update, bench_from_json);
criterion_main!(benches);
