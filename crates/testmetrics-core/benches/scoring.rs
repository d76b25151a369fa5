use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use testmetrics_core::engine::{compute, safe_div, DerivedMetrics};
use testmetrics_core::model::{
    Column, CounterField, MarkingScheme, NormalizedTable, SubjectCounters, TestRecord,
};

fn make_table(subjects: usize, rows: usize) -> NormalizedTable {
    let names: Vec<String> = (0..subjects).map(|i| format!("subject{i:02}")).collect();

    let mut columns = vec![Column::TestNumber];
    for s in &names {
        for field in CounterField::ALL {
            columns.push(Column::Counter {
                subject: s.clone(),
                field,
            });
        }
    }

    let records = (0..rows)
        .map(|r| TestRecord {
            test_number: (r + 1) as f64,
            subjects: names
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let attempted = ((r + i) % 25) as f64;
                    let wrong = ((r * 3 + i) % 7) as f64;
                    (s.clone(), SubjectCounters::new(attempted, wrong, 25.0 - attempted))
                })
                .collect(),
            extra: BTreeMap::new(),
        })
        .collect();

    NormalizedTable {
        columns,
        subjects: names,
        records,
    }
}

fn bench_derive(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive");
    let scheme = MarkingScheme::default();

    group.bench_function("safe_div", |b| {
        b.iter(|| safe_div(black_box(6.0), black_box(0.0)))
    });

    group.bench_function("subject", |b| {
        let counters = SubjectCounters::new(8.0, 2.0, 2.0);
        b.iter(|| DerivedMetrics::from_counters(black_box(&counters), black_box(&scheme)))
    });

    group.finish();
}

fn bench_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute");
    let scheme = MarkingScheme::default();

    for (subjects, rows) in [(3, 20), (4, 200), (10, 2000)] {
        let table = make_table(subjects, rows);
        group.bench_function(format!("subjects={subjects},rows={rows}"), |b| {
            b.iter(|| compute(black_box(&table), black_box(&scheme)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_derive, bench_compute);
criterion_main!(benches);
