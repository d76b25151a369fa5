use criterion::{black_box, criterion_group, criterion_main, Criterion};

use testmetrics_core::normalizer::normalize;
use testmetrics_core::source::read_csv;

fn make_csv(subjects: usize, rows: usize) -> String {
    let mut top = vec!["Date".to_string()];
    let mut bottom = vec![String::new()];
    for i in 0..subjects {
        top.push(format!("Subject{i}"));
        top.push(String::new());
        top.push(String::new());
        bottom.extend(["Attempted", "Wrong", "Unattempt"].map(String::from));
    }

    let mut csv = format!("{}\n{}\n", top.join(","), bottom.join(","));
    for r in 0..rows {
        let mut cells = vec![(r + 1).to_string()];
        for i in 0..subjects {
            let attempted = (r + i) % 25;
            cells.push(attempted.to_string());
            cells.push(((r + i) % 5).to_string());
            cells.push((25 - attempted).to_string());
        }
        csv.push_str(&cells.join(","));
        csv.push('\n');
    }
    csv
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for (subjects, rows) in [(3, 20), (4, 200), (10, 2000)] {
        let raw = read_csv(make_csv(subjects, rows).as_bytes()).unwrap();
        group.bench_function(format!("subjects={subjects},rows={rows}"), |b| {
            b.iter(|| normalize(black_box(&raw)))
        });
    }

    group.finish();
}

fn bench_read_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_csv");
    let csv = make_csv(4, 200);

    group.bench_function("subjects=4,rows=200", |b| {
        b.iter(|| read_csv(black_box(csv.as_bytes())))
    });

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_read_csv);
criterion_main!(benches);
