use criterion::{black_box, criterion_group, criterion_main, Criterion};
use s7_dio::address::{format, parse};
use s7_dio::{DataItem, ReadRequest, MAX_ITEMS_PER_READ};

const ADDRESSES: [&str; 6] = ["M10.1", "Q0.0", "I1.2", "DB5.DBX2.3", "MW4", "db300.dbd12"];

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_mixed", |b| {
        b.iter(|| {
            for text in ADDRESSES {
                let _ = black_box(parse(black_box(text)));
            }
        })
    });
}

fn bench_format(c: &mut Criterion) {
    let references: Vec<_> = ADDRESSES.iter().filter_map(|text| parse(text).ok()).collect();
    c.bench_function("format_mixed", |b| {
        b.iter(|| {
            for reference in &references {
                black_box(format(black_box(reference)));
            }
        })
    });
}

fn bench_read_request(c: &mut Criterion) {
    let items: Vec<DataItem> = (0..MAX_ITEMS_PER_READ)
        .filter_map(|i| parse(&format!("DB1.DBX{}.{}", i / 8, i % 8)).ok())
        .map(|reference| DataItem::from(&reference))
        .collect();
    c.bench_function("encode_full_read_request", |b| {
        b.iter(|| {
            let request = ReadRequest::new(black_box(items.clone()));
            black_box(request.map(|request| request.to_bytes()))
        })
    });
}

criterion_group!(benches, bench_parse, bench_format, bench_read_request);
criterion_main!(benches);
