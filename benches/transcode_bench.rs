use criterion::{black_box, criterion_group, criterion_main, Criterion};
use recidx::destrip::destrip;
use recidx::render::{render_record, DisplayOptions, RecordLabel};

fn bench_destrip(c: &mut Criterion) {
    // 64 KiB of byte-range payload, double-encoded as UTF-8.
    let raw: Vec<u8> = (0..64 * 1024u32).map(|i| (i % 251) as u8).collect();
    let doubled: String = raw.iter().map(|&b| char::from(b)).collect();

    c.bench_function("destrip_64k", |b| b.iter(|| destrip(black_box(doubled.as_bytes()))));
}

fn bench_render_binary(c: &mut Criterion) {
    let record: Vec<u8> = (0..64 * 1024u32).map(|i| (i % 256) as u8).collect();
    let options = DisplayOptions { binary: true, text: true, ..Default::default() };

    c.bench_function("render_binary_64k", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(record.len() * 4);
            render_record(black_box(&record), RecordLabel::Record(0), options, &mut out).unwrap();
            out
        })
    });
}

criterion_group!(benches, bench_destrip, bench_render_binary);
criterion_main!(benches);
