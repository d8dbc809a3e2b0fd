use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nibkit_seq::{write_nib, ByteOrder, NibFile, NibFileOptions, SequenceSource};
use std::io::Cursor;

fn random_nib_bases(len: usize) -> Vec<u8> {
    let bases = [b'A', b'C', b'G', b'T', b'a', b'c', b'g', b't', b'N'];
    let mut seq = Vec::with_capacity(len);
    let mut state: u64 = 42;
    for _ in 0..len {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        seq.push(bases[((state >> 33) % bases.len() as u64) as usize]);
    }
    seq
}

fn make_nib(len: usize) -> Vec<u8> {
    let mut raw = Vec::with_capacity(len / 2 + 9);
    write_nib(&mut raw, &random_nib_bases(len), ByteOrder::BigEndian).unwrap();
    raw
}

fn bench_fetch(c: &mut Criterion) {
    let mut group = c.benchmark_group("nib_fetch");

    let raw = make_nib(1_000_000);
    let mut stream = Cursor::new(raw);
    let source = SequenceSource::open(&mut stream).unwrap();

    for &len in &[100usize, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::new("odd_start", len), &len, |b, &len| {
            b.iter(|| source.fetch(&mut stream, black_box(12_345), len).unwrap())
        });
    }

    group.finish();
}

fn bench_revcomp(c: &mut Criterion) {
    let mut group = c.benchmark_group("nib_revcomp");

    let options = NibFileOptions::new().revcomp(true);
    let mut nib = NibFile::from_reader(Cursor::new(make_nib(100_000)), options).unwrap();
    group.bench_function("10kb", |b| {
        b.iter(|| nib.fetch(black_box(501), 10_000).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_fetch, bench_revcomp);
criterion_main!(benches);
