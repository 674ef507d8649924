use bookmerge::{collector, verifier, RecordingReporter};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::fs;
use std::path::Path;

const PARAGRAPH: &str = "The quick brown fox jumps over the lazy dog. \
    A journey of a thousand miles begins with a single step. \
    To be or not to be, that is the question.\n";

fn populate(dir: &Path, documents: usize, paragraphs: usize) {
    let body = PARAGRAPH.repeat(paragraphs);
    for i in 0..documents {
        fs::write(dir.join(format!("book_{:04}.txt", i)), &body).unwrap();
    }
}

fn bench_discover(c: &mut Criterion) {
    let temp_dir = tempfile::tempdir().unwrap();
    populate(temp_dir.path(), 500, 1);

    c.bench_function("discover_500", |b| {
        b.iter(|| collector::discover(black_box(temp_dir.path()), "txt").unwrap())
    });
}

fn bench_merge(c: &mut Criterion) {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = temp_dir.path().join("data");
    fs::create_dir(&input).unwrap();
    populate(&input, 100, 200);
    let output = temp_dir.path().join("merged.txt");
    let files = collector::discover(&input, "txt").unwrap();

    c.bench_function("merge_100_docs", |b| {
        b.iter(|| {
            let mut reporter = RecordingReporter::default();
            collector::merge(black_box(&files), &output, &mut reporter).unwrap()
        })
    });
}

fn bench_verify(c: &mut Criterion) {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = temp_dir.path().join("data");
    fs::create_dir(&input).unwrap();
    populate(&input, 100, 200);
    let output = temp_dir.path().join("merged.txt");
    let files = collector::discover(&input, "txt").unwrap();
    collector::merge(&files, &output, &mut RecordingReporter::default()).unwrap();

    c.bench_function("verify_100_docs", |b| {
        b.iter(|| verifier::verify(black_box(&output)).unwrap())
    });
}

criterion_group!(benches, bench_discover, bench_merge, bench_verify);
criterion_main!(benches);
