//! Benchmarks for hunkview core operations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hunkview::core::{parse_diff, parse_hunk_header, FileStats};

/// Generate a synthetic diff with `files` files of `hunks_per_file` hunks each.
fn generate_diff(files: usize, hunks_per_file: usize) -> String {
    let mut out = String::new();
    for f in 0..files {
        out.push_str(&format!(
            "diff --git a/src/file{f}.rs b/src/file{f}.rs\nindex 111..222 100644\n--- a/src/file{f}.rs\n+++ b/src/file{f}.rs\n"
        ));
        for h in 0..hunks_per_file {
            let start = h * 20 + 1;
            out.push_str(&format!("@@ -{start},5 +{start},6 @@ fn scope() {{\n"));
            out.push_str(" context line\n-removed line\n+added line one\n+added line two\n context line\n");
        }
    }
    out
}

fn bench_parse_hunk_header(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_hunk_header");

    let inputs = [
        ("match", "@@ -120,7 +130,9 @@ fn main() {"),
        ("no_match", "just a regular line of code without a header"),
        ("embedded", "prefix text @@ -5 +8 @@ trailing function context"),
    ];

    for (name, input) in inputs {
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, input| {
            b.iter(|| parse_hunk_header(black_box(input)));
        });
    }

    group.finish();
}

fn bench_parse_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_diff");

    for files in [1, 10, 100] {
        let diff = generate_diff(files, 10);
        group.throughput(Throughput::Bytes(diff.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(files), &diff, |b, diff| {
            b.iter(|| parse_diff(black_box(diff), |_| FileStats::unknown()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse_hunk_header, bench_parse_diff);
criterion_main!(benches);
