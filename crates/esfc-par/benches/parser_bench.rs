//! Parser benchmarks.
//!
//! Run with `cargo bench --package esfc-par`.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use esfc_lex::Lexer;
use esfc_par::Parser;

fn parse_source(source: &str) -> u32 {
    Parser::new(Lexer::new(source, true))
        .parse_program()
        .map(|tree| tree.node_count)
        .unwrap_or(0)
}

fn bench_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    let small = "var x = 1;";
    let medium = r#"
        function fib(n) {
            if (n <= 1) return n;
            return fib(n - 1) + fib(n - 2);
        }
        for (var i = 0; i < 10; i++) fib(i);
    "#;
    let expressions = "a = b ? c + d * e : f[g](h, i) && j || ~k;";

    group.throughput(Throughput::Bytes(medium.len() as u64));
    group.bench_function("small_var", |b| b.iter(|| parse_source(black_box(small))));
    group.bench_function("fib_program", |b| b.iter(|| parse_source(black_box(medium))));
    group.bench_function("dense_expressions", |b| {
        b.iter(|| parse_source(black_box(expressions)))
    });

    group.finish();
}

criterion_group!(benches, bench_parser);
criterion_main!(benches);
