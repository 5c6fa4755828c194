use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use ember_parser::parser::Parser;

fn stmt(source: &str) {
    let source = source.into();
    let _ast = Parser::new(&source).parse_stmt();
    assert!(source.has_no_errors());
}

fn program(source: &str) {
    let source = source.into();
    let _decls = Parser::new(&source).parse_all();
    assert!(source.has_no_errors());
}

fn long_expr(c: &mut Criterion) {
    let mut group = c.benchmark_group("long-expr");

    let mut source = "1".to_string();
    for _i in 0..1000 {
        source.push_str(" + 1");
    }
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("long-expr", |b| b.iter(|| stmt(&source)));
}

fn stress_precedence(c: &mut Criterion) {
    let mut group = c.benchmark_group("stress-precedence");

    let mut source = "1".to_string();
    for _i in 0..200 {
        source.push_str(" == 2 < 3 + 5 * -f(x).y % 7");
    }
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("stress-precedence", |b| b.iter(|| stmt(&source)));
}

fn many_decls(c: &mut Criterion) {
    let mut group = c.benchmark_group("many-decls");

    let mut source = String::new();
    for i in 0..200 {
        source.push_str(&format!(
            "fun f{} a b = {{ var c = a * b; if c > 10 then c else {{ return a; }} }};\n",
            i
        ));
    }
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("many-decls", |b| b.iter(|| program(&source)));
}

criterion_group!(benches, long_expr, stress_precedence, many_decls);
criterion_main!(benches);
