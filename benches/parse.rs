use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fa_text::prelude::*;

/// A ring of `n` states over `{a, b}` where `a` moves forward and `b` stays.
fn ring_description(n: usize) -> String {
    let mut out = String::from("Sigma:\n a\n b\nEnd\nStates:\n");
    for i in 0..n {
        let attrs = match i {
            0 => ", S",
            _ if i == n - 1 => ", F",
            _ => "",
        };
        out.push_str(&format!(" q{i}{attrs}\n"));
    }
    out.push_str("End\nTransitions:\n");
    for i in 0..n {
        out.push_str(&format!(" q{i}, a, q{}\n q{i}, b, q{i}\n", (i + 1) % n));
    }
    out.push_str("End\n");
    out
}

fn parsing(c: &mut Criterion) {
    let text = ring_description(500);
    c.bench_function("parse ring 500 strict", |b| {
        b.iter(|| parse_str(black_box(&text), ParseOptions::strict()).is_ok())
    });
    c.bench_function("parse ring 500 lenient", |b| {
        b.iter(|| parse_str(black_box(&text), ParseOptions::lenient()).is_ok())
    });
}

fn classification(c: &mut Criterion) {
    let aut = parse_str(&ring_description(500), ParseOptions::strict())
        .unwrap()
        .into_automaton();
    let word = "ab".repeat(499);
    c.bench_function("accept word of length 998", |b| {
        b.iter(|| aut.accepts_word(black_box(&word)))
    });

    let start: Set<State> = [aut.initial().clone()].into_iter().collect();
    c.bench_function("epsilon step", |b| {
        b.iter(|| aut.step_with_epsilon(black_box(&start), "a"))
    });
}

criterion_group!(benches, parsing, classification);
criterion_main!(benches);
