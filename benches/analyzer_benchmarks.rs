// AML - Scoped semantic analyzer for the Attack Modeling Language
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Performance benchmarks for the AML analyzer.
//!
//! Run with: cargo bench
//!
//! Results are saved to target/criterion/ with HTML reports.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

// ============================================================================
// Benchmark Inputs
// ============================================================================

/// Build a scenario with `compounds` compound blocks of every attack kind.
fn generate_scenario(compounds: usize) -> String {
    let mut source = String::from(
        "scenario {
    variable port = 80
    variable count = 0
    variable rate = 0.5
    packet probe
    list targets = [\"n1\", \"n2\", \"n3\"]
    filter web = port == 80 or port == 443 and rate < 1.0
",
    );
    for i in 0..compounds {
        source.push_str(&format!(
            "    from {i} s {{
        variable step = {i}
        once {{
            count += step * 2 - (step % 3) ** 2
            createPacket(probe, \"udp\")
            injectPacket(probe, \"n1\", tx, 10, ms)
        }}
        every 250 ms {{
            variable local = -1.5
            rate = rate * local + 1.0
            misplaceNode(\"n2\", [1, 2, 3])
        }}
        for nodes in targets {{
            for packets matching web {{
                writeField(captured, \"ttl\", step)
                forwardPacket(captured, step, us)
            }}
        }}
    }}
",
            i = i
        ));
    }
    source.push_str("}\n");
    source
}

fn inputs() -> Vec<(&'static str, String)> {
    vec![
        ("small", generate_scenario(1)),
        ("medium", generate_scenario(20)),
        ("large", generate_scenario(200)),
    ]
}

// ============================================================================
// Lexer Benchmarks
// ============================================================================

fn bench_lexer(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    for (name, source) in inputs() {
        // Throughput based on source code size
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::new("tokenize", name), &source, |b, src| {
            b.iter(|| aml::lexer::tokenize(black_box(src)))
        });
    }

    group.finish();
}

// ============================================================================
// Analyzer Benchmarks
// ============================================================================

fn bench_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    for (name, source) in inputs() {
        // Pre-tokenize so only parsing and analysis are measured
        let tokens = aml::lexer::tokenize(&source).unwrap();
        group.throughput(Throughput::Elements(tokens.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse", name), &tokens, |b, tokens| {
            b.iter(|| aml::parser::parse(black_box(tokens)))
        });
    }

    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    for (name, source) in inputs() {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::new("analyze", name), &source, |b, src| {
            b.iter(|| aml::analyze(black_box(src)))
        });
    }

    group.finish();
}

// ============================================================================
// Rendering Benchmarks
// ============================================================================

fn bench_render(c: &mut Criterion) {
    let scenario = aml::analyze(&generate_scenario(20)).unwrap();

    let mut group = c.benchmark_group("render");
    group.bench_function("tree", |b| {
        b.iter(|| aml::output::render(black_box(&scenario), aml::output::OutputFormat::Tree))
    });
    group.bench_function("xml", |b| {
        b.iter(|| aml::output::render(black_box(&scenario), aml::output::OutputFormat::Xml))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_lexer,
    bench_parser,
    bench_full_pipeline,
    bench_render
);
criterion_main!(benches);
