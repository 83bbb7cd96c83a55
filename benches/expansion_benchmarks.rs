use std::hint::black_box;

use canned_cycle_expander::{expand, CycleExpander, ExpanderConfig};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Generate a program with `holes` drilled holes split into cycles of 50
fn generate_program(holes: usize, pattern: &str) -> String {
    let mut content = String::from("G21 G90\nG0 Z5\n");

    for i in 0..holes {
        if i % 50 == 0 {
            if i > 0 {
                content.push_str("G80\nG0 Z5\n");
            }
            content.push_str("G99\n");
            match pattern {
                "peck" => content.push_str(&format!(
                    "G83 X{:.3} Y{:.3} Z-12 R1 Q0.5 F120\n",
                    (i as f32) * 2.5,
                    (i as f32) * 1.5
                )),
                "dwell" => content.push_str(&format!(
                    "G82 X{:.3} Y{:.3} Z-3 R1 P0.2 F120\n",
                    (i as f32) * 2.5,
                    (i as f32) * 1.5
                )),
                _ => content.push_str(&format!(
                    "G81 X{:.3} Y{:.3} Z-3 R1 F120\n",
                    (i as f32) * 2.5,
                    (i as f32) * 1.5
                )),
            }
            continue;
        }
        let code = match pattern {
            "peck" => "G83",
            "dwell" => "G82",
            _ => "G81",
        };
        content.push_str(&format!(
            "{} X{:.3} Y{:.3}\n",
            code,
            (i as f32) * 2.5,
            (i as f32) * 1.5
        ));
    }

    content.push_str("G80\nM30\n");
    content
}

/// Benchmark expansion of programs of different sizes and cycle types
fn bench_expansion(c: &mut Criterion) {
    let config = ExpanderConfig::default();
    let mut group = c.benchmark_group("expansion");

    for pattern in ["drill", "dwell", "peck"] {
        for holes in [100, 1_000] {
            let program = generate_program(holes, pattern);
            group.throughput(Throughput::Bytes(program.len() as u64));
            group.bench_with_input(
                BenchmarkId::new(pattern, holes),
                &program,
                |b, program| b.iter(|| black_box(expand(black_box(program), &config))),
            );
        }
    }

    group.finish();
}

/// Benchmark the full converter including header and statistics
fn bench_converter(c: &mut Criterion) {
    let program = generate_program(1_000, "peck");
    let mut expander = CycleExpander::default();
    expander.set_program(&program);

    c.bench_function("convert_peck_1000", |b| {
        b.iter(|| black_box(expander.convert()))
    });
}

/// Benchmark on the fixture shipped with the tests
fn bench_real_files(c: &mut Criterion) {
    let program = include_str!("../tests/fixtures/drills.nc");
    let config = ExpanderConfig {
        suppress_duplicate_lines: true,
        ..Default::default()
    };

    c.bench_function("fixture_drills", |b| {
        b.iter(|| black_box(expand(black_box(program), &config)))
    });
}

criterion_group!(
    expansion_benches,
    bench_expansion,
    bench_converter,
    bench_real_files
);

criterion_main!(expansion_benches);
