//! Matching benchmarks for the server URL template matcher.
//!
//! Run with: cargo bench -p asyncspec-router

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use asyncspec_router::{match_template, parameter_names};

/// Generate server templates with an increasing number of placeholders.
fn generate_templates() -> Vec<(usize, String, String)> {
    (0..=4)
        .map(|count| {
            let mut template = String::from("broker.example.com");
            let mut url = template.clone();
            for i in 0..count {
                template.push_str(&format!("/{{var{}}}", i));
                url.push_str(&format!("/value-{}", i));
            }
            url.push_str("/events/lighting/measured");
            (count, template, url)
        })
        .collect()
}

fn bench_match_template(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_template");

    for (count, template, url) in generate_templates() {
        group.bench_with_input(
            BenchmarkId::new("placeholders", count),
            &(template, url),
            |b, (template, url)| b.iter(|| match_template(black_box(template), black_box(url))),
        );
    }

    group.finish();
}

fn bench_match_miss(c: &mut Criterion) {
    c.bench_function("match_template_miss", |b| {
        b.iter(|| {
            match_template(
                black_box("api.streetlights.smartylighting.com:{port}"),
                black_box("api.other.example.com:1883/smartylighting"),
            )
        })
    });
}

fn bench_parameter_names(c: &mut Criterion) {
    c.bench_function("parameter_names", |b| {
        b.iter(|| parameter_names(black_box("{scheme}://{host}:{port}/{tenant}/v1")))
    });
}

criterion_group!(
    benches,
    bench_match_template,
    bench_match_miss,
    bench_parameter_names
);
criterion_main!(benches);
