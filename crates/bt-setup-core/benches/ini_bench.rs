//! Criterion benchmarks for [`IniDocument`] parsing and editing.
//!
//! Engine config files such as `DefaultEngine.ini` grow to a few thousand
//! lines in large projects; these benchmarks track parse, update and render
//! cost at those sizes.
//!
//! Run with:
//! ```bash
//! cargo bench --package bt-setup-core --bench ini_bench
//! ```

use bt_setup_core::domain::router::{CRASH_REPORT_SECTION, DATA_ROUTER_URL_KEY};
use bt_setup_core::IniDocument;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// ── Fixture builders ──────────────────────────────────────────────────────────

/// Builds an INI text with `sections` sections of 20 entries each, followed by
/// a `[CrashReportClient]` section.
fn build_ini_text(sections: usize) -> String {
    let mut text = String::new();
    for s in 0..sections {
        text.push_str(&format!("[/Script/Module{s}.Settings]\n"));
        for k in 0..20 {
            text.push_str(&format!("Key{k}=Value {s}-{k}\n"));
        }
        text.push_str("; separator\n\n");
    }
    text.push_str("[CrashReportClient]\nDataRouterUrl=https://example.invalid/\n");
    text
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("ini_parse");
    for &sections in &[10usize, 100, 500] {
        let text = build_ini_text(sections);
        group.bench_with_input(BenchmarkId::new("sections", sections), &text, |b, text| {
            b.iter(|| IniDocument::parse(black_box(text)))
        });
    }
    group.finish();
}

fn bench_set_router_url(c: &mut Criterion) {
    let doc = IniDocument::parse(&build_ini_text(100));
    let mut group = c.benchmark_group("ini_set");

    group.bench_function("update_existing_key_100_sections", |b| {
        b.iter(|| {
            let mut doc = doc.clone();
            doc.set(
                CRASH_REPORT_SECTION,
                DATA_ROUTER_URL_KEY,
                black_box("https://unreal.backtrace.io/post/realm/token"),
            )
            .expect("valid key");
            doc
        })
    });

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let doc = IniDocument::parse(&build_ini_text(100));
    c.bench_function("ini_render_100_sections", |b| {
        b.iter(|| black_box(&doc).to_string())
    });
}

criterion_group!(benches, bench_parse, bench_set_router_url, bench_render);
criterion_main!(benches);
