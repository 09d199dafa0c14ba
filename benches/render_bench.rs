use criterion::{criterion_group, criterion_main, Criterion};

use certpress::{Composer, ComposerConfig, ExportOptions, Theme, VerificationToken};

fn pinned_composer() -> Composer {
    let mut composer =
        Composer::new(ComposerConfig::default(), Theme::elite()).expect("failed to create composer");
    composer.set_recipient_name("Jane Doe");
    composer.set_issuer_name("Grace Hopper");
    composer.set_issue_date_display("1 January 2026");
    composer.set_verification(VerificationToken::from_parts("CP", 2026, 123456));
    composer
}

fn bench_render(c: &mut Criterion) {
    let mut composer = pinned_composer();
    c.bench_function("render_scale1", |b| {
        b.iter(|| {
            // Touch the draft so every iteration re-renders instead of
            // hitting the cache
            composer.set_issuer_name("Grace Hopper");
            let _ = composer.render(1).expect("render");
        })
    });
}

fn bench_export(c: &mut Criterion) {
    let mut composer = pinned_composer();
    c.bench_function("export_scale2", |b| {
        b.iter(|| {
            composer.set_issuer_name("Grace Hopper");
            let _ = composer.export(&ExportOptions::default()).expect("export");
        })
    });
}

fn bench_cached_export(c: &mut Criterion) {
    let mut composer = pinned_composer();
    c.bench_function("export_scale2_cached", |b| {
        b.iter(|| {
            let _ = composer.export(&ExportOptions::default()).expect("export");
        })
    });
}

criterion_group!(benches, bench_render, bench_export, bench_cached_export);
criterion_main!(benches);
