use beat_title_generator::llm::fallback_rephrase;
use beat_title_generator::titles::scraper::extract_titles;
use beat_title_generator::clean_title;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use scraper::Html;

const RAW_TITLES: [&str; 6] = [
    "[FREE] Drake Type Beat - \"Midnight Run\" (Prod. by Someone)",
    "Travis Scott x Future Type Beat 2024 | Neon Dreams 140bpm",
    "(FREE) Lil Baby Type Beat \"Cold Streets\" | Hard Trap Instrumental",
    "🔥 VIRAL 🔥 Velvet Mood - R&B Beat $29.99 Buy 2 Get 1 Free",
    "Summer Nights (Official Audio)",
    "Golden Era Boom Bap Beat Prod. Dusty Fingers",
];

fn bench_clean_title(c: &mut Criterion) {
    c.bench_function("clean_title_batch", |b| {
        b.iter(|| {
            for raw in RAW_TITLES {
                black_box(clean_title(black_box(raw)));
            }
        })
    });

    c.bench_function("clean_title_sentinel", |b| {
        b.iter(|| black_box(clean_title(black_box("[free] (2024)"))))
    });
}

fn bench_extract_titles(c: &mut Criterion) {
    let items: String = RAW_TITLES
        .iter()
        .cycle()
        .take(60)
        .enumerate()
        .map(|(i, raw)| format!("<div class=\"beat-card\"><h3 class=\"track-title\">{} {}</h3></div>", raw, i))
        .collect();
    let page = format!("<html><body>{}</body></html>", items);

    c.bench_function("extract_titles_page", |b| {
        b.iter(|| {
            let document = Html::parse_document(black_box(&page));
            black_box(extract_titles(&document, 20))
        })
    });
}

fn bench_fallback_rephrase(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    c.bench_function("fallback_rephrase", |b| {
        b.iter(|| black_box(fallback_rephrase(black_box("Dark City Night Dreams"), &mut rng)))
    });
}

criterion_group!(benches, bench_clean_title, bench_extract_titles, bench_fallback_rephrase);
criterion_main!(benches);
