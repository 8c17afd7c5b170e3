// Criterion benchmarks for Kindred Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kindred_match::core::{
    cosine_similarity, is_eligible, FallbackSupplier, HashedNgramModel, Matcher, ProfileGenerator,
    StaticModelProvider, TextEmbedder,
};
use kindred_match::models::{Answers, Gender, Profile, QuestionKey};
use kindred_match::services::InMemoryPoolStore;
use std::sync::Arc;
use std::time::Duration;

const BIOS: [&str; 4] = [
    "Love hiking mountains and strong coffee",
    "Bookworm who enjoys quiet evenings and tea",
    "Gym rat and amateur chef",
    "Jazz pianist, night owl, city lover",
];
const HOBBIES: [&str; 3] = ["hiking", "reading", "cooking"];

fn create_candidate(id: usize) -> Profile {
    Profile {
        id: id.to_string(),
        username: format!("User {}", id),
        bio: BIOS[id % BIOS.len()].to_string(),
        gender: if id % 2 == 0 {
            Gender::Female
        } else {
            Gender::Male
        },
        gender_seeking: Gender::Male,
        age: 22 + (id % 12) as u8,
        answers: Answers::default()
            .with(QuestionKey::Hobby, HOBBIES[id % HOBBIES.len()])
            .with(QuestionKey::Music, "indie folk"),
        age_range_preference: None,
    }
}

fn create_seeker() -> Profile {
    Profile {
        id: "seeker".to_string(),
        username: "Seeker".to_string(),
        bio: BIOS[0].to_string(),
        gender: Gender::Male,
        gender_seeking: Gender::Female,
        age: 27,
        answers: Answers::default()
            .with(QuestionKey::Hobby, "hiking")
            .with(QuestionKey::Music, "indie folk"),
        age_range_preference: None,
    }
}

fn create_matcher() -> Matcher {
    let embedder = TextEmbedder::new(
        Arc::new(StaticModelProvider::new(Arc::new(HashedNgramModel::new(
            384,
        )))),
        100_000,
        Duration::from_secs(2),
    );
    let fallback = FallbackSupplier::new(
        Arc::new(InMemoryPoolStore::new()),
        ProfileGenerator::seeded(1),
    );
    Matcher::new(Arc::new(embedder), Arc::new(fallback))
}

fn bench_hashed_embedding(c: &mut Criterion) {
    let model = HashedNgramModel::new(384);
    c.bench_function("hashed_embedding", |b| {
        b.iter(|| {
            model.embed_text(black_box(
                "Weekend climber who loves jazz bars and spicy ramen",
            ))
        });
    });
}

fn bench_cosine_similarity(c: &mut Criterion) {
    let model = HashedNgramModel::new(384);
    let a = model
        .embed_text("Love hiking mountains and strong coffee")
        .unwrap_or_default();
    let b = model
        .embed_text("Hiking on weekends, coffee every morning")
        .unwrap_or_default();

    c.bench_function("cosine_similarity_384", |bench| {
        bench.iter(|| cosine_similarity(black_box(&a), black_box(&b)));
    });
}

fn bench_eligibility(c: &mut Criterion) {
    let seeker = create_seeker();
    let candidates: Vec<Profile> = (0..1000).map(create_candidate).collect();

    c.bench_function("eligibility_1000_candidates", |b| {
        b.iter(|| {
            candidates
                .iter()
                .filter(|p| is_eligible(&seeker, p))
                .count()
        });
    });
}

fn bench_ranking(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let matcher = create_matcher();
    let seeker = create_seeker();

    let mut group = c.benchmark_group("ranking");

    for candidate_count in [10, 50, 100, 500, 1000].iter() {
        let candidates: Vec<Profile> = (0..*candidate_count).map(create_candidate).collect();

        group.bench_with_input(
            BenchmarkId::new("rank", candidate_count),
            candidate_count,
            |b, _| {
                b.to_async(&runtime)
                    .iter(|| matcher.rank(black_box(&seeker), black_box(&candidates)));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_hashed_embedding,
    bench_cosine_similarity,
    bench_eligibility,
    bench_ranking
);

criterion_main!(benches);
