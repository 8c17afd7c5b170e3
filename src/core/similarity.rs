use crate::core::embedder::{Embedding, TextEmbedder};
use crate::models::{Answers, Profile, QuestionKey};

/// Cosine similarity between two raw vectors. Range: -1 to 1.
///
/// Mismatched lengths or zero-magnitude input give 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom > 0.0 {
        dot / denom
    } else {
        0.0
    }
}

/// Similarity of two embeddings in [0, 1]
///
/// Negative cosine is clamped to 0 and the "no embedding" sentinel on either
/// side gives 0. A vector compared with itself is exactly 1.
pub fn similarity(a: &Embedding, b: &Embedding) -> f64 {
    match (a.as_slice(), b.as_slice()) {
        (Some(x), Some(y)) if x == y => 1.0,
        (Some(x), Some(y)) => cosine_similarity(x, y).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Similarity of two free-text fields, 0 when either is blank
pub async fn text_similarity(embedder: &TextEmbedder, a: &str, b: &str) -> f64 {
    if a.trim().is_empty() || b.trim().is_empty() {
        return 0.0;
    }
    let (left, right) = futures::join!(embedder.embed(a), embedder.embed(b));
    similarity(&left, &right)
}

/// Similarity between two bios
pub async fn bio_similarity(embedder: &TextEmbedder, a: &Profile, b: &Profile) -> f64 {
    text_similarity(embedder, &a.bio, &b.bio).await
}

/// Mean similarity over the questions both profiles answered
///
/// Questions left empty on either side are skipped entirely rather than
/// counted as 0; with no question answered by both the result is 0.
pub async fn answer_similarity(embedder: &TextEmbedder, a: &Answers, b: &Answers) -> f64 {
    let shared: Vec<(&str, &str)> = QuestionKey::ALL
        .iter()
        .filter_map(|key| Some((a.get(*key)?, b.get(*key)?)))
        .collect();

    if shared.is_empty() {
        return 0.0;
    }

    let scores = futures::future::join_all(
        shared
            .iter()
            .map(|(left, right)| text_similarity(embedder, left, right)),
    )
    .await;

    scores.iter().sum::<f64>() / scores.len() as f64
}
