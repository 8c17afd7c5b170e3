use crate::core::embedder::{EmbedderError, EmbeddingModel};
use async_trait::async_trait;

const WORD_WEIGHT: f32 = 1.0;
const BIGRAM_WEIGHT: f32 = 0.5;

/// Local embedding model based on feature hashing
///
/// Lower-cased word tokens and the character bigrams inside each word are
/// hashed (FNV-1a, signed) into a fixed number of buckets and the result is
/// L2-normalised. Texts sharing words and letter pairs point in similar
/// directions; the model needs no weights and is fully deterministic.
#[derive(Debug, Clone)]
pub struct HashedNgramModel {
    dimension: usize,
}

impl HashedNgramModel {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    /// Synchronous embedding, shared by the async trait method and benches
    pub fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbedderError> {
        let mut vector = vec![0.0_f32; self.dimension];
        let mut features = 0usize;

        for token in tokenize(text) {
            self.add_feature(&mut vector, token.as_bytes(), 0, WORD_WEIGHT);
            features += 1;

            let chars: Vec<char> = token.chars().collect();
            for pair in chars.windows(2) {
                let bigram: String = pair.iter().collect();
                self.add_feature(&mut vector, bigram.as_bytes(), 1, BIGRAM_WEIGHT);
                features += 1;
            }
        }

        if features == 0 || !normalize(&mut vector) {
            return Err(EmbedderError::Degenerate);
        }
        Ok(vector)
    }

    #[inline]
    fn add_feature(&self, vector: &mut [f32], bytes: &[u8], seed: u64, weight: f32) {
        let hash = fnv1a(bytes, seed);
        let bucket = (hash % self.dimension as u64) as usize;
        // top bit of the hash picks the sign
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }
}

#[async_trait]
impl EmbeddingModel for HashedNgramModel {
    fn name(&self) -> &str {
        "hashed-ngram"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedderError> {
        self.embed_text(text)
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
}

/// Returns false when the vector has no magnitude
fn normalize(vector: &mut [f32]) -> bool {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm <= f32::EPSILON {
        return false;
    }
    for value in vector.iter_mut() {
        *value /= norm;
    }
    true
}

fn fnv1a(bytes: &[u8], seed: u64) -> u64 {
    let mut hash = 0xcbf29ce484222325_u64 ^ seed.wrapping_mul(0x9e3779b97f4a7c15);
    for byte in bytes {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x00000100000001b3);
    }
    hash
}
