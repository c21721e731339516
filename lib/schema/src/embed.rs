//! Deterministic text embedding for the embedded engine
//!
//! Hashes character trigrams and words into a fixed-size vector. The
//! model identifier seeds every hash, so two text spaces configured
//! with different models occupy unrelated coordinate systems. The same
//! (model, text) pair always produces the identical vector, which is
//! what makes document upserts idempotent and tests reproducible.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use rankx_core::Vector;

/// Default dimension for text embeddings
pub const DEFAULT_TEXT_DIM: usize = 256;

/// Embed a text value into a normalized dense vector
pub fn embed_text(text: &str, model: &str, dim: usize) -> Vector {
    let mut components = vec![0.0f32; dim];
    let normalized = text.to_lowercase();
    if normalized.trim().is_empty() {
        return Vector::new(components);
    }

    for trigram in generate_trigrams(&normalized) {
        let pos = seeded_hash(model, &trigram) as usize % dim;
        components[pos] += 1.0;
    }

    // Words contribute more than trigrams
    for word in normalized.split_whitespace() {
        let pos = seeded_hash(model, word) as usize % dim;
        components[pos] += 2.0;
    }

    let mut vector = Vector::new(components);
    vector.normalize();
    vector
}

fn seeded_hash(model: &str, token: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    model.hash(&mut hasher);
    token.hash(&mut hasher);
    hasher.finish()
}

/// Generate character trigrams from a string
fn generate_trigrams(s: &str) -> HashSet<String> {
    let padded = format!("  {}  ", s);
    let chars: Vec<char> = padded.chars().collect();

    if chars.len() < 3 {
        return HashSet::new();
    }

    chars
        .windows(3)
        .map(|w| w.iter().collect::<String>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = "test-model";

    #[test]
    fn test_embedding_is_deterministic() {
        let a = embed_text("books on psychology", MODEL, 128);
        let b = embed_text("books on psychology", MODEL, 128);
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn test_embedding_is_normalized() {
        let v = embed_text("a classic history of rome", MODEL, 128);
        assert!((v.norm() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_similar_texts_are_close() {
        let a = embed_text("prosciutto cotto", MODEL, 128);
        let b = embed_text("prosciutto crudo", MODEL, 128);
        let c = embed_text("graphics card benchmark", MODEL, 128);

        assert!(a.cosine_similarity(&b) > a.cosine_similarity(&c));
    }

    #[test]
    fn test_model_seed_separates_spaces() {
        let a = embed_text("psychology", "model-a", 128);
        let b = embed_text("psychology", "model-b", 128);
        assert_ne!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let v = embed_text("", MODEL, 16);
        assert!(v.as_slice().iter().all(|x| *x == 0.0));
    }
}
