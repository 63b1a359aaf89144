//! Maximal marginal relevance selection.
//!
//! MMR re-scores retrieval candidates to balance relevance against
//! diversity among the already-selected set:
//!
//! `MMR = λ × sim(query, candidate) − (1−λ) × max sim(candidate, selected)`
//!
//! λ = 1.0 is pure relevance, λ = 0.0 pure diversity.

use dqa_rag::SearchResult;

/// Cosine similarity of two vectors; 0.0 when either has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// MMR score of one candidate against the query and the selected set.
fn mmr_score(query: &[f32], candidate: &SearchResult, selected: &[SearchResult], lambda: f32) -> f32 {
    let relevance = cosine_similarity(query, &candidate.chunk.embedding);
    let max_selected_similarity = selected
        .iter()
        .map(|s| cosine_similarity(&candidate.chunk.embedding, &s.chunk.embedding))
        .fold(0.0f32, f32::max);
    lambda * relevance - (1.0 - lambda) * max_selected_similarity
}

/// Select up to `k` results from `candidates`, greedily maximising MMR.
///
/// `candidates` should arrive ordered by descending relevance; the output
/// preserves the greedy selection order (most relevant first, diversity
/// folded in from the second pick on).
pub fn mmr_select(
    query: &[f32],
    mut candidates: Vec<SearchResult>,
    k: usize,
    lambda: f32,
) -> Vec<SearchResult> {
    if candidates.is_empty() || k == 0 {
        return Vec::new();
    }

    let k = k.min(candidates.len());
    let mut selected: Vec<SearchResult> = Vec::with_capacity(k);

    while selected.len() < k && !candidates.is_empty() {
        let mut best_index = 0;
        let mut best_score = f32::NEG_INFINITY;
        for (index, candidate) in candidates.iter().enumerate() {
            let score = mmr_score(query, candidate, &selected, lambda);
            if score > best_score {
                best_score = score;
                best_index = index;
            }
        }
        selected.push(candidates.remove(best_index));
    }

    selected
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use dqa_rag::Chunk;

    use super::*;

    fn candidate(id: &str, score: f32, embedding: Vec<f32>) -> SearchResult {
        SearchResult {
            chunk: Chunk {
                id: id.to_string(),
                text: String::new(),
                embedding,
                metadata: HashMap::new(),
                document_id: "doc".to_string(),
            },
            score,
        }
    }

    #[test]
    fn empty_candidates_select_nothing() {
        assert!(mmr_select(&[1.0, 0.0], Vec::new(), 5, 0.5).is_empty());
    }

    #[test]
    fn k_zero_selects_nothing() {
        let candidates = vec![candidate("a", 0.9, vec![1.0, 0.0])];
        assert!(mmr_select(&[1.0, 0.0], candidates, 0, 0.5).is_empty());
    }

    #[test]
    fn selection_is_bounded_by_candidates() {
        let candidates = vec![candidate("a", 0.9, vec![1.0, 0.0])];
        assert_eq!(mmr_select(&[1.0, 0.0], candidates, 10, 0.5).len(), 1);
    }

    #[test]
    fn pure_relevance_preserves_order() {
        let query = vec![1.0, 0.0];
        let candidates = vec![
            candidate("best", 0.9, vec![0.9, 0.1]),
            candidate("second", 0.85, vec![0.88, 0.12]),
            candidate("third", 0.5, vec![0.5, 0.5]),
        ];
        let selected = mmr_select(&query, candidates, 3, 1.0);
        assert_eq!(selected[0].chunk.id, "best");
        assert_eq!(selected[1].chunk.id, "second");
        assert_eq!(selected[2].chunk.id, "third");
    }

    #[test]
    fn balanced_lambda_prefers_diverse_over_near_duplicate() {
        let query = vec![1.0, 0.0, 0.0];
        let candidates = vec![
            candidate("relevant", 0.95, vec![0.99, 0.01, 0.0]),
            candidate("duplicate", 0.94, vec![0.98, 0.02, 0.0]),
            candidate("orthogonal", 0.7, vec![0.0, 0.0, 1.0]),
        ];
        let selected = mmr_select(&query, candidates, 2, 0.5);
        assert_eq!(selected[0].chunk.id, "relevant");
        assert_eq!(selected[1].chunk.id, "orthogonal", "near-duplicate should lose to the diverse pick");
    }
}
