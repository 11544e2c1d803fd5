//! Shared inference utilities.

/// Returns the index and value of the highest score.
///
/// Ties resolve to the lowest index. Returns `None` for an empty slice.
#[must_use]
pub fn top1(scores: &[f32]) -> Option<(usize, f32)> {
    scores
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (index, score)| match best {
            Some((_, best_score)) if best_score >= score => best,
            _ => Some((index, score)),
        })
}
