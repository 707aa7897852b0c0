//! Weighted and uniform draws over a caller-supplied random source.
//!
//! The core never creates its own generator. Every function takes the
//! caller's `Rng`, so a seeded generator reproduces a whole draft or match.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::error::{GameError, Result};

/// Draw an index with probability proportional to its weight.
///
/// When every weight is zero the draw is uniform. Empty, negative or
/// non-finite weights are rejected.
pub fn weighted_index<R: Rng + ?Sized>(rng: &mut R, weights: &[f64]) -> Result<usize> {
    if !weights.is_empty() && weights.iter().all(|&w| w == 0.0) {
        return Ok(rng.gen_range(0..weights.len()));
    }
    let dist = WeightedIndex::new(weights)
        .map_err(|e| GameError::InvalidWeights(format!("{e} ({} weights)", weights.len())))?;
    Ok(dist.sample(rng))
}

/// Draw one item with probability proportional to `weight(item)`.
pub fn choose_weighted<'a, T, R, F>(rng: &mut R, items: &'a [T], weight: F) -> Result<&'a T>
where
    R: Rng + ?Sized,
    F: Fn(&T) -> f64,
{
    let weights: Vec<f64> = items.iter().map(weight).collect();
    let index = weighted_index(rng, &weights)?;
    Ok(&items[index])
}

/// Draw one item uniformly, `None` when empty.
pub fn choose_uniform<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    Some(&items[rng.gen_range(0..items.len())])
}

/// Bernoulli trial.
pub fn roll<R: Rng + ?Sized>(rng: &mut R, chance: f64) -> bool {
    rng.gen_bool(chance.clamp(0.0, 1.0))
}
