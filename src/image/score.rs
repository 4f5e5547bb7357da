//! Heuristic ranking of competing image candidates.
//!
//! The weights are empirically tuned, not principled; they are kept as
//! named constants so they can be adjusted without touching the logic.

use crate::image::{ImageCandidate, ImageSource};

/// Width/height band considered ideal for a card thumbnail.
const IDEAL_WIDTH: std::ops::RangeInclusive<u32> = 300..=800;
const IDEAL_HEIGHT: std::ops::RangeInclusive<u32> = 200..=600;

const IDEAL_BAND_SCORE: i32 = 100;
const GOOD_SIZE_SCORE: i32 = 80;
const KNOWN_SIZE_SCORE: i32 = 40;
const UNKNOWN_SIZE_SCORE: i32 = 20;
const LANDSCAPE_BONUS: i32 = 20;
const OVERSIZED_PENALTY: i32 = -30;
const STRUCTURED_SOURCE_BONUS: i32 = 10;
const TINY_PENALTY: i32 = -50;

/// Additive adjustments applied after the dimension band, as
/// (predicate, weight) pairs.
const ADJUSTMENTS: &[(fn(&ImageCandidate) -> bool, i32)] = &[
    (|c| c.width > c.height, LANDSCAPE_BONUS),
    (|c| c.width > 1200 || c.height > 800, OVERSIZED_PENALTY),
    (
        |c| matches!(c.source, ImageSource::MediaContent),
        STRUCTURED_SOURCE_BONUS,
    ),
    (|c| c.width > 0 && c.width < 100, TINY_PENALTY),
];

/// Mutually exclusive dimension band, favoring thumbnail-sized images
/// over unknown or extreme dimensions.
fn dimension_score(c: &ImageCandidate) -> i32 {
    if IDEAL_WIDTH.contains(&c.width) && IDEAL_HEIGHT.contains(&c.height) {
        IDEAL_BAND_SCORE
    } else if c.width >= 200 && c.height >= 150 {
        GOOD_SIZE_SCORE
    } else if c.width.saturating_mul(c.height) > 0 {
        KNOWN_SIZE_SCORE
    } else {
        UNKNOWN_SIZE_SCORE
    }
}

pub fn score(candidate: &ImageCandidate) -> i32 {
    let mut total = dimension_score(candidate);
    for (applies, weight) in ADJUSTMENTS {
        if applies(candidate) {
            total += weight;
        }
    }
    total
}

/// Picks the highest-scoring candidate's URL.
///
/// Single-candidate lists skip scoring entirely. Ties resolve to discovery
/// order (the sort is stable).
pub fn select_best(candidates: &[ImageCandidate]) -> Option<String> {
    match candidates {
        [] => None,
        [only] => Some(only.url.clone()),
        _ => {
            let mut ranked: Vec<&ImageCandidate> = candidates.iter().collect();
            ranked.sort_by_key(|c| std::cmp::Reverse(score(c)));
            ranked.first().map(|c| c.url.clone())
        }
    }
}
