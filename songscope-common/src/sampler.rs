//! Bounded random sampling of song records
//!
//! The scatter plot never shows the whole collection: records are filtered to
//! those with finite values on both selected fields and a uniform random
//! subset of at most `limit` of them is drawn without replacement.

use rand::Rng;

use crate::songs::SongRecord;

/// Default number of songs drawn for the scatter plot
pub const DEFAULT_SAMPLE_SIZE: usize = 100;

/// Default number of songs drawn per group for the comparison histograms
pub const DEFAULT_COMPARISON_SAMPLE_SIZE: usize = 1000;

/// Shuffle `items` in place and keep the first `limit` of them
///
/// Fisher–Yates from the last position toward the first: position `i` is
/// swapped with a uniformly chosen `j` in `0..=i`. Any prefix of the result is
/// a uniform draw without replacement.
pub fn shuffle_take<T, R: Rng + ?Sized>(mut items: Vec<T>, limit: usize, rng: &mut R) -> Vec<T> {
    if limit == 0 || items.is_empty() {
        return Vec::new();
    }

    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }

    items.truncate(limit);
    items
}

/// Sample songs that have finite values for both `x_field` and `y_field`
///
/// Returns `min(limit, eligible)` distinct records. An unknown field or an
/// empty collection yields an empty sample.
pub fn sample_songs<'a, R: Rng + ?Sized>(
    records: &'a [SongRecord],
    x_field: &str,
    y_field: &str,
    limit: usize,
    rng: &mut R,
) -> Vec<&'a SongRecord> {
    let eligible: Vec<&SongRecord> = records
        .iter()
        .filter(|r| r.finite(x_field).is_some() && r.finite(y_field).is_some())
        .collect();

    shuffle_take(eligible, limit, rng)
}
