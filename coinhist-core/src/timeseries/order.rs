use crate::price::PricePoint;

/// Sort a series newest-first. Stable: points sharing a timestamp keep their
/// relative order. Duplicates are kept.
pub fn newest_first(points: &mut [PricePoint]) {
    points.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// True when timestamps never increase along the slice.
#[must_use]
pub fn is_newest_first(points: &[PricePoint]) -> bool {
    points.windows(2).all(|w| w[0].timestamp >= w[1].timestamp)
}
