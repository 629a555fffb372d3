use crate::state::sample_table::ValueDomain;

/// Relative position of `handle` within `domain`, or `None` when the domain
/// has zero width.
pub fn handle_fraction(domain: ValueDomain, handle: f64) -> Option<f64> {
    if domain.is_degenerate() {
        None
    } else {
        Some((handle - domain.from) / domain.width())
    }
}

/// Re-anchor one handle from `old` to `new`, keeping its fraction of the domain.
/// A zero-width `old` domain counts as fraction 0.
pub fn remap_handle(old: ValueDomain, new: ValueDomain, handle: f64) -> f64 {
    remap_handle_or(old, new, handle, 0.0)
}

/// Same as [`remap_handle`] with an explicit fraction for a zero-width `old` domain.
pub fn remap_handle_or(
    old: ValueDomain,
    new: ValueDomain,
    handle: f64,
    degenerate_fraction: f64,
) -> f64 {
    let fraction = handle_fraction(old, handle).unwrap_or(degenerate_fraction);
    new.from + fraction * new.width()
}

/// Remap every handle against the same `old` snapshot.
pub fn remap(old: ValueDomain, new: ValueDomain, handles: &[f64]) -> Vec<f64> {
    handles.iter().map(|&h| remap_handle(old, new, h)).collect()
}
