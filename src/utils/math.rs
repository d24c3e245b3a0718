//! Math utility functions

/// Argmax - index of the maximum value
///
/// Ties resolve to the first maximal index and NaN entries are ignored.
/// Returns `None` for an empty (or all-NaN) slice.
pub fn argmax(x: &[f32]) -> Option<usize> {
    x.iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .fold(None, |best: Option<(usize, f32)>, (idx, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((idx, v)),
        })
        .map(|(idx, _)| idx)
}
