//! Splitting a full variable vector into fixed and free parts, and merging
//! a reduced vector back into full declaration order

use crate::optimize::SweepError;

/// Check that two fixed indices are distinct and address a vector of `len`
/// entries
pub fn check_indices(len: usize, index_0: usize, index_1: usize) -> Result<(), SweepError> {
    if index_0 == index_1 || index_0 >= len || index_1 >= len {
        return Err(SweepError::InvalidIndex {
            index_0,
            index_1,
            len,
        });
    }
    Ok(())
}

/// Remove the two fixed entries from a full list, preserving the relative
/// order of everything else
///
/// Generic over the element type so the same routine reduces candidate
/// vectors and [`crate::optimize::variable::VariableSpec`] lists.
pub fn reduce<T: Clone>(full: &[T], index_0: usize, index_1: usize) -> Result<Vec<T>, SweepError> {
    check_indices(full.len(), index_0, index_1)?;
    Ok(full
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index_0 && *i != index_1)
        .map(|(_, v)| v.clone())
        .collect())
}

/// Rebuild the full vector from a reduced one by placing the two fixed
/// values back at their original positions
///
/// The fill is a single pass over the full-length output, so the result is
/// identical no matter which of the two indices is numerically larger.
pub fn reinsert(
    free: &[f64],
    index_0: usize,
    value_0: f64,
    index_1: usize,
    value_1: f64,
) -> Result<Vec<f64>, SweepError> {
    let len = free.len() + 2;
    check_indices(len, index_0, index_1)?;
    let mut full = vec![0.0; len];
    let mut cursor = 0;
    for (i, slot) in full.iter_mut().enumerate() {
        if i == index_0 {
            *slot = value_0;
        } else if i == index_1 {
            *slot = value_1;
        } else {
            *slot = free[cursor];
            cursor += 1;
        }
    }
    Ok(full)
}
