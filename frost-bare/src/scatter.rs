#![cfg(feature = "build")]

use alloc::vec::Vec;

/// Move `source[i]` to position `positions[i]` of the result.
///
/// `positions` must be a permutation of `0..source.len()`.
pub(crate) fn scatter<T>(source: Vec<T>, positions: &[u32]) -> Vec<T> {
    let mut destination: Vec<Option<T>> = (0..source.len()).map(|_| None).collect();
    for (element, &position) in source.into_iter().zip(positions) {
        destination[position as usize] = Some(element);
    }
    let result: Vec<T> = destination.into_iter().flatten().collect();
    debug_assert_eq!(
        result.len(),
        positions.len(),
        "positions are not a permutation"
    );
    result
}
