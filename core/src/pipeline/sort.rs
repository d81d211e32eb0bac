//! Sorting
//!
//! Two orderings are applied to every batch. The traversal order interleaves
//! Morton codes of the normalized origin and direction so that rays handed to
//! the intersector in sequence are spatially and angularly close. The shading
//! order groups rays by hit surface and primitive and moves every ray that is
//! not shaded (misses and shadow rays) to the end.

use super::bounds::*;
use crate::geometry::*;
use crate::ray::*;
use rayon::prelude::*;
use std::ops::Range;

/// Shading key of rays that are not shaded.
pub const TERMINAL_KEY: (u32, u32) = (u32::MAX, u32::MAX);

/// Returns the traversal key of a ray relative to its batch bounds.
///
/// * `bounds` - Bounds of the batch.
/// * `ray`    - The ray.
#[inline]
pub fn traversal_key(bounds: &RayBounds, ray: &Ray) -> u64 {
    let o = encode_morton_3(&bounds.origin.offset(&ray.o)) as u64;
    let d = encode_morton_3(&bounds.direction.offset(&ray.d)) as u64;
    (o << (3 * MORTON_BITS)) | d
}

/// Sort a batch into traversal order.
///
/// * `bounds` - Bounds of the batch.
/// * `rays`   - The batch.
pub fn traversal_sort(bounds: &RayBounds, rays: &mut [Ray]) {
    rays.par_sort_by_cached_key(|r| traversal_key(bounds, r));
}

/// Returns the shading key of an intersected ray.
///
/// * `ray` - The ray.
#[inline]
pub fn shading_key(ray: &Ray) -> (u32, u32) {
    match ray.hit {
        Some(hit) if !ray.is_shadow() => (hit.surface, hit.primitive),
        _ => TERMINAL_KEY,
    }
}

/// Sort an intersected batch into shading order. Returns the index of the
/// first ray that is not shaded.
///
/// * `rays` - The batch.
pub fn shading_sort(rays: &mut [Ray]) -> usize {
    rays.par_sort_unstable_by_key(shading_key);
    rays.partition_point(|r| shading_key(r) != TERMINAL_KEY)
}

/// Split a sorted, non-empty slice into runs of equal keys, each at most `cap`
/// long. Concatenating the runs reproduces the slice.
///
/// * `items` - The sorted slice.
/// * `cap`   - Maximum run length.
/// * `key`   - Run key of an item.
pub fn partition_runs_by<T, K, F>(items: &[T], cap: usize, key: F) -> Vec<Range<usize>>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    assert!(!items.is_empty(), "partition_runs_by(): empty range");
    assert!(cap > 0, "partition_runs_by(): zero run length");

    let mut runs = vec![];
    let mut start = 0;
    let mut start_key = key(&items[0]);
    for (i, item) in items.iter().enumerate().skip(1) {
        let k = key(item);
        if k != start_key || i - start == cap {
            runs.push(start..i);
            start = i;
            start_key = k;
        }
    }
    runs.push(start..items.len());
    runs
}

/// Split the shaded prefix of a batch into runs sharing a hit surface.
///
/// * `rays`         - The shaded prefix of a batch in shading order.
/// * `shading_size` - Maximum run length.
pub fn partition_runs(rays: &[Ray], shading_size: usize) -> Vec<Range<usize>> {
    partition_runs_by(rays, shading_size, |r| shading_key(r).0)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
