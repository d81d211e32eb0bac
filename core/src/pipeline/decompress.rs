//! Decompress

use crate::ray::*;
use rayon::prelude::*;

/// Decode a loaded batch into working rays, replacing the contents of `rays`.
///
/// * `bytes` - The batch file contents.
/// * `rays`  - Receives the decoded rays.
pub fn decompress(bytes: &[u8], rays: &mut Vec<Ray>) {
    assert_eq!(bytes.len() % CompressedRay::SIZE, 0, "partial ray record in batch");
    bytes
        .par_chunks_exact(CompressedRay::SIZE)
        .map(|record| decode(&CompressedRay::read(record)))
        .collect_into_vec(rays);
}
