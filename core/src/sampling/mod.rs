//! Sampling

use crate::common::*;
use crate::geometry::*;
use crate::rng::*;

/// Generate `nx * ny` stratified 2D samples in [0, 1)^2 in row-major cell
/// order: sample `j * nx + i` lies in cell (`i`, `j`).
///
/// * `rng`    - Random number generator.
/// * `nx`     - Number of cells in x-direction.
/// * `ny`     - Number of cells in y-direction.
/// * `jitter` - Jitter the samples; otherwise use cell centres.
/// * `out`    - Receives the samples.
pub fn stratified_sample_2d(rng: &mut RNG, nx: usize, ny: usize, jitter: bool, out: &mut Vec<Point2f>) {
    let dx = 1.0 / nx as Float;
    let dy = 1.0 / ny as Float;

    out.clear();
    for y in 0..ny {
        for x in 0..nx {
            let jx = if jitter { rng.uniform_float() } else { 0.5 };
            let jy = if jitter { rng.uniform_float() } else { 0.5 };
            out.push(Point2f::new(
                min((x as Float + jx) * dx, ONE_MINUS_EPSILON),
                min((y as Float + jy) * dy, ONE_MINUS_EPSILON),
            ));
        }
    }
}

/// Sample a point on a unit disk by mapping from a unit square to the unit
/// circle. The concentric mapping takes points in [-1, 1]^2 to unit disk by
/// uniformly mapping concentric squares to concentric circles.
///
/// * `u` - The random sample point.
pub fn concentric_sample_disk(u: &Point2f) -> Point2f {
    // Map uniform random numbers to [-1,1]^2.
    let u_offset = Point2f::new(2.0 * u.x - 1.0, 2.0 * u.y - 1.0);

    // Handle degeneracy at the origin.
    if u_offset.x == 0.0 && u_offset.y == 0.0 {
        return Point2f::zero();
    }

    // Apply concentric mapping to point
    let (r, theta) = if u_offset.x.abs() > u_offset.y.abs() {
        (u_offset.x, PI_OVER_FOUR * (u_offset.y / u_offset.x))
    } else {
        (u_offset.y, PI_OVER_TWO - PI_OVER_FOUR * (u_offset.x / u_offset.y))
    };

    Point2f::new(r * theta.cos(), r * theta.sin())
}

/// Cosine-weighted sample of the hemisphere about `(0, 0, 1)` using Malley's
/// method.
///
/// * `u` - The random sample point.
#[inline]
pub fn cosine_sample_hemisphere(u: &Point2f) -> Vector3f {
    let d = concentric_sample_disk(u);
    let z = max(0.0, 1.0 - d.x * d.x - d.y * d.y).sqrt();
    Vector3f::new(d.x, d.y, z)
}

/// Returns the PDF for cosine-weighted hemisphere sampling.
///
/// * `cos_theta` - Cosine of the angle from the pole.
#[inline]
pub fn cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    cos_theta * INV_PI
}

/// Returns `v`, given in the local frame whose z-axis is `n`, in world space.
///
/// * `v` - Local direction.
/// * `n` - Unit normal.
#[inline]
pub fn local_to_world(v: &Vector3f, n: &Vector3f) -> Vector3f {
    let (s, t) = n.coordinate_system();
    s * v.x + t * v.y + *n * v.z
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
