//! Triangle Meshes

use core::common::*;
use core::geometry::*;
use core::ray::*;
use core::shape::*;

/// Padding added to mesh bounds so flat meshes have a non-degenerate box.
const BOUNDS_PADDING: Float = 1e-4;

/// A mesh of triangles sharing a vertex list.
#[derive(Clone, Debug)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3f>,

    /// Vertex indices, three per triangle.
    pub indices: Vec<[u32; 3]>,

    /// Optional per-vertex surface parameters.
    pub uvs: Option<Vec<Point2f>>,

    /// Cached bounds.
    bounds: Bounds3f,
}

impl TriangleMesh {
    /// Create a new triangle mesh.
    ///
    /// * `vertices` - Vertex positions.
    /// * `indices`  - Vertex indices, three per triangle.
    /// * `uvs`      - Optional per-vertex surface parameters.
    pub fn new(vertices: Vec<Point3f>, indices: Vec<[u32; 3]>, uvs: Option<Vec<Point2f>>) -> Result<Self, String> {
        if indices.len() > u32::MAX as usize {
            return Err(format!("TriangleMesh::new(): too many triangles ({})", indices.len()));
        }
        if let Some(i) = indices.iter().flatten().find(|&&i| i as usize >= vertices.len()) {
            return Err(format!(
                "TriangleMesh::new(): vertex index {i} out of range for {} vertices",
                vertices.len()
            ));
        }
        if let Some(uv) = uvs.as_ref() {
            if uv.len() != vertices.len() {
                return Err(format!(
                    "TriangleMesh::new(): {} uvs for {} vertices",
                    uv.len(),
                    vertices.len()
                ));
            }
        }

        let pad = Vector3f::splat(BOUNDS_PADDING);
        let bounds = vertices.iter().fold(Bounds3f::EMPTY, |b, p| b.union_point(p));
        let bounds = if bounds.is_empty() {
            bounds
        } else {
            Bounds3f::new(bounds.p_min - pad, bounds.p_max + pad)
        };
        debug!("Triangle mesh with {} vertices, {} triangles", vertices.len(), indices.len());

        Ok(Self {
            vertices,
            indices,
            uvs,
            bounds,
        })
    }

    /// Create a parallelogram made of two triangles spanning `corner`,
    /// `corner + e1`, `corner + e1 + e2` and `corner + e2`. The front face
    /// normal is `e1 x e2`; uv (0, 0) is at `corner` and (1, 1) opposite.
    ///
    /// * `corner` - First corner.
    /// * `e1`     - First edge.
    /// * `e2`     - Second edge.
    pub fn quad(corner: Point3f, e1: Vector3f, e2: Vector3f) -> Result<Self, String> {
        if e1.cross(&e2).length_squared() == 0.0 {
            return Err(format!("TriangleMesh::quad(): degenerate edges {e1} and {e2}"));
        }
        Self::new(
            vec![corner, corner + e1, corner + e1 + e2, corner + e2],
            vec![[0, 1, 2], [0, 2, 3]],
            Some(vec![
                Point2f::new(0.0, 0.0),
                Point2f::new(1.0, 0.0),
                Point2f::new(1.0, 1.0),
                Point2f::new(0.0, 1.0),
            ]),
        )
    }

    /// Returns the number of triangles.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Intersect a single triangle using the Möller-Trumbore algorithm.
    /// Returns the parametric distance and barycentrics of the hit.
    fn intersect_triangle(&self, tri: &[u32; 3], ray: &Ray, t_max: Float) -> Option<(Float, Float, Float)> {
        let p0 = self.vertices[tri[0] as usize];
        let p1 = self.vertices[tri[1] as usize];
        let p2 = self.vertices[tri[2] as usize];

        let e1 = p1 - p0;
        let e2 = p2 - p0;
        let p = ray.d.cross(&e2);
        let det = e1.dot(&p);
        if det == 0.0 || det.is_nan() {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = ray.o - p0;
        let b1 = s.dot(&p) * inv_det;
        if !(0.0..=1.0).contains(&b1) {
            return None;
        }

        let q = s.cross(&e1);
        let b2 = ray.d.dot(&q) * inv_det;
        if b2 < 0.0 || b1 + b2 > 1.0 {
            return None;
        }

        let t = e2.dot(&q) * inv_det;
        if t <= ray.t_min || t > t_max {
            return None;
        }
        Some((t, b1, b2))
    }
}

impl Shape for TriangleMesh {
    /// Returns the world space bounding box.
    fn bounds(&self) -> Bounds3f {
        self.bounds
    }

    /// Returns the nearest intersection within `(ray.t_min, t_max]`.
    ///
    /// * `ray`   - The ray.
    /// * `t_max` - End of the search interval.
    fn intersect(&self, ray: &Ray, t_max: Float) -> Option<ShapeHit> {
        let mut nearest: Option<(usize, Float, Float, Float)> = None;
        let mut t_max = t_max;
        for (i, tri) in self.indices.iter().enumerate() {
            if let Some((t, b1, b2)) = self.intersect_triangle(tri, ray, t_max) {
                t_max = t;
                nearest = Some((i, t, b1, b2));
            }
        }

        let (i, t, b1, b2) = nearest?;
        let tri = &self.indices[i];
        let [p0, p1, p2] = tri.map(|v| self.vertices[v as usize]);
        let n = (p1 - p0).cross(&(p2 - p0)).normalize();

        let b0 = 1.0 - b1 - b2;
        let (u, v) = match self.uvs.as_ref() {
            Some(uvs) => {
                let [uv0, uv1, uv2] = tri.map(|v| uvs[v as usize]);
                (
                    b0 * uv0.x + b1 * uv1.x + b2 * uv2.x,
                    b0 * uv0.y + b1 * uv1.y + b2 * uv2.y,
                )
            }
            None => (b1, b2),
        };

        Some(ShapeHit {
            t,
            primitive: i as u32,
            u,
            v,
            n,
        })
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
