//! Planar sectioning of triangle meshes.
//!
//! A section intersects every triangle with a plane, collects the resulting
//! segments and chains them into polylines expressed in 2D plane coordinates.

use hashbrown::HashMap;
use nalgebra::{Point2, Point3, Vector3};

use crate::error::{SectionError, SectionResult};
use crate::mesh::IndexedMesh;

/// An ordered sequence of 2D points.
///
/// A closed loop repeats its first point at the end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    points: Vec<Point2<f64>>,
}

impl Polyline {
    /// Create a polyline from points.
    #[must_use]
    pub const fn new(points: Vec<Point2<f64>>) -> Self {
        Self { points }
    }

    /// The points of the polyline.
    #[must_use]
    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when there are no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A polyline is closed when it has at least three distinct points and
    /// ends where it starts.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.points.len() > 3 && self.points.first() == self.points.last()
    }

    /// Min and max corners of the points, or `None` when empty.
    #[must_use]
    pub fn bounds(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        let first = *self.points.first()?;
        Some(self.points.iter().fold((first, first), |(lo, hi), p| {
            (
                Point2::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point2::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        }))
    }
}

/// The planar-section capability consumed by slicers.
///
/// Implementations may fail or return `None` for any given height; callers
/// treat both outcomes as an empty layer.
pub trait SectionAdapter: Send + Sync {
    /// Intersect `mesh` with the plane through `(0, 0, z)` with the given
    /// normal.
    ///
    /// Returns `Ok(None)` when the plane misses the mesh, otherwise one
    /// polyline per connected boundary, in plane coordinates.
    ///
    /// # Errors
    ///
    /// Implementation specific. The built-in [`TriangleSectioner`] reports
    /// empty meshes, zero normals and out-of-range face indices.
    fn section_at(
        &self,
        mesh: &IndexedMesh,
        z: f64,
        normal: &Vector3<f64>,
    ) -> SectionResult<Option<Vec<Polyline>>>;
}

/// Built-in [`SectionAdapter`] that intersects each triangle with the plane.
///
/// Vertices exactly on the plane count as below it, so a closed solid resting
/// on `Z = 0` yields its footprint outline when sectioned at `Z = 0`.
///
/// Segment endpoints are joined by exact position. Each crossing edge is
/// evaluated in a canonical vertex order, so triangles sharing an edge produce
/// bit-identical points even when the mesh is not welded.
///
/// # Example
///
/// ```
/// use plate_mesh::{IndexedMesh, Point3, SectionAdapter, TriangleSectioner, Vector3};
///
/// let block = IndexedMesh::cuboid(Point3::origin(), Point3::new(4.0, 2.0, 1.0));
/// let missed = TriangleSectioner.section_at(&block, 3.0, &Vector3::z()).unwrap();
/// assert!(missed.is_none());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TriangleSectioner;

impl SectionAdapter for TriangleSectioner {
    fn section_at(
        &self,
        mesh: &IndexedMesh,
        z: f64,
        normal: &Vector3<f64>,
    ) -> SectionResult<Option<Vec<Polyline>>> {
        let length = normal.norm();
        if length.is_nan() || length <= f64::EPSILON {
            return Err(SectionError::DegenerateNormal);
        }
        if mesh.is_empty() {
            return Err(SectionError::EmptyMesh);
        }

        let normal = normal / length;
        let origin = Point3::new(0.0, 0.0, z);
        let vertex_count = mesh.vertices.len();

        let mut segments = Vec::new();
        for (face_index, face) in mesh.faces.iter().enumerate() {
            let mut tri = [Point3::origin(); 3];
            for (slot, &index) in tri.iter_mut().zip(face) {
                *slot = *mesh.vertices.get(index as usize).ok_or(
                    SectionError::InvalidFace {
                        face: face_index,
                        index,
                        vertex_count,
                    },
                )?;
            }
            if let Some(segment) = triangle_segment(&tri, &origin, &normal) {
                segments.push(segment);
            }
        }

        if segments.is_empty() {
            return Ok(None);
        }

        let (u, v) = plane_basis(&normal);
        let loops = chain_segments(&segments)
            .into_iter()
            .map(|chain| {
                Polyline::new(
                    chain
                        .iter()
                        .map(|p| {
                            let d = p - origin;
                            Point2::new(d.dot(&u), d.dot(&v))
                        })
                        .collect(),
                )
            })
            .collect();

        Ok(Some(loops))
    }
}

// ============================================================================
// Internal helper functions
// ============================================================================

type Segment = (Point3<f64>, Point3<f64>);
type PointKey = [u64; 3];

/// Intersect one triangle with the plane.
fn triangle_segment(
    tri: &[Point3<f64>; 3],
    origin: &Point3<f64>,
    normal: &Vector3<f64>,
) -> Option<Segment> {
    let above = tri.map(|p| (p - origin).dot(normal) > 0.0);
    let above_count = above.iter().filter(|&&a| a).count();
    if above_count == 0 || above_count == 3 {
        return None;
    }

    let mut hits = [Point3::origin(); 2];
    let mut hit_count = 0;
    for i in 0..3 {
        let j = (i + 1) % 3;
        if above[i] != above[j] {
            hits[hit_count] = edge_crossing(&tri[i], &tri[j], origin, normal);
            hit_count += 1;
        }
    }

    // A vertex touching the plane from below yields a zero-length segment.
    (hits[0] != hits[1]).then_some((hits[0], hits[1]))
}

/// Point where the edge `a`-`b` crosses the plane.
fn edge_crossing(
    a: &Point3<f64>,
    b: &Point3<f64>,
    origin: &Point3<f64>,
    normal: &Vector3<f64>,
) -> Point3<f64> {
    let (a, b) = if (a.x, a.y, a.z) <= (b.x, b.y, b.z) {
        (a, b)
    } else {
        (b, a)
    };

    let da = (a - origin).dot(normal);
    let db = (b - origin).dot(normal);
    if da == 0.0 {
        return *a;
    }
    if db == 0.0 {
        return *b;
    }

    let t = da / (da - db);
    a + (b - a) * t
}

fn point_key(p: &Point3<f64>) -> PointKey {
    // Adding 0.0 folds -0.0 into +0.0.
    [
        (p.x + 0.0).to_bits(),
        (p.y + 0.0).to_bits(),
        (p.z + 0.0).to_bits(),
    ]
}

/// Join segments that share endpoints into chains.
///
/// Closed chains repeat their first point at the end.
fn chain_segments(segments: &[Segment]) -> Vec<Vec<Point3<f64>>> {
    let mut incident: HashMap<PointKey, Vec<usize>> = HashMap::with_capacity(segments.len() * 2);
    for (i, (a, b)) in segments.iter().enumerate() {
        incident.entry(point_key(a)).or_default().push(i);
        incident.entry(point_key(b)).or_default().push(i);
    }

    let mut used = vec![false; segments.len()];
    let mut chains = Vec::new();

    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;

        let (first, second) = segments[start];
        let mut forward = vec![first, second];
        if extend_chain(&mut forward, point_key(&first), segments, &incident, &mut used) {
            chains.push(forward);
            continue;
        }

        // Open chain: grow from the other end too.
        let tail_key = point_key(&second);
        let mut backward = vec![first];
        extend_chain(&mut backward, tail_key, segments, &incident, &mut used);
        backward.reverse();
        backward.extend_from_slice(&forward[1..]);
        chains.push(backward);
    }

    chains
}

/// Walk unused segments from the chain tail. Returns true once `stop` is hit.
fn extend_chain(
    chain: &mut Vec<Point3<f64>>,
    stop: PointKey,
    segments: &[Segment],
    incident: &HashMap<PointKey, Vec<usize>>,
    used: &mut [bool],
) -> bool {
    while let Some(tail) = chain.last() {
        let tail_key = point_key(tail);
        let next = incident
            .get(&tail_key)
            .and_then(|candidates| candidates.iter().copied().find(|&i| !used[i]));
        let Some(index) = next else {
            return false;
        };
        used[index] = true;

        let (a, b) = segments[index];
        let other = if point_key(&a) == tail_key { b } else { a };
        chain.push(other);
        if point_key(&other) == stop {
            return true;
        }
    }
    false
}

/// Orthonormal in-plane axes. A +Z normal maps to world X and Y.
fn plane_basis(normal: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let reference = if normal.y.abs() < 0.9 {
        Vector3::y()
    } else {
        Vector3::x()
    };
    let u = reference.cross(normal).normalize();
    let v = normal.cross(&u);
    (u, v)
}
