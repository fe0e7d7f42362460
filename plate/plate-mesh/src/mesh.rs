//! Indexed triangle mesh.

// Mesh indices are u32; vertex counts beyond 4B are unsupported.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

use nalgebra::{Matrix4, Point3, Vector3};

use crate::bounds::Aabb;

/// An indexed triangle mesh.
///
/// Vertices are stored once and faces reference them by index. Faces use
/// counter-clockwise winding when viewed from outside.
///
/// # Example
///
/// ```
/// use plate_mesh::{IndexedMesh, Point3};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
/// mesh.vertices.push(Point3::new(1.0, 0.0, 0.0));
/// mesh.vertices.push(Point3::new(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.face_count(), 1);
/// assert!(!mesh.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3<f64>>,

    /// Triangle faces as indices into `vertices`.
    pub faces: Vec<[u32; 3]>,
}

impl IndexedMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Point3<f64>>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Create a mesh from flat coordinate and index arrays.
    ///
    /// Returns an empty mesh if either array length is not a multiple of 3.
    #[must_use]
    pub fn from_raw(positions: &[f64], indices: &[u32]) -> Self {
        if positions.len() % 3 != 0 || indices.len() % 3 != 0 {
            return Self::new();
        }

        let vertices = positions
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        let faces = indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();

        Self { vertices, faces }
    }

    /// Create a closed axis-aligned box spanning `min` to `max`.
    ///
    /// # Example
    ///
    /// ```
    /// use plate_mesh::{IndexedMesh, Point3};
    ///
    /// let block = IndexedMesh::cuboid(Point3::origin(), Point3::new(10.0, 10.0, 5.0));
    /// assert_eq!(block.vertex_count(), 8);
    /// assert_eq!(block.face_count(), 12);
    /// assert!((block.extents().z - 5.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn cuboid(min: Point3<f64>, max: Point3<f64>) -> Self {
        let b = Aabb::new(min, max);
        let (lo, hi) = (b.min, b.max);

        let vertices = vec![
            Point3::new(lo.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, lo.z),
            Point3::new(hi.x, hi.y, lo.z),
            Point3::new(lo.x, hi.y, lo.z),
            Point3::new(lo.x, lo.y, hi.z),
            Point3::new(hi.x, lo.y, hi.z),
            Point3::new(hi.x, hi.y, hi.z),
            Point3::new(lo.x, hi.y, hi.z),
        ];

        let faces = vec![
            // Bottom (-Z)
            [0, 2, 1],
            [0, 3, 2],
            // Top (+Z)
            [4, 5, 6],
            [4, 6, 7],
            // Front (-Y)
            [0, 1, 5],
            [0, 5, 4],
            // Back (+Y)
            [3, 7, 6],
            [3, 6, 2],
            // Left (-X)
            [0, 4, 7],
            [0, 7, 3],
            // Right (+X)
            [1, 2, 6],
            [1, 6, 5],
        ];

        Self { vertices, faces }
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangle faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// A mesh is empty when it has no vertices or no faces.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Iterate over faces with resolved vertex positions.
    ///
    /// Faces with out-of-range indices are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3<f64>; 3]> + '_ {
        self.faces.iter().filter_map(|&[a, b, c]| {
            Some([
                *self.vertices.get(a as usize)?,
                *self.vertices.get(b as usize)?,
                *self.vertices.get(c as usize)?,
            ])
        })
    }

    /// Axis-aligned bounding box of all vertices.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(&self.vertices)
    }

    /// Extent along each axis (zero for an empty mesh).
    #[must_use]
    pub fn extents(&self) -> Vector3<f64> {
        self.bounds().size()
    }

    /// Total surface area.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.triangles().map(|t| triangle_area(&t)).sum()
    }

    /// Area-weighted surface centroid.
    ///
    /// Falls back to the vertex average when the surface has no area, and to
    /// the origin for a mesh without vertices.
    #[must_use]
    pub fn centroid(&self) -> Point3<f64> {
        let mut weighted = Vector3::zeros();
        let mut total_area = 0.0;

        for tri in self.triangles() {
            let area = triangle_area(&tri);
            let center = (tri[0].coords + tri[1].coords + tri[2].coords) / 3.0;
            weighted += center * area;
            total_area += area;
        }

        if total_area > f64::EPSILON {
            return Point3::from(weighted / total_area);
        }

        if self.vertices.is_empty() {
            return Point3::origin();
        }

        let sum: Vector3<f64> = self.vertices.iter().map(|p| p.coords).sum();
        Point3::from(sum / self.vertices.len() as f64)
    }

    /// Translate every vertex by `offset`.
    pub fn translate(&mut self, offset: &Vector3<f64>) {
        for vertex in &mut self.vertices {
            *vertex += offset;
        }
    }

    /// Return a copy with the affine `matrix` baked into every vertex.
    ///
    /// When the matrix mirrors space (negative determinant) the face winding
    /// of the copy is reversed so normals still point outward.
    #[must_use]
    pub fn transformed(&self, matrix: &Matrix4<f64>) -> Self {
        let vertices = self
            .vertices
            .iter()
            .map(|p| {
                let h = matrix * p.to_homogeneous();
                Point3::new(h.x, h.y, h.z)
            })
            .collect();

        let mirrored = matrix.fixed_view::<3, 3>(0, 0).clone_owned().determinant() < 0.0;
        let faces = if mirrored {
            self.faces.iter().map(|&[a, b, c]| [a, c, b]).collect()
        } else {
            self.faces.clone()
        };

        Self { vertices, faces }
    }

    /// Append another mesh, offsetting its face indices.
    pub fn merge(&mut self, other: &Self) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.faces.extend(
            other
                .faces
                .iter()
                .map(|f| [f[0] + offset, f[1] + offset, f[2] + offset]),
        );
    }
}

fn triangle_area(tri: &[Point3<f64>; 3]) -> f64 {
    (tri[1] - tri[0]).cross(&(tri[2] - tri[0])).norm() * 0.5
}
