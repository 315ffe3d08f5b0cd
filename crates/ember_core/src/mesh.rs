//! Triangle mesh buffers.

use ember_math::{Aabb, Mat3, Vec3};
use thiserror::Error;

/// Errors reported when validating mesh buffers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    #[error("face {face} references vertex {vertex}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        vertex: u32,
        vertex_count: usize,
    },

    #[error("vertex {0} has a non-finite coordinate")]
    NonFiniteVertex(usize),
}

/// A mesh consisting of vertex positions and triangle faces.
///
/// Each face is three indices into `positions`. One material is assigned
/// to the whole mesh by the scene that owns it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Triangle faces as vertex index triples
    pub faces: Vec<[u32; 3]>,
}

impl Mesh {
    /// Create a new mesh from positions and faces.
    ///
    /// Indices are not checked here; call [`Mesh::validate`] before handing
    /// the mesh to a scene.
    pub fn new(positions: Vec<Vec3>, faces: Vec<[u32; 3]>) -> Self {
        Self { positions, faces }
    }

    /// A square-based pyramid standing on the XZ plane, centered on the origin.
    pub fn pyramid(base: f32, height: f32) -> Self {
        let h = base * 0.5;
        let positions = vec![
            Vec3::new(-h, 0.0, -h),
            Vec3::new(h, 0.0, -h),
            Vec3::new(h, 0.0, h),
            Vec3::new(-h, 0.0, h),
            Vec3::new(0.0, height, 0.0),
        ];
        // Counter-clockwise seen from outside
        let faces = vec![
            [0, 1, 2],
            [0, 2, 3],
            [0, 4, 1],
            [1, 4, 2],
            [2, 4, 3],
            [3, 4, 0],
        ];
        Self { positions, faces }
    }

    /// Check that every face index is in range and every vertex is finite.
    pub fn validate(&self) -> Result<(), MeshError> {
        if let Some(i) = self.positions.iter().position(|p| !p.is_finite()) {
            return Err(MeshError::NonFiniteVertex(i));
        }

        let vertex_count = self.positions.len();
        for (face, ids) in self.faces.iter().enumerate() {
            if let Some(&vertex) = ids.iter().find(|&&id| id as usize >= vertex_count) {
                return Err(MeshError::IndexOutOfRange {
                    face,
                    vertex,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// The three corner positions of a face, or `None` if the face or one
    /// of its indices is out of range.
    #[inline]
    pub fn triangle(&self, face: usize) -> Option<[Vec3; 3]> {
        let [a, b, c] = *self.faces.get(face)?;
        Some([
            *self.positions.get(a as usize)?,
            *self.positions.get(b as usize)?,
            *self.positions.get(c as usize)?,
        ])
    }

    /// Bounding box over all vertices, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Aabb> {
        let first = *self.positions.first()?;
        let (min, max) = self
            .positions
            .iter()
            .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(Aabb::from_points(min, max))
    }

    /// Apply a linear transform (rotation, scale) to every vertex.
    pub fn transform(&mut self, m: &Mat3) {
        for p in &mut self.positions {
            *p = *m * *p;
        }
    }

    /// Move every vertex by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        for p in &mut self.positions {
            *p += offset;
        }
    }

    /// Append another mesh, rebasing its indices past our vertices.
    pub fn append(&mut self, other: &Mesh) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.faces
            .extend(other.faces.iter().map(|f| [f[0] + base, f[1] + base, f[2] + base]));

        log::debug!(
            "Appended {} faces, mesh now has {} vertices / {} faces",
            other.faces.len(),
            self.positions.len(),
            self.faces.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_triangle() -> Mesh {
        Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
    }

    #[test]
    fn test_mesh_creation() {
        let mesh = single_triangle();

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.triangle(0).unwrap()[1], Vec3::X);
    }

    #[test]
    fn test_triangle_out_of_range() {
        let mut mesh = single_triangle();
        assert!(mesh.triangle(1).is_none());

        mesh.faces.push([0, 1, 7]);
        assert!(mesh.triangle(1).is_none());
    }

    #[test]
    fn test_validate_index_out_of_range() {
        let mut mesh = single_triangle();
        mesh.faces.push([0, 2, 3]);

        assert_eq!(
            mesh.validate(),
            Err(MeshError::IndexOutOfRange {
                face: 1,
                vertex: 3,
                vertex_count: 3
            })
        );
    }

    #[test]
    fn test_validate_non_finite_vertex() {
        let mut mesh = single_triangle();
        mesh.positions[2].y = f32::NAN;

        assert_eq!(mesh.validate(), Err(MeshError::NonFiniteVertex(2)));
    }

    #[test]
    fn test_bounds_computation() {
        let mesh = Mesh::new(
            vec![
                Vec3::new(-1.0, -2.0, -3.0),
                Vec3::new(4.0, 5.0, 6.0),
                Vec3::new(0.0, 0.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        let bounds = mesh.bounds().unwrap();

        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(bounds.max, Vec3::new(4.0, 5.0, 6.0));
        assert!(Mesh::default().bounds().is_none());
    }

    #[test]
    fn test_transform_and_translate() {
        let mut mesh = single_triangle();
        mesh.transform(&Mat3::from_diagonal(Vec3::splat(2.0)));
        mesh.translate(Vec3::new(0.0, 0.0, -1.0));

        assert_eq!(mesh.positions[1], Vec3::new(2.0, 0.0, -1.0));
        assert_eq!(mesh.positions[2], Vec3::new(0.0, 2.0, -1.0));
    }

    #[test]
    fn test_append_rebases_indices() {
        let mut mesh = single_triangle();
        mesh.append(&single_triangle());

        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.faces[1], [3, 4, 5]);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_pyramid_is_valid() {
        let mesh = Mesh::pyramid(2.0, 1.5);

        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.triangle_count(), 6);
        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.max.y, 1.5);
        assert_eq!(bounds.min.x, -1.0);
    }
}
