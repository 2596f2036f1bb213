//! Geometry - reference points handed to the Renderer
//!
//! Vertices and faces are constant for a run; only the transformed vertex
//! positions change per tick.

use serde::{Deserialize, Serialize};

use crate::{AttitudeState, Vector3};

/// Polygonal face referencing vertex indices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    /// Face name (used for logging / recordings)
    pub name: String,

    /// Indices into `Geometry::vertices`
    pub vertices: Vec<usize>,

    /// Display color (CSS/matplotlib color name)
    pub color: String,
}

impl Face {
    pub fn new(name: impl Into<String>, vertices: Vec<usize>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertices,
            color: color.into(),
        }
    }
}

/// Reference geometry: vertices plus faces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub vertices: Vec<Vector3>,
    pub faces: Vec<Face>,
}

impl Geometry {
    /// Unit cube with corners at ±1 and six colored faces
    pub fn cube() -> Self {
        let vertices = vec![
            Vector3::new(-1.0, -1.0, -1.0),
            Vector3::new(1.0, -1.0, -1.0),
            Vector3::new(1.0, 1.0, -1.0),
            Vector3::new(-1.0, 1.0, -1.0),
            Vector3::new(-1.0, -1.0, 1.0),
            Vector3::new(1.0, -1.0, 1.0),
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(-1.0, 1.0, 1.0),
        ];

        let faces = vec![
            Face::new("bottom", vec![0, 1, 2, 3], "red"),
            Face::new("top", vec![4, 5, 6, 7], "darkred"),
            Face::new("left", vec![0, 3, 7, 4], "lime"),
            Face::new("right", vec![1, 2, 6, 5], "green"),
            Face::new("front", vec![0, 1, 5, 4], "blue"),
            Face::new("back", vec![2, 3, 7, 6], "navy"),
        ];

        Self { vertices, faces }
    }

    /// First face index that references a missing vertex, with the bad index
    pub fn find_dangling_index(&self) -> Option<(usize, usize)> {
        self.faces.iter().enumerate().find_map(|(face_idx, face)| {
            face.vertices
                .iter()
                .find(|&&v| v >= self.vertices.len())
                .map(|&v| (face_idx, v))
        })
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::cube()
    }
}

/// One tick's worth of render input
///
/// Borrows the transformed vertices from the scheduler and the faces from
/// the run geometry.
#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    /// Tick index (starts at 0)
    pub tick: u64,

    /// Attitude the vertices were rotated by
    pub attitude: AttitudeState,

    /// Rotated vertices, same order as the reference geometry
    pub vertices: &'a [Vector3],

    /// Faces, unchanged from the reference geometry
    pub faces: &'a [Face],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_shape() {
        let cube = Geometry::cube();
        assert_eq!(cube.vertices.len(), 8);
        assert_eq!(cube.faces.len(), 6);
        assert!(cube.faces.iter().all(|f| f.vertices.len() == 4));
        assert_eq!(cube.find_dangling_index(), None);
    }

    #[test]
    fn test_dangling_index_detected() {
        let mut cube = Geometry::cube();
        cube.faces[2].vertices[1] = 8;
        assert_eq!(cube.find_dangling_index(), Some((2, 8)));
    }
}
