//! Mesh.

use serde::{Deserialize, Serialize};

use crate::data::MaterialIndex;

/// Geometry of a mesh-like object.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshSource {
    /// Geometry as authored.
    #[serde(default)]
    pub authored: Option<Mesh>,
    /// Geometry after the host evaluated the modifier stack.
    #[serde(default)]
    pub modified: Option<Mesh>,
}

impl MeshSource {
    /// Returns the mesh to export.
    ///
    /// Falls back to the authored geometry when no modifier-evaluated mesh is
    /// available.
    pub fn evaluate(&self, apply_modifiers: bool) -> Option<&Mesh> {
        if apply_modifiers {
            self.modified.as_ref().or_else(|| self.authored.as_ref())
        } else {
            self.authored.as_ref()
        }
    }
}

/// Mesh.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertices.
    #[serde(default)]
    pub vertices: Vec<Vertex>,
    /// Faces (polygons).
    #[serde(default)]
    pub faces: Vec<Face>,
    /// Material slots.
    ///
    /// A slot may be empty.
    #[serde(default)]
    pub materials: Vec<Option<MaterialIndex>>,
    /// UV layers.
    #[serde(default)]
    pub uv_layers: Vec<UvLayer>,
    /// Index of the active UV layer.
    #[serde(default)]
    pub active_uv_layer: Option<usize>,
}

impl Mesh {
    /// Returns the active UV layer, if any.
    pub fn active_uv_layer(&self) -> Option<&UvLayer> {
        self.active_uv_layer.and_then(|i| self.uv_layers.get(i))
    }

    /// Returns the material referenced by the given slot.
    pub fn material(&self, slot: usize) -> Option<MaterialIndex> {
        self.materials.get(slot).copied().flatten()
    }

    /// Returns an iterator of `(loop_index, vertex_index)` in face order.
    ///
    /// Loops of a face are numbered consecutively, starting right after the
    /// loops of the previous face.
    pub fn loops(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.faces
            .iter()
            .flat_map(|face| face.vertices.iter().copied())
            .enumerate()
    }

    /// Returns the number of loops.
    pub fn num_loops(&self) -> usize {
        self.faces.iter().map(|face| face.vertices.len()).sum()
    }
}

/// Vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Vertex {
    /// Position.
    pub position: [f32; 3],
}

impl From<[f32; 3]> for Vertex {
    fn from(position: [f32; 3]) -> Self {
        Self { position }
    }
}

impl From<Vertex> for [f32; 3] {
    fn from(v: Vertex) -> Self {
        v.position
    }
}

/// Face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    /// Vertex indices, in winding order.
    pub vertices: Vec<u32>,
    /// Material slot.
    #[serde(default)]
    pub material_index: usize,
}

/// UV layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UvLayer {
    /// Name.
    #[serde(default)]
    pub name: String,
    /// UV per loop.
    pub uv: Vec<[f32; 2]>,
}
