//! Object.

use std::collections::BTreeMap;

use cgmath::{Matrix3, Matrix4, Rad, Vector3};
use serde::{Deserialize, Serialize};

use crate::data::{Armature, MeshSource, ObjectIndex};

/// Object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    /// Name.
    pub name: String,
    /// Parent object.
    #[serde(default)]
    pub parent: Option<ObjectIndex>,
    /// Transform relative to the parent.
    #[serde(default)]
    pub transform: Transform,
    /// Vertex groups.
    #[serde(default)]
    pub vertex_groups: Vec<VertexGroup>,
    /// Object data.
    pub data: ObjectData,
    /// Child objects, in scene order.
    #[serde(skip)]
    pub(crate) children: Vec<ObjectIndex>,
}

impl Object {
    /// Creates a new `Object` without parent.
    pub fn new(name: impl Into<String>, data: ObjectData) -> Self {
        Self {
            name: name.into(),
            parent: None,
            transform: Transform::default(),
            vertex_groups: Vec::new(),
            data,
            children: Vec::new(),
        }
    }

    /// Returns the child objects.
    pub fn children(&self) -> &[ObjectIndex] {
        &self.children
    }

    /// Returns the local transform matrix.
    pub fn local_matrix(&self) -> Matrix4<f32> {
        self.transform.to_matrix()
    }
}

/// Object data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectData {
    /// Mesh-like object (mesh, curve, surface, text...).
    Mesh(MeshSource),
    /// Armature.
    Armature(Armature),
    /// Object type without geometry (camera, lamp, empty...).
    Unsupported {
        /// Type name used by the host.
        #[serde(default)]
        host_type: String,
    },
}

impl ObjectData {
    /// Returns a human readable type name.
    pub fn type_name(&self) -> &str {
        match self {
            ObjectData::Mesh(_) => "mesh",
            ObjectData::Armature(_) => "armature",
            ObjectData::Unsupported { host_type } => host_type,
        }
    }
}

/// Location, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Location.
    #[serde(default)]
    pub location: [f32; 3],
    /// Euler rotation in radians, applied in X, Y, Z order.
    #[serde(default)]
    pub rotation: [f32; 3],
    /// Scale.
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
}

impl Transform {
    /// Returns the rotation matrix.
    pub fn rotation_matrix(&self) -> Matrix3<f32> {
        let [x, y, z] = self.rotation;
        Matrix3::from_angle_z(Rad(z)) * Matrix3::from_angle_y(Rad(y)) * Matrix3::from_angle_x(Rad(x))
    }

    /// Returns the transform matrix.
    pub fn to_matrix(&self) -> Matrix4<f32> {
        let [sx, sy, sz] = self.scale;
        Matrix4::from_translation(Vector3::from(self.location))
            * Matrix4::from(self.rotation_matrix())
            * Matrix4::from_nonuniform_scale(sx, sy, sz)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            location: [0.0; 3],
            rotation: [0.0; 3],
            scale: unit_scale(),
        }
    }
}

/// Returns the identity scale.
fn unit_scale() -> [f32; 3] {
    [1.0; 3]
}

/// Vertex group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexGroup {
    /// Name.
    pub name: String,
    /// Weights of member vertices.
    #[serde(default)]
    pub weights: BTreeMap<u32, f32>,
}

impl VertexGroup {
    /// Returns the weight of the vertex, if it is a member of the group.
    pub fn weight(&self, vertex: u32) -> Option<f32> {
        self.weights.get(&vertex).copied()
    }
}
