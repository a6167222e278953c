//! 3D content data.
//!
//! This is a read-only snapshot of a host application's scene: objects with
//! their hierarchy, meshes, materials, and armatures. Relations between
//! entities are stored as typed indices into the scene-wide arenas.

pub use self::{
    armature::{Armature, Bone},
    error::SceneError,
    material::Material,
    mesh::{Face, Mesh, MeshSource, UvLayer, Vertex},
    object::{Object, ObjectData, Transform, VertexGroup},
    scene::{EvaluationFlags, Scene},
};

mod armature;
mod error;
mod material;
mod mesh;
mod object;
mod scene;

/// Defines an index type.
macro_rules! define_index_type {
    ($(#[$meta:meta])* $ty:ident;) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $ty(u32);

        impl $ty {
            /// Creates a new index.
            pub fn new(i: u32) -> Self {
                Self(i)
            }

            /// Returns the index.
            pub fn to_u32(self) -> u32 {
                self.0
            }

            /// Returns the index.
            pub fn to_usize(self) -> usize {
                self.0 as usize
            }
        }
    };
}

define_index_type! {
    /// Object index.
    ObjectIndex;
}

define_index_type! {
    /// Material index.
    MaterialIndex;
}

define_index_type! {
    /// Bone index (local to an armature).
    BoneIndex;
}
