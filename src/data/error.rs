//! Scene loading errors.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Error while loading or validating a scene snapshot.
#[derive(Debug, Error)]
pub enum SceneError {
    /// I/O error.
    #[error("Failed to read scene {path:?}: {source}")]
    Io {
        /// Path of the scene file.
        path: PathBuf,
        /// Source error.
        source: io::Error,
    },
    /// Malformed scene description.
    #[error("Malformed scene description: {0}")]
    Parse(#[from] serde_json::Error),
    /// Parent object index out of range.
    #[error("Object {object:?} refers to a nonexistent parent object #{index}")]
    InvalidObjectIndex {
        /// Object name.
        object: String,
        /// Parent index.
        index: u32,
    },
    /// Object hierarchy contains a cycle.
    #[error("Parent chain of object {object:?} is cyclic")]
    ObjectCycle {
        /// Object name.
        object: String,
    },
    /// Material slot refers to a nonexistent material.
    #[error("Object {object:?} refers to a nonexistent material #{index}")]
    InvalidMaterialIndex {
        /// Object name.
        object: String,
        /// Material index.
        index: u32,
    },
    /// Face refers to a nonexistent vertex.
    #[error("Face #{face} of object {object:?} refers to a nonexistent vertex #{index}")]
    InvalidVertexIndex {
        /// Object name.
        object: String,
        /// Face index.
        face: usize,
        /// Vertex index.
        index: u32,
    },
    /// Parent bone index out of range.
    #[error("Bone {bone:?} of armature {object:?} refers to a nonexistent parent bone #{index}")]
    InvalidBoneIndex {
        /// Armature object name.
        object: String,
        /// Bone name.
        bone: String,
        /// Parent index.
        index: u32,
    },
    /// Bone hierarchy contains a cycle.
    #[error("Parent chain of bone {bone:?} in armature {object:?} is cyclic")]
    BoneCycle {
        /// Armature object name.
        object: String,
        /// Bone name.
        bone: String,
    },
}
