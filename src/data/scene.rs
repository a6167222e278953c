//! Scene.

use std::{borrow::Cow, convert::TryFrom, fs::File, io, path::Path};

use cgmath::{Matrix4, Point3, SquareMatrix, Transform as _};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::data::{Material, MaterialIndex, Mesh, Object, ObjectData, ObjectIndex, SceneError};

/// Flags for mesh evaluation.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationFlags {
    /// Use the geometry after the modifier stack.
    pub apply_modifiers: bool,
    /// Transform vertex positions into world space.
    pub world_space: bool,
}

/// Scene.
///
/// The scene owns every object; parent and children relations are indices
/// into the object list, verified to be acyclic on construction.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SceneDesc", into = "SceneDesc")]
pub struct Scene {
    /// Materials.
    materials: Vec<Material>,
    /// Objects.
    objects: Vec<Object>,
}

impl Scene {
    /// Creates a new `Scene` after validating references between entities.
    pub fn new(materials: Vec<Material>, mut objects: Vec<Object>) -> Result<Self, SceneError> {
        let num_objects = objects.len();
        for (i, object) in objects.iter().enumerate() {
            if let Some(parent) = object.parent {
                if parent.to_usize() >= num_objects {
                    return Err(SceneError::InvalidObjectIndex {
                        object: object.name.clone(),
                        index: parent.to_u32(),
                    });
                }
            }
            let mut current = object.parent;
            let mut steps = 0;
            while let Some(p) = current {
                steps += 1;
                if steps > num_objects || p.to_usize() == i {
                    return Err(SceneError::ObjectCycle {
                        object: object.name.clone(),
                    });
                }
                current = objects[p.to_usize()].parent;
            }
        }

        for object in &mut objects {
            if let ObjectData::Mesh(source) = &object.data {
                for mesh in source.authored.iter().chain(source.modified.iter()) {
                    for slot in mesh.materials.iter().flatten() {
                        if slot.to_usize() >= materials.len() {
                            return Err(SceneError::InvalidMaterialIndex {
                                object: object.name.clone(),
                                index: slot.to_u32(),
                            });
                        }
                    }
                    for (face_index, face) in mesh.faces.iter().enumerate() {
                        let invalid = face
                            .vertices
                            .iter()
                            .find(|&&v| v as usize >= mesh.vertices.len());
                        if let Some(&index) = invalid {
                            return Err(SceneError::InvalidVertexIndex {
                                object: object.name.clone(),
                                face: face_index,
                                index,
                            });
                        }
                    }
                }
            }
            if let ObjectData::Armature(armature) = &mut object.data {
                armature.link(&object.name)?;
            }
            object.children.clear();
        }
        for i in 0..num_objects {
            if let Some(parent) = objects[i].parent {
                objects[parent.to_usize()]
                    .children
                    .push(ObjectIndex::new(i as u32));
            }
        }

        debug!(
            "Scene loaded: {} objects, {} materials",
            num_objects,
            materials.len()
        );
        Ok(Self { materials, objects })
    }

    /// Loads a scene snapshot from the JSON reader.
    pub fn from_reader(reader: impl io::Read) -> Result<Self, SceneError> {
        // Validate outside of serde to keep the error variants.
        let desc: SceneDesc = serde_json::from_reader(reader)?;
        Self::try_from(desc)
    }

    /// Loads a scene snapshot from the JSON file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SceneError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_reader(io::BufReader::new(file))
    }

    /// Returns a reference to the object.
    pub fn object(&self, i: ObjectIndex) -> Option<&Object> {
        self.objects.get(i.to_usize())
    }

    /// Returns an iterator of objects, in scene order.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectIndex, &Object)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, o)| (ObjectIndex::new(i as u32), o))
    }

    /// Returns an iterator of objects without a parent, in scene order.
    pub fn root_objects(&self) -> impl Iterator<Item = ObjectIndex> + '_ {
        self.objects()
            .filter(|(_, o)| o.parent.is_none())
            .map(|(i, _)| i)
    }

    /// Returns a reference to the material.
    pub fn material(&self, i: MaterialIndex) -> Option<&Material> {
        self.materials.get(i.to_usize())
    }

    /// Returns the world transform matrix of the object.
    pub fn world_matrix(&self, i: ObjectIndex) -> Matrix4<f32> {
        let mut matrix = Matrix4::identity();
        let mut current = self.object(i);
        while let Some(object) = current {
            matrix = object.local_matrix() * matrix;
            current = object.parent.and_then(|p| self.object(p));
        }
        matrix
    }

    /// Returns the evaluated mesh of the object.
    ///
    /// Returns `None` if the object has no obtainable geometry.
    pub fn evaluated_mesh(&self, i: ObjectIndex, flags: EvaluationFlags) -> Option<Cow<'_, Mesh>> {
        let source = match &self.object(i)?.data {
            ObjectData::Mesh(source) => source,
            _ => return None,
        };
        let mesh = source.evaluate(flags.apply_modifiers)?;
        if !flags.world_space {
            return Some(Cow::Borrowed(mesh));
        }

        let world = self.world_matrix(i);
        let mut mesh = mesh.clone();
        for vertex in &mut mesh.vertices {
            vertex.position = world
                .transform_point(Point3::from(vertex.position))
                .into();
        }
        Some(Cow::Owned(mesh))
    }
}

impl TryFrom<SceneDesc> for Scene {
    type Error = SceneError;

    fn try_from(desc: SceneDesc) -> Result<Self, Self::Error> {
        Self::new(desc.materials, desc.objects)
    }
}

/// Serialized form of a scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SceneDesc {
    /// Materials.
    #[serde(default)]
    materials: Vec<Material>,
    /// Objects.
    #[serde(default)]
    objects: Vec<Object>,
}

impl From<Scene> for SceneDesc {
    fn from(scene: Scene) -> Self {
        Self {
            materials: scene.materials,
            objects: scene.objects,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn scene(value: serde_json::Value) -> Result<Scene, SceneError> {
        Scene::from_reader(value.to_string().as_bytes())
    }

    #[test]
    fn children_follow_scene_order() {
        let scene = scene(json!({
            "objects": [
                { "name": "Body", "data": { "type": "unsupported" } },
                { "name": "WheelL", "parent": 0, "data": { "type": "unsupported" } },
                { "name": "Ground", "data": { "type": "unsupported" } },
                { "name": "WheelR", "parent": 0, "data": { "type": "unsupported" } },
            ]
        }))
        .unwrap();

        let roots = scene.root_objects().collect::<Vec<_>>();
        assert_eq!(roots, vec![ObjectIndex::new(0), ObjectIndex::new(2)]);
        let body = scene.object(ObjectIndex::new(0)).unwrap();
        assert_eq!(body.children(), &[ObjectIndex::new(1), ObjectIndex::new(3)]);
    }

    #[test]
    fn cyclic_parents_are_rejected() {
        let err = scene(json!({
            "objects": [
                { "name": "A", "parent": 1, "data": { "type": "unsupported" } },
                { "name": "B", "parent": 0, "data": { "type": "unsupported" } },
            ]
        }))
        .unwrap_err();
        assert!(matches!(err, SceneError::ObjectCycle { .. }), "{}", err);
    }

    #[test]
    fn dangling_material_is_rejected() {
        let err = scene(json!({
            "objects": [{
                "name": "Cube",
                "data": {
                    "type": "mesh",
                    "authored": { "vertices": [[0, 0, 0]], "materials": [4] }
                }
            }]
        }))
        .unwrap_err();
        assert!(
            matches!(err, SceneError::InvalidMaterialIndex { index: 4, .. }),
            "{}",
            err
        );
    }

    #[test]
    fn dangling_face_vertex_is_rejected() {
        let err = scene(json!({
            "objects": [{
                "name": "Strip",
                "data": {
                    "type": "mesh",
                    "authored": {
                        "vertices": [[0, 0, 0], [1, 0, 0], [1, 1, 0]],
                        "faces": [{ "vertices": [0, 1, 2] }]
                    },
                    "modified": {
                        "vertices": [[0, 0, 0]],
                        "faces": [{ "vertices": [0] }, { "vertices": [0, 7] }]
                    }
                }
            }]
        }))
        .unwrap_err();
        assert!(
            matches!(err, SceneError::InvalidVertexIndex { face: 1, index: 7, .. }),
            "{}",
            err
        );
    }

    #[test]
    fn world_space_mesh_includes_parent_transform() {
        let scene = scene(json!({
            "objects": [
                {
                    "name": "Parent",
                    "transform": { "location": [0, 0, 5] },
                    "data": { "type": "unsupported" }
                },
                {
                    "name": "Child",
                    "parent": 0,
                    "transform": { "location": [1, 0, 0] },
                    "data": { "type": "mesh", "authored": { "vertices": [[0, 1, 0]] } }
                }
            ]
        }))
        .unwrap();

        let child = ObjectIndex::new(1);
        let local = scene
            .evaluated_mesh(child, EvaluationFlags::default())
            .unwrap();
        assert_eq!(local.vertices[0].position, [0.0, 1.0, 0.0]);

        let world = scene
            .evaluated_mesh(
                child,
                EvaluationFlags {
                    apply_modifiers: true,
                    world_space: true,
                },
            )
            .unwrap();
        assert_eq!(world.vertices[0].position, [1.0, 1.0, 5.0]);
        assert!(scene.evaluated_mesh(ObjectIndex::new(0), EvaluationFlags::default()).is_none());
    }
}
