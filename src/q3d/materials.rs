//! Material registry.

use log::trace;

use crate::data::{EvaluationFlags, MaterialIndex, Mesh, Scene};

/// Scene-wide, de-duplicated list of materials used by exported meshes.
///
/// Materials are kept in first-seen order, and the position in the list is
/// the material index written to the document.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct MaterialRegistry {
    /// Materials.
    materials: Vec<MaterialIndex>,
}

impl MaterialRegistry {
    /// Collects materials referenced by the evaluated meshes of every object.
    ///
    /// Objects are scanned in scene order, and empty material slots and
    /// objects without geometry are ignored. `flags.world_space` is ignored.
    pub fn collect(scene: &Scene, flags: EvaluationFlags) -> Self {
        let flags = EvaluationFlags {
            world_space: false,
            ..flags
        };
        let mut registry = Self::default();
        for (i, object) in scene.objects() {
            let mesh = match scene.evaluated_mesh(i, flags) {
                Some(v) => v,
                None => continue,
            };
            trace!("Scanning materials of object {:?}", object.name);
            for material in mesh.materials.iter().flatten() {
                registry.insert(*material);
            }
        }
        registry
    }

    /// Appends the material unless already registered.
    fn insert(&mut self, material: MaterialIndex) {
        if !self.materials.contains(&material) {
            self.materials.push(material);
        }
    }

    /// Returns the position of the material in the registry.
    pub fn position(&self, material: MaterialIndex) -> Option<usize> {
        self.materials.iter().position(|&m| m == material)
    }

    /// Resolves a mesh-local material slot to a registry index.
    ///
    /// Returns `None` if the slot is empty, out of range, or its material is
    /// not registered.
    pub fn resolve_slot(&self, mesh: &Mesh, slot: usize) -> Option<usize> {
        mesh.material(slot).and_then(|m| self.position(m))
    }

    /// Resolves a mesh-local material slot to a registry index, or `0`.
    pub fn resolve(&self, mesh: &Mesh, slot: usize) -> usize {
        self.resolve_slot(mesh, slot).unwrap_or(0)
    }

    /// Returns an iterator of registered materials, in registry order.
    pub fn iter(&self) -> impl Iterator<Item = MaterialIndex> + '_ {
        self.materials.iter().copied()
    }

    /// Returns the number of registered materials.
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Returns whether no material is registered.
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn scene() -> Scene {
        Scene::from_reader(
            json!({
                "materials": [
                    { "name": "Paint" },
                    { "name": "Paint" },
                    { "name": "Glass" },
                    { "name": "Unused" }
                ],
                "objects": [
                    {
                        "name": "Body",
                        "data": {
                            "type": "mesh",
                            "authored": { "materials": [2, null, 0] }
                        }
                    },
                    { "name": "Camera", "data": { "type": "unsupported", "host_type": "CAMERA" } },
                    {
                        "name": "Door",
                        "data": {
                            "type": "mesh",
                            "authored": { "materials": [0, 1] },
                            "modified": { "materials": [3] }
                        }
                    },
                    { "name": "Broken", "data": { "type": "mesh" } }
                ]
            })
            .to_string()
            .as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn first_seen_order_without_duplicates() {
        let registry = MaterialRegistry::collect(&scene(), EvaluationFlags::default());
        let materials = registry.iter().map(MaterialIndex::to_u32).collect::<Vec<_>>();
        // Equal values with distinct identities are both kept.
        assert_eq!(materials, vec![2, 0, 1]);
    }

    #[test]
    fn modifier_evaluated_meshes_are_scanned() {
        let flags = EvaluationFlags {
            apply_modifiers: true,
            world_space: false,
        };
        let registry = MaterialRegistry::collect(&scene(), flags);
        let materials = registry.iter().map(MaterialIndex::to_u32).collect::<Vec<_>>();
        assert_eq!(materials, vec![2, 0, 3]);
        assert_eq!(registry.len(), 3);

        let world = MaterialRegistry::collect(
            &scene(),
            EvaluationFlags {
                world_space: true,
                ..flags
            },
        );
        assert_eq!(world, registry);
    }

    #[test]
    fn unresolvable_slots_resolve_to_zero() {
        let registry = MaterialRegistry::collect(&scene(), EvaluationFlags::default());
        let mesh = Mesh {
            materials: vec![Some(MaterialIndex::new(0)), None, Some(MaterialIndex::new(3))],
            ..Default::default()
        };
        assert_eq!(registry.resolve(&mesh, 0), 1);
        assert_eq!(registry.resolve_slot(&mesh, 1), None);
        assert_eq!(registry.resolve(&mesh, 1), 0);
        // Registered nowhere.
        assert_eq!(registry.resolve(&mesh, 2), 0);
        // Out of range.
        assert_eq!(registry.resolve(&mesh, 9), 0);
    }
}
