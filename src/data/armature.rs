//! Armature.

use serde::{Deserialize, Serialize};

use crate::data::{BoneIndex, SceneError};

/// Armature: a forest of bones.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Armature {
    /// Bones, in declared order.
    #[serde(default)]
    pub bones: Vec<Bone>,
}

impl Armature {
    /// Returns a reference to the bone.
    pub fn bone(&self, i: BoneIndex) -> Option<&Bone> {
        self.bones.get(i.to_usize())
    }

    /// Returns an iterator of bones without a parent, in declared order.
    pub fn roots(&self) -> impl Iterator<Item = BoneIndex> + '_ {
        self.bones
            .iter()
            .enumerate()
            .filter(|(_, bone)| bone.parent.is_none())
            .map(|(i, _)| BoneIndex::new(i as u32))
    }

    /// Validates parent references and rebuilds the children lists.
    pub(crate) fn link(&mut self, object: &str) -> Result<(), SceneError> {
        let num_bones = self.bones.len();
        for (i, bone) in self.bones.iter().enumerate() {
            if let Some(parent) = bone.parent {
                if parent.to_usize() >= num_bones {
                    return Err(SceneError::InvalidBoneIndex {
                        object: object.to_owned(),
                        bone: bone.name.clone(),
                        index: parent.to_u32(),
                    });
                }
            }
            // A chain longer than the number of bones must revisit a bone.
            let mut current = bone.parent;
            let mut steps = 0;
            while let Some(p) = current {
                steps += 1;
                if steps > num_bones || p.to_usize() == i {
                    return Err(SceneError::BoneCycle {
                        object: object.to_owned(),
                        bone: bone.name.clone(),
                    });
                }
                current = self.bones[p.to_usize()].parent;
            }
        }

        for bone in &mut self.bones {
            bone.children.clear();
        }
        for i in 0..num_bones {
            if let Some(parent) = self.bones[i].parent {
                self.bones[parent.to_usize()]
                    .children
                    .push(BoneIndex::new(i as u32));
            }
        }

        Ok(())
    }
}

/// Bone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    /// Name.
    pub name: String,
    /// Parent bone.
    #[serde(default)]
    pub parent: Option<BoneIndex>,
    /// Head position.
    pub head: [f32; 3],
    /// Tail position.
    pub tail: [f32; 3],
    /// Local X axis.
    #[serde(default = "unit_x")]
    pub x_axis: [f32; 3],
    /// Local Y axis (head to tail direction).
    #[serde(default = "unit_y")]
    pub y_axis: [f32; 3],
    /// Local Z axis.
    #[serde(default = "unit_z")]
    pub z_axis: [f32; 3],
    /// Child bones, in declared order.
    #[serde(skip)]
    pub(crate) children: Vec<BoneIndex>,
}

impl Bone {
    /// Returns the child bones.
    pub fn children(&self) -> &[BoneIndex] {
        &self.children
    }
}

/// Returns the unit X vector.
fn unit_x() -> [f32; 3] {
    [1.0, 0.0, 0.0]
}

/// Returns the unit Y vector.
fn unit_y() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

/// Returns the unit Z vector.
fn unit_z() -> [f32; 3] {
    [0.0, 0.0, 1.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bone(name: &str, parent: Option<u32>) -> Bone {
        Bone {
            name: name.to_owned(),
            parent: parent.map(BoneIndex::new),
            head: [0.0; 3],
            tail: [0.0, 0.0, 1.0],
            x_axis: unit_x(),
            y_axis: unit_y(),
            z_axis: unit_z(),
            children: Vec::new(),
        }
    }

    #[test]
    fn link_builds_children_in_declared_order() {
        let mut armature = Armature {
            bones: vec![
                bone("Hips", None),
                bone("Spine", Some(0)),
                bone("LegL", Some(0)),
                bone("Chest", Some(1)),
                bone("Prop", None),
            ],
        };
        armature.link("Rig").unwrap();

        let roots = armature.roots().collect::<Vec<_>>();
        assert_eq!(roots, vec![BoneIndex::new(0), BoneIndex::new(4)]);
        assert_eq!(
            armature.bones[0].children(),
            &[BoneIndex::new(1), BoneIndex::new(2)]
        );
        assert_eq!(armature.bones[1].children(), &[BoneIndex::new(3)]);
        assert!(armature.bones[4].children().is_empty());
    }

    #[test]
    fn link_rejects_cycles() {
        let mut armature = Armature {
            bones: vec![bone("A", Some(1)), bone("B", Some(0))],
        };
        match armature.link("Rig") {
            Err(SceneError::BoneCycle { object, .. }) => assert_eq!(object, "Rig"),
            v => panic!("unexpected result: {:?}", v),
        }
    }

    #[test]
    fn link_rejects_out_of_range_parent() {
        let mut armature = Armature {
            bones: vec![bone("A", Some(7))],
        };
        assert!(matches!(
            armature.link("Rig"),
            Err(SceneError::InvalidBoneIndex { index: 7, .. })
        ));
    }
}
