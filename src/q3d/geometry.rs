//! Geometry extraction.

use crate::{
    data::{Mesh, Object},
    q3d::MaterialRegistry,
};

/// Vertex as written to the document, before axis conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportVertex {
    /// Position.
    pub position: [f32; 3],
    /// Texture coordinates.
    pub uv: [f32; 2],
}

/// Face as written to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFace {
    /// Vertex indices.
    pub vertices: Vec<u32>,
    /// Registry index of the material.
    pub material: usize,
    /// Whether the material slot could not be resolved.
    pub unresolved: bool,
}

/// Vertex group as written to the document.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportVertexGroup {
    /// Name.
    pub name: String,
    /// Weight of every mesh vertex, in vertex order.
    pub weights: Vec<f32>,
}

/// Returns the texture coordinates of every vertex.
///
/// UVs are stored per loop, so a vertex shared by several faces may have
/// several. The loop visited last, in face order, wins. Vertices without a
/// loop, and all vertices of a mesh without an active UV layer, get `(0, 0)`.
pub fn vertex_uvs(mesh: &Mesh) -> Vec<[f32; 2]> {
    let mut uvs = vec![[0.0; 2]; mesh.vertices.len()];
    let layer = match mesh.active_uv_layer() {
        Some(v) => v,
        None => return uvs,
    };
    for (loop_index, vertex) in mesh.loops() {
        if let (Some(uv), Some(dest)) = (layer.uv.get(loop_index), uvs.get_mut(vertex as usize)) {
            *dest = *uv;
        }
    }
    uvs
}

/// Extracts the vertices in mesh order.
pub fn extract_vertices(mesh: &Mesh) -> Vec<ExportVertex> {
    mesh.vertices
        .iter()
        .zip(vertex_uvs(mesh))
        .map(|(vertex, uv)| ExportVertex {
            position: vertex.position,
            uv,
        })
        .collect()
}

/// Extracts the faces in mesh order, with materials resolved against the registry.
pub fn extract_faces(mesh: &Mesh, registry: &MaterialRegistry) -> Vec<ExportFace> {
    mesh.faces
        .iter()
        .map(|face| {
            let resolved = registry.resolve_slot(mesh, face.material_index);
            ExportFace {
                vertices: face.vertices.clone(),
                material: resolved.unwrap_or(0),
                unresolved: resolved.is_none(),
            }
        })
        .collect()
}

/// Extracts the vertex groups of the object, with one weight per mesh vertex.
///
/// Vertices outside of a group have weight `0.0`.
pub fn extract_vertex_groups(object: &Object, mesh: &Mesh) -> Vec<ExportVertexGroup> {
    object
        .vertex_groups
        .iter()
        .map(|group| ExportVertexGroup {
            name: group.name.clone(),
            weights: (0..mesh.vertices.len() as u32)
                .map(|v| group.weight(v).unwrap_or(0.0))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::data::{Face, MaterialIndex, ObjectData, UvLayer, VertexGroup};

    use super::*;

    /// Two quads sharing the edge 1-2, plus an isolated vertex 6.
    fn strip() -> Mesh {
        Mesh {
            vertices: vec![
                [0.0, 0.0, 0.0].into(),
                [1.0, 0.0, 0.0].into(),
                [1.0, 1.0, 0.0].into(),
                [0.0, 1.0, 0.0].into(),
                [2.0, 0.0, 0.0].into(),
                [2.0, 1.0, 0.0].into(),
                [9.0, 9.0, 9.0].into(),
            ],
            faces: vec![
                Face {
                    vertices: vec![0, 1, 2, 3],
                    material_index: 0,
                },
                Face {
                    vertices: vec![1, 4, 5, 2],
                    material_index: 1,
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn no_uv_layer_gives_zero_uvs() {
        let vertices = extract_vertices(&strip());
        assert_eq!(vertices.len(), 7);
        assert!(vertices.iter().all(|v| v.uv == [0.0, 0.0]));
        assert_eq!(vertices[6].position, [9.0, 9.0, 9.0]);
    }

    #[test]
    fn last_loop_wins_for_shared_vertices() {
        let mut mesh = strip();
        mesh.uv_layers = vec![
            UvLayer {
                name: "Inactive".to_owned(),
                uv: vec![[0.9, 0.9]; 8],
            },
            UvLayer {
                name: "Main".to_owned(),
                uv: vec![
                    [0.0, 0.0],
                    [0.5, 0.0],
                    [0.5, 1.0],
                    [0.0, 1.0],
                    // Second face: 1, 4, 5, 2
                    [0.25, 0.0],
                    [1.0, 0.0],
                    [1.0, 1.0],
                    [0.25, 1.0],
                ],
            },
        ];
        mesh.active_uv_layer = Some(1);

        let uvs = vertex_uvs(&mesh);
        assert_eq!(
            uvs,
            vec![
                [0.0, 0.0],
                [0.25, 0.0],
                [0.25, 1.0],
                [0.0, 1.0],
                [1.0, 0.0],
                [1.0, 1.0],
                [0.0, 0.0],
            ]
        );
    }

    #[test]
    fn short_uv_layer_keeps_defaults() {
        let mut mesh = strip();
        mesh.uv_layers = vec![UvLayer {
            name: String::new(),
            uv: vec![[0.5, 0.5]; 2],
        }];
        mesh.active_uv_layer = Some(0);
        let uvs = vertex_uvs(&mesh);
        assert_eq!(uvs[0], [0.5, 0.5]);
        assert_eq!(uvs[1], [0.5, 0.5]);
        assert_eq!(uvs[3], [0.0, 0.0]);
    }

    #[test]
    fn faces_keep_polygon_order_and_resolve_materials() {
        let mut mesh = strip();
        mesh.materials = vec![Some(MaterialIndex::new(0)), None];
        let registry = MaterialRegistry::default();
        let faces = extract_faces(&mesh, &registry);
        assert_eq!(faces.len(), 2);
        assert_eq!(faces[1].vertices, vec![1, 4, 5, 2]);
        // Nothing is registered, so every face falls back to material 0.
        assert!(faces.iter().all(|f| f.material == 0 && f.unresolved));
    }

    #[test]
    fn vertex_groups_are_dense() {
        let mesh = strip();
        let mut object = Object::new("Arm", ObjectData::Unsupported { host_type: String::new() });
        object.vertex_groups = vec![
            VertexGroup {
                name: "Upper".to_owned(),
                weights: vec![(0, 1.0), (3, 0.5)].into_iter().collect(),
            },
            VertexGroup {
                name: "Lower".to_owned(),
                weights: vec![(4, 0.75), (100, 1.0)].into_iter().collect(),
            },
        ];

        let groups = extract_vertex_groups(&object, &mesh);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Upper");
        assert_eq!(groups[0].weights, vec![1.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.0]);
        assert_eq!(groups[1].weights, vec![0.0, 0.0, 0.0, 0.0, 0.75, 0.0, 0.0]);
    }
}
