//! Scene graph traversal.

use std::{fmt, io::Write};

use cgmath::Vector3;
use log::{debug, trace, warn};

use crate::{
    data::{Armature, BoneIndex, Material, Object, ObjectData, ObjectIndex, Scene},
    q3d::{
        axis::{self, BoneAxes},
        geometry,
        writer::{DocumentWriter, XML_HEADER},
        Diagnostic, DiagnosticKind, ExportError, ExportOptions, ExportReport, MaterialRegistry,
    },
};

/// Class name of mesh components.
const CLASS_MESH: &str = "CMesh";
/// Class name of armature components.
const CLASS_ARMATURE: &str = "CArmature";
/// Directory of texture images, relative to the document.
const TEXTURE_DIR: &str = "Textures/";

/// Walks the scene and writes the document.
pub(crate) struct Traverser<'a, W> {
    /// Scene.
    scene: &'a Scene,
    /// Options.
    options: &'a ExportOptions,
    /// Materials written to the document.
    registry: MaterialRegistry,
    /// Writer.
    writer: DocumentWriter<W>,
    /// Report.
    report: ExportReport,
}

impl<'a, W: Write> Traverser<'a, W> {
    /// Creates a new `Traverser`, collecting the scene materials.
    pub(crate) fn new(scene: &'a Scene, options: &'a ExportOptions, sink: W) -> Self {
        let registry = MaterialRegistry::collect(scene, options.evaluation_flags());
        debug!("{} materials registered", registry.len());
        Self {
            scene,
            options,
            registry,
            writer: DocumentWriter::new(sink),
            report: ExportReport::default(),
        }
    }

    /// Writes the whole document.
    pub(crate) fn run(mut self) -> Result<ExportReport, ExportError> {
        self.writer.write_raw(XML_HEADER)?;
        self.writer.open_node("Root", &[], false)?;

        let scene = self.scene;
        let materials = self.registry.iter().collect::<Vec<_>>();
        for material in materials {
            if let Some(material) = scene.material(material) {
                self.write_material(material)?;
            }
        }

        for object in scene.root_objects() {
            self.write_object(object)?;
        }

        self.writer.close_node("Root")?;
        self.writer.finish()?;
        Ok(self.report)
    }

    /// Records a non-fatal problem.
    fn diagnose(&mut self, kind: DiagnosticKind, object: &Object, message: String) {
        let diagnostic = Diagnostic::new(kind, &object.name, message);
        match kind {
            DiagnosticKind::MissingData => debug!("{}", diagnostic),
            _ => warn!("{}", diagnostic),
        }
        self.report.diagnostics.push(diagnostic);
    }

    /// Writes a material.
    fn write_material(&mut self, material: &Material) -> Result<(), ExportError> {
        trace!("Writing material {:?}", material.name);
        let map = material
            .diffuse_texture_file_name()
            .map_or_else(String::new, |name| format!("{}{}", TEXTURE_DIR, escape(name)));
        let [dr, dg, db] = material.diffuse_color;
        let [sr, sg, sb] = material.specular_color;

        self.writer
            .open_node("Material", &[("Name", escape(&material.name))], false)?;
        self.writer.leaf(
            "Ambient",
            &[
                ("r", float(material.ambient)),
                ("g", float(material.ambient)),
                ("b", float(material.ambient)),
            ],
        )?;
        self.writer.leaf(
            "Diffuse",
            &[
                ("r", float(dr)),
                ("g", float(dg)),
                ("b", float(db)),
                ("Map", map),
            ],
        )?;
        self.writer.leaf(
            "Specular",
            &[
                ("r", float(sr)),
                ("g", float(sg)),
                ("b", float(sb)),
                ("Intensity", float(material.specular_intensity)),
                ("Hardness", material.specular_hardness.to_string()),
            ],
        )?;
        self.writer.close_node("Material")?;

        self.report.materials += 1;
        Ok(())
    }

    /// Writes an object and its descendants.
    fn write_object(&mut self, i: ObjectIndex) -> Result<(), ExportError> {
        let scene = self.scene;
        let object = match scene.object(i) {
            Some(v) => v,
            None => return Ok(()),
        };
        match &object.data {
            ObjectData::Mesh(_) => self.write_mesh(i, object),
            ObjectData::Armature(armature) => self.write_armature(object, armature),
            ObjectData::Unsupported { .. } => {
                debug!(
                    "Skipping object {:?} of unsupported type {:?}",
                    object.name,
                    object.data.type_name()
                );
                Ok(())
            }
        }
    }

    /// Writes the children of an object.
    fn write_children(&mut self, object: &Object) -> Result<(), ExportError> {
        for &child in object.children() {
            self.write_object(child)?;
        }
        Ok(())
    }

    /// Writes a mesh component.
    fn write_mesh(&mut self, i: ObjectIndex, object: &'a Object) -> Result<(), ExportError> {
        let scene = self.scene;
        let mesh = match scene.evaluated_mesh(i, self.options.evaluation_flags()) {
            Some(v) => v,
            None => {
                self.diagnose(
                    DiagnosticKind::SkippedObject,
                    object,
                    "no geometry could be evaluated".to_owned(),
                );
                return Ok(());
            }
        };
        debug!(
            "Writing mesh {:?}: {} vertices, {} faces",
            object.name,
            mesh.vertices.len(),
            mesh.faces.len()
        );

        self.writer.open_node(
            "Component",
            &[("Name", escape(&object.name)), ("Class", CLASS_MESH.to_owned())],
            false,
        )?;

        let local = object.local_matrix();
        let position = axis::to_y_up(axis::translation(&local));
        let rotation = axis::rotation_to_y_up(axis::euler_zxy(&axis::rotation(&local)));
        self.writer.leaf("Position", &xyz(position))?;
        self.writer.leaf("Rotation", &xyz(rotation))?;

        if mesh.active_uv_layer().is_none() && !mesh.vertices.is_empty() {
            self.diagnose(
                DiagnosticKind::MissingData,
                object,
                "no active UV layer, texture coordinates default to (0, 0)".to_owned(),
            );
        }
        self.writer.open_node("Vertices", &[], false)?;
        for vertex in geometry::extract_vertices(&mesh) {
            let p = axis::to_y_up(vertex.position.into());
            let [u, v] = vertex.uv;
            self.writer.leaf(
                "Vertex",
                &[
                    ("x", float(p.x)),
                    ("y", float(p.y)),
                    ("z", float(p.z)),
                    ("u", float(u)),
                    ("v", float(v)),
                ],
            )?;
            self.report.vertices += 1;
        }
        self.writer.close_node("Vertices")?;

        let faces = geometry::extract_faces(&mesh, &self.registry);
        let unresolved = faces.iter().filter(|face| face.unresolved).count();
        if unresolved > 0 && !mesh.materials.is_empty() {
            self.diagnose(
                DiagnosticKind::UnresolvedReference,
                object,
                format!("{} faces refer to an empty or unknown material slot, using material 0", unresolved),
            );
        }
        self.writer.open_node("Faces", &[], false)?;
        for face in faces {
            self.writer.leaf(
                "Face",
                &[
                    ("Vertices", join(&face.vertices, |v| v.to_string())),
                    ("Material", face.material.to_string()),
                ],
            )?;
            self.report.faces += 1;
        }
        self.writer.close_node("Faces")?;

        for group in geometry::extract_vertex_groups(object, &mesh) {
            self.writer.leaf(
                "VertexGroup",
                &[
                    ("Name", escape(&group.name)),
                    ("Weights", join(&group.weights, |w| float(*w))),
                ],
            )?;
        }

        self.write_children(object)?;
        self.writer.close_node("Component")?;
        self.report.components += 1;
        Ok(())
    }

    /// Writes an armature component.
    fn write_armature(&mut self, object: &'a Object, armature: &'a Armature) -> Result<(), ExportError> {
        debug!(
            "Writing armature {:?}: {} bones",
            object.name,
            armature.bones.len()
        );
        self.writer.open_node(
            "Component",
            &[
                ("Name", escape(&object.name)),
                ("Class", CLASS_ARMATURE.to_owned()),
            ],
            false,
        )?;

        for root in armature.roots() {
            self.write_bone(armature, root)?;
        }

        self.write_children(object)?;
        self.writer.close_node("Component")?;
        self.report.components += 1;
        Ok(())
    }

    /// Writes a bone and its descendants.
    fn write_bone(&mut self, armature: &Armature, i: BoneIndex) -> Result<(), ExportError> {
        let bone = match armature.bone(i) {
            Some(v) => v,
            None => return Ok(()),
        };
        let axes = BoneAxes::from_bone(bone);

        self.writer
            .open_node("Bone", &[("Name", escape(&bone.name))], false)?;
        self.writer
            .leaf("Head", &xyz(axis::to_y_up(bone.head.into())))?;
        self.writer
            .leaf("Tail", &xyz(axis::to_y_up(bone.tail.into())))?;
        self.writer.leaf("XAxis", &xyz(axes.x))?;
        self.writer.leaf("YAxis", &xyz(axes.y))?;
        self.writer.leaf("ZAxis", &xyz(axes.z))?;
        for &child in bone.children() {
            self.write_bone(armature, child)?;
        }
        self.writer.close_node("Bone")?;

        self.report.bones += 1;
        Ok(())
    }
}

/// Formats a number with 4 fractional digits.
fn float(v: f32) -> String {
    let s = format!("{:.4}", v);
    // Values rounding to zero are written without a sign.
    if s == "-0.0000" {
        "0.0000".to_owned()
    } else {
        s
    }
}

/// Escapes markup characters in an attribute value.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Returns `x`, `y`, and `z` attributes.
fn xyz(v: Vector3<f32>) -> [(&'static str, String); 3] {
    [("x", float(v.x)), ("y", float(v.y)), ("z", float(v.z))]
}

/// Joins the formatted items with `", "`.
fn join<T, F, S>(items: &[T], f: F) -> String
where
    F: Fn(&T) -> S,
    S: fmt::Display,
{
    let mut out = String::new();
    for (n, item) in items.iter().enumerate() {
        if n > 0 {
            out.push_str(", ");
        }
        out.push_str(&f(item).to_string());
    }
    out
}
