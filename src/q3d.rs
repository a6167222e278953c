//! Quick3D (`.q3d`) scene document export.
//!
//! The document is an indentation-formatted XML tree: a `Root` element with
//! the de-duplicated `Material` list first, then one `Component` element per
//! top-level object, nesting child objects and bones.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
    time::Instant,
};

use log::{info, warn};

pub use self::{
    error::{Diagnostic, DiagnosticKind, ExportError},
    geometry::{
        extract_faces, extract_vertex_groups, extract_vertices, ExportFace, ExportVertex,
        ExportVertexGroup,
    },
    materials::MaterialRegistry,
    options::{ExportOptions, Sampling},
    writer::{DocumentWriter, XML_HEADER},
};

use self::traverse::Traverser;
use crate::data::Scene;

pub mod axis;
mod error;
mod geometry;
mod materials;
mod options;
mod traverse;
mod writer;

/// File name extension of Quick3D documents.
pub const EXTENSION: &str = "q3d";

/// Summary of a successful export.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct ExportReport {
    /// Number of materials written.
    pub materials: usize,
    /// Number of components written.
    pub components: usize,
    /// Number of bones written.
    pub bones: usize,
    /// Number of vertices written.
    pub vertices: usize,
    /// Number of faces written.
    pub faces: usize,
    /// Non-fatal problems.
    pub diagnostics: Vec<Diagnostic>,
}

impl ExportReport {
    /// Returns an iterator of diagnostics of the given kind.
    pub fn diagnostics_of(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }
}

/// Writes the scene document to the sink.
pub fn export<W: Write>(
    scene: &Scene,
    sink: W,
    options: &ExportOptions,
) -> Result<ExportReport, ExportError> {
    options.validate()?;
    if !options.convert_to_y_up {
        // The component swap is part of the document convention.
        info!("Y-up conversion cannot be disabled, exporting with Y-up axes");
    }
    Traverser::new(scene, options, sink).run()
}

/// Writes the scene document to the file.
///
/// On failure, the partially written file is removed.
pub fn export_to_path(
    scene: &Scene,
    path: impl AsRef<Path>,
    options: &ExportOptions,
) -> Result<ExportReport, ExportError> {
    let path = path.as_ref();
    let start = Instant::now();
    info!("Exporting to {}", path.display());

    options.validate()?;
    let report = write_file(path, |sink| export(scene, sink, options))?;
    info!(
        "Finished export in {:.3} seconds: {} components, {} materials",
        start.elapsed().as_secs_f64(),
        report.components,
        report.materials
    );
    Ok(report)
}

/// Creates the file and writes it with the given function.
///
/// The file is removed if writing fails.
fn write_file<F>(path: &Path, write: F) -> Result<ExportReport, ExportError>
where
    F: FnOnce(BufWriter<File>) -> Result<ExportReport, ExportError>,
{
    let file = File::create(path)?;
    // The sink is dropped, and the file closed, before removal.
    let result = write(BufWriter::new(file));
    if let Err(e) = &result {
        warn!("Export to {} failed: {}", path.display(), e);
        if let Err(remove_err) = fs::remove_file(path) {
            warn!(
                "Failed to remove incomplete document {}: {}",
                path.display(),
                remove_err
            );
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_document_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.q3d");

        let err = write_file(&path, |mut sink| {
            sink.write_all(XML_HEADER.as_bytes())?;
            sink.flush()?;
            assert!(std::fs::metadata(&path).unwrap().len() > 0);

            let mut writer = DocumentWriter::new(sink);
            writer.open_node("Root", &[], false)?;
            writer.finish().map(|_| ExportReport::default())
        })
        .unwrap_err();

        assert!(matches!(err, ExportError::UnclosedNodes { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn complete_document_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.q3d");

        let report = write_file(&path, |sink| {
            let mut writer = DocumentWriter::new(sink);
            writer.open_node("Root", &[], false)?;
            writer.close_node("Root")?;
            writer.finish()?;
            Ok(ExportReport::default())
        })
        .unwrap();

        assert_eq!(report, ExportReport::default());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<Root>\n</Root>\n");
    }
}
