//! Quick3D scene exporter.

use anyhow::Context;
use clap::Parser;
use log::{debug, info};

use q3d_export::{data::Scene, q3d, CliOpt};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    info!("version: {}", env!("CARGO_PKG_VERSION"));

    let opt = CliOpt::parse();
    debug!("opt: {:?}", opt);

    let scene = Scene::open(&opt.scene_path)
        .with_context(|| format!("Failed to load scene {}", opt.scene_path.display()))?;
    let output = opt.output_path();
    let report = q3d::export_to_path(&scene, &output, &opt.export_options())
        .with_context(|| format!("Failed to export to {}", output.display()))?;

    for diagnostic in &report.diagnostics {
        eprintln!("warning: {}", diagnostic);
    }
    println!(
        "{}: {} materials, {} components, {} bones, {} vertices, {} faces",
        output.display(),
        report.materials,
        report.components,
        report.bones,
        report.vertices,
        report.faces
    );

    Ok(())
}
