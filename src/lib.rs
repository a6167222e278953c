//! Quick3D scene exporter.
//!
//! Converts a 3D scene snapshot (meshes, materials, armatures) into a Quick3D
//! (`.q3d`) scene document.
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

pub use self::cli_opt::CliOpt;

mod cli_opt;
pub mod data;
pub mod q3d;
