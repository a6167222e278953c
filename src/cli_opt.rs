//! CLI options.

use std::path::PathBuf;

use clap::Parser;

use crate::q3d::{ExportOptions, Sampling, EXTENSION};

/// CLI options.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct CliOpt {
    /// Scene snapshot (JSON)
    pub scene_path: PathBuf,
    /// Output document (defaults to the scene path with `.q3d` extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Export the authored geometry instead of the modifier-evaluated one
    #[arg(long)]
    pub no_apply_modifiers: bool,
    /// Transform vertex coordinates into world space
    #[arg(long)]
    pub world_space: bool,
    /// Do not rotate 90 degrees around X to convert to Y-up
    #[arg(long)]
    pub no_y_up: bool,
    /// First frame to use for export
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub range_start: i32,
    /// Last frame to use for export
    #[arg(long, default_value_t = 250, allow_negative_numbers = true)]
    pub range_end: i32,
    /// Frames per sample (0.1 yields 10 samples per frame)
    #[arg(long, default_value_t = Sampling::One)]
    pub sampling: Sampling,
}

impl CliOpt {
    /// Returns the output path.
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) if path.extension().map_or(false, |ext| ext == EXTENSION) => path.clone(),
            Some(path) => {
                let mut name = path.clone().into_os_string();
                name.push(".");
                name.push(EXTENSION);
                name.into()
            }
            None => self.scene_path.with_extension(EXTENSION),
        }
    }

    /// Returns the export options.
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            apply_modifiers: !self.no_apply_modifiers,
            world_space: self.world_space,
            convert_to_y_up: !self.no_y_up,
            range_start: self.range_start,
            range_end: self.range_end,
            sampling: self.sampling,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn options_from_arguments() {
        let opt = CliOpt::parse_from(&[
            "q3d-export",
            "scenes/hangar.json",
            "--world-space",
            "--no-apply-modifiers",
            "--sampling",
            "0.25",
            "--range-start",
            "-10",
        ]);
        let options = opt.export_options();
        assert!(!options.apply_modifiers);
        assert!(options.world_space);
        assert!(options.convert_to_y_up);
        assert_eq!(options.sampling, Sampling::Quarter);
        assert_eq!((options.range_start, options.range_end), (-10, 250));
        assert_eq!(opt.output_path(), Path::new("scenes/hangar.q3d"));
    }

    #[test]
    fn output_extension_is_ensured() {
        let opt = CliOpt::parse_from(&["q3d-export", "a.json", "-o", "out/plane"]);
        assert_eq!(opt.output_path(), Path::new("out/plane.q3d"));
        let opt = CliOpt::parse_from(&["q3d-export", "a.json", "-o", "out/plane.q3d"]);
        assert_eq!(opt.output_path(), Path::new("out/plane.q3d"));
    }

    #[test]
    fn unknown_sampling_is_rejected() {
        assert!(CliOpt::try_parse_from(&["q3d-export", "a.json", "--sampling", "0.3"]).is_err());
    }
}
