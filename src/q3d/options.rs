//! Export options.

use std::{fmt, str::FromStr};

use crate::{data::EvaluationFlags, q3d::ExportError};

/// Export options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOptions {
    /// Export the geometry after the modifier stack.
    pub apply_modifiers: bool,
    /// Transform vertex positions into world space.
    pub world_space: bool,
    /// Rotate 90 degrees around X to convert to Y-up.
    ///
    /// Accepted for compatibility. The Z-up to Y-up component swap is always
    /// applied, whatever the value.
    pub convert_to_y_up: bool,
    /// First frame of the animation range.
    pub range_start: i32,
    /// Last frame of the animation range.
    pub range_end: i32,
    /// Frames per animation sample.
    pub sampling: Sampling,
}

impl ExportOptions {
    /// Returns the flags for mesh evaluation.
    pub fn evaluation_flags(&self) -> EvaluationFlags {
        EvaluationFlags {
            apply_modifiers: self.apply_modifiers,
            world_space: self.world_space,
        }
    }

    /// Checks that the options are consistent.
    pub fn validate(&self) -> Result<(), ExportError> {
        if self.range_end < self.range_start {
            return Err(ExportError::InvalidOptions(format!(
                "frame range end ({}) precedes its start ({})",
                self.range_end, self.range_start
            )));
        }
        Ok(())
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            apply_modifiers: true,
            world_space: false,
            convert_to_y_up: true,
            range_start: 1,
            range_end: 250,
            sampling: Sampling::default(),
        }
    }
}

/// Frames per animation sample (`0.1` yields 10 samples per frame).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sampling {
    /// 0.01 frames.
    Hundredth,
    /// 0.05 frames.
    Twentieth,
    /// 0.1 frames.
    Tenth,
    /// 0.2 frames.
    Fifth,
    /// 0.25 frames.
    Quarter,
    /// 0.5 frames.
    Half,
    /// 1 frame.
    One,
    /// 2 frames.
    Two,
    /// 3 frames.
    Three,
    /// 4 frames.
    Four,
    /// 5 frames.
    Five,
    /// 10 frames.
    Ten,
}

impl Sampling {
    /// All accepted values, in ascending order.
    pub const ALL: [Sampling; 12] = [
        Sampling::Hundredth,
        Sampling::Twentieth,
        Sampling::Tenth,
        Sampling::Fifth,
        Sampling::Quarter,
        Sampling::Half,
        Sampling::One,
        Sampling::Two,
        Sampling::Three,
        Sampling::Four,
        Sampling::Five,
        Sampling::Ten,
    ];

    /// Returns the textual form.
    pub fn as_str(self) -> &'static str {
        match self {
            Sampling::Hundredth => "0.01",
            Sampling::Twentieth => "0.05",
            Sampling::Tenth => "0.1",
            Sampling::Fifth => "0.2",
            Sampling::Quarter => "0.25",
            Sampling::Half => "0.5",
            Sampling::One => "1",
            Sampling::Two => "2",
            Sampling::Three => "3",
            Sampling::Four => "4",
            Sampling::Five => "5",
            Sampling::Ten => "10",
        }
    }
}

impl Default for Sampling {
    fn default() -> Self {
        Sampling::One
    }
}

impl fmt::Display for Sampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sampling {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| {
                let accepted = Self::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>();
                format!("Unknown sampling {:?} (accepted: {})", s, accepted.join(", "))
            })
    }
}
