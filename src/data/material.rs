//! Material.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Material.
///
/// Materials are identified by their position in the scene, not by value:
/// two materials with equal parameters are still distinct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Name.
    pub name: String,
    /// Ambient factor.
    #[serde(default = "default_ambient")]
    pub ambient: f32,
    /// Diffuse color.
    #[serde(default = "default_color")]
    pub diffuse_color: [f32; 3],
    /// Path of the image used as diffuse texture.
    #[serde(default)]
    pub diffuse_texture: Option<String>,
    /// Specular color.
    #[serde(default = "default_color")]
    pub specular_color: [f32; 3],
    /// Specular intensity.
    #[serde(default = "default_specular_intensity")]
    pub specular_intensity: f32,
    /// Specular hardness.
    #[serde(default = "default_specular_hardness")]
    pub specular_hardness: u32,
}

impl Material {
    /// Creates a new `Material` with default shading parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient: default_ambient(),
            diffuse_color: default_color(),
            diffuse_texture: None,
            specular_color: default_color(),
            specular_intensity: default_specular_intensity(),
            specular_hardness: default_specular_hardness(),
        }
    }

    /// Returns the file name of the diffuse texture image, if available.
    pub fn diffuse_texture_file_name(&self) -> Option<&str> {
        // Host paths may use either separator regardless of the platform.
        let path = self.diffuse_texture.as_deref()?;
        let tail = path.rsplit(|c: char| c == '/' || c == '\\').next()?;
        if tail.is_empty() {
            return None;
        }
        Path::new(tail).file_name().and_then(|name| name.to_str())
    }
}

/// Returns the default ambient factor.
fn default_ambient() -> f32 {
    1.0
}

/// Returns the default diffuse and specular color.
fn default_color() -> [f32; 3] {
    [0.8, 0.8, 0.8]
}

/// Returns the default specular intensity.
fn default_specular_intensity() -> f32 {
    0.5
}

/// Returns the default specular hardness.
fn default_specular_hardness() -> u32 {
    50
}
