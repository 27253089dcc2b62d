//! Asset manifest: one JSON file naming everything the game loads at boot.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use lunar_render::Texture;

#[derive(Debug, Clone, Deserialize)]
pub struct AssetManifest {
    pub version: String,
    /// Texture name to image path. Missing images fall back to flat white.
    pub textures: BTreeMap<String, PathBuf>,
    pub rig: PathBuf,
    pub tuning: PathBuf,
    #[serde(default)]
    pub music: Option<PathBuf>,
}

/// Texture names the renderer looks up. The manifest must provide each.
pub const REQUIRED_TEXTURES: &[&str] = &["ground", "road", "barrier", "player", "earth"];

pub fn load_manifest_from_path(path: &Path) -> Result<AssetManifest, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read manifest {}: {e}", path.display()))?;
    let manifest: AssetManifest = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse manifest JSON {}: {e}", path.display()))?;
    validate_manifest(&manifest)?;
    Ok(manifest)
}

fn validate_manifest(manifest: &AssetManifest) -> Result<(), String> {
    if manifest.version != "0.1" {
        return Err(format!(
            "Manifest validation failed: unsupported version '{}'",
            manifest.version
        ));
    }
    for &name in REQUIRED_TEXTURES {
        if !manifest.textures.contains_key(name) {
            return Err(format!(
                "Manifest validation failed: texture '{name}' is missing"
            ));
        }
    }
    Ok(())
}

impl AssetManifest {
    /// Number of discrete loading steps, used to scale the progress bar.
    pub fn step_count(&self) -> usize {
        // Textures plus the rig and tuning files.
        self.textures.len() + 2
    }
}

/// Load one texture from disk, falling back to flat white if the file is
/// absent or unreadable so the game still comes up.
pub fn load_texture_or_fallback(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    path: &Path,
    label: &str,
) -> Texture {
    match fs::read(path) {
        Ok(bytes) => Texture::from_bytes(device, queue, &bytes, label),
        Err(e) => {
            log::warn!(
                "Failed to read texture {}: {e}; using fallback",
                path.display()
            );
            Texture::white(device, queue, label)
        }
    }
}
