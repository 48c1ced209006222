#![forbid(unsafe_code)]

use std::fs;
use std::path::Path;

use chroma_contracts::identity::UserId;
use chroma_contracts::palette::{PaletteColorCreateRequest, PaletteCreateRequest};
use chroma_contracts::MonotonicTimeNs;
use chroma_storage::store::PaletteStore;

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemPaletteSeedFile {
    #[serde(default)]
    pub palettes: Vec<SystemPaletteSeed>,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemPaletteSeed {
    #[serde(default = "default_seed_owner")]
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub source_type: Option<String>,
    pub source_reference: Option<String>,
    #[serde(default)]
    pub colors: Vec<SystemPaletteColorSeed>,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemPaletteColorSeed {
    pub hex_value: String,
    pub order_index: Option<i32>,
    pub role: Option<String>,
    pub label: Option<String>,
    pub contrast_on_light: Option<f64>,
    pub contrast_on_dark: Option<f64>,
}

fn default_seed_owner() -> String {
    "system".to_string()
}

pub fn read_seed_file(path: &Path) -> Result<SystemPaletteSeedFile, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("failed to read seed file '{}': {}", path.display(), err))?;
    serde_json::from_str(&raw)
        .map_err(|err| format!("failed to parse seed file '{}': {}", path.display(), err))
}

/// Writes every seeded palette as a system palette. Returns (palettes, colors) written.
pub fn apply_seed(
    store: &mut PaletteStore,
    seed: &SystemPaletteSeedFile,
    now: MonotonicTimeNs,
) -> Result<(usize, usize), String> {
    let mut color_count = 0;
    for palette in &seed.palettes {
        let owner = UserId::new(palette.owner_id.clone())
            .map_err(|v| format!("seed palette '{}': {}", palette.name, v))?;
        let rec = store
            .seed_system_palette(
                now,
                owner,
                &PaletteCreateRequest {
                    name: palette.name.clone(),
                    description: palette.description.clone(),
                    source_type: palette.source_type.clone(),
                    source_reference: palette.source_reference.clone(),
                    is_favorite: None,
                },
            )
            .map_err(|e| format!("seed palette '{}': {}", palette.name, e))?;
        for color in &palette.colors {
            store
                .insert_palette_color(
                    now,
                    &PaletteColorCreateRequest {
                        palette_id: rec.id.clone(),
                        hex_value: color.hex_value.clone(),
                        order_index: color.order_index,
                        role: color.role.clone(),
                        label: color.label.clone(),
                        contrast_on_light: color.contrast_on_light,
                        contrast_on_dark: color.contrast_on_dark,
                    },
                )
                .map_err(|e| format!("seed palette '{}' color: {}", palette.name, e))?;
            color_count += 1;
        }
    }
    Ok((seed.palettes.len(), color_count))
}
