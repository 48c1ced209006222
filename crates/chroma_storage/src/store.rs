#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use chroma_contracts::identity::UserId;
use chroma_contracts::palette::{
    PaletteColorCreateRequest, PaletteColorId, PaletteColorPatch, PaletteColorRecord,
    PaletteCreateRequest, PaletteId, PalettePatch, PaletteRecord,
};
use chroma_contracts::{ContractViolation, MonotonicTimeNs, Validate};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StorageError {
    #[error("foreign key violation on {table}: {key}")]
    ForeignKeyViolation { table: &'static str, key: String },
    #[error("no row in {table} for {key}")]
    RowNotFound { table: &'static str, key: String },
    #[error("duplicate key in {table}: {key}")]
    DuplicateKey { table: &'static str, key: String },
    #[error("contract violation: {0}")]
    ContractViolation(ContractViolation),
}

impl From<ContractViolation> for StorageError {
    fn from(v: ContractViolation) -> Self {
        StorageError::ContractViolation(v)
    }
}

fn sha256_hex_16(s: &str) -> String {
    let digest = Sha256::digest(s.as_bytes());
    digest
        .iter()
        .take(8)
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// In-memory rendition of the `ColorPalettes` and `PaletteColors` tables.
///
/// Row ids are derived from a per-store sequence, so they never collide within
/// one store. Mutations validate the full post-image before writing it back;
/// a rejected write leaves the row untouched.
#[derive(Debug, Default, Clone)]
pub struct PaletteStore {
    palettes: BTreeMap<PaletteId, PaletteRecord>,
    palette_colors: BTreeMap<PaletteColorId, PaletteColorRecord>,
    next_row_seq: u64,
}

impl PaletteStore {
    pub fn new_in_memory() -> Self {
        Self::default()
    }

    fn next_row_key(&mut self, scope: &str, now: MonotonicTimeNs) -> String {
        self.next_row_seq = self.next_row_seq.saturating_add(1);
        sha256_hex_16(&format!("{scope}:{}:{}", now.0, self.next_row_seq))
    }

    fn next_palette_id(
        &mut self,
        user_id: &UserId,
        now: MonotonicTimeNs,
    ) -> Result<PaletteId, StorageError> {
        let id = PaletteId::new(format!(
            "pal_{}",
            self.next_row_key(user_id.as_str(), now)
        ))?;
        if self.palettes.contains_key(&id) {
            return Err(StorageError::DuplicateKey {
                table: "ColorPalettes.id",
                key: id.as_str().to_string(),
            });
        }
        Ok(id)
    }

    fn next_palette_color_id(
        &mut self,
        palette_id: &PaletteId,
        now: MonotonicTimeNs,
    ) -> Result<PaletteColorId, StorageError> {
        let id = PaletteColorId::new(format!(
            "pcol_{}",
            self.next_row_key(palette_id.as_str(), now)
        ))?;
        if self.palette_colors.contains_key(&id) {
            return Err(StorageError::DuplicateKey {
                table: "PaletteColors.id",
                key: id.as_str().to_string(),
            });
        }
        Ok(id)
    }

    pub fn insert_palette(
        &mut self,
        now: MonotonicTimeNs,
        user_id: UserId,
        input: &PaletteCreateRequest,
    ) -> Result<PaletteRecord, StorageError> {
        input.validate()?;
        let id = self.next_palette_id(&user_id, now)?;
        let rec = PaletteRecord::v1_user(id, user_id, input, now)?;
        self.palettes.insert(rec.id.clone(), rec.clone());
        Ok(rec)
    }

    /// Loads a shared palette. This is the only write path that sets `is_system`.
    pub fn seed_system_palette(
        &mut self,
        now: MonotonicTimeNs,
        user_id: UserId,
        input: &PaletteCreateRequest,
    ) -> Result<PaletteRecord, StorageError> {
        input.validate()?;
        let id = self.next_palette_id(&user_id, now)?;
        let rec = PaletteRecord::v1_system(id, user_id, input, now)?;
        self.palettes.insert(rec.id.clone(), rec.clone());
        Ok(rec)
    }

    pub fn get_palette(&self, palette_id: &PaletteId) -> Option<&PaletteRecord> {
        self.palettes.get(palette_id)
    }

    pub fn palettes(&self) -> &BTreeMap<PaletteId, PaletteRecord> {
        &self.palettes
    }

    pub fn update_palette(
        &mut self,
        now: MonotonicTimeNs,
        palette_id: &PaletteId,
        patch: &PalettePatch,
    ) -> Result<PaletteRecord, StorageError> {
        let current = self
            .palettes
            .get(palette_id)
            .ok_or_else(|| StorageError::RowNotFound {
                table: "ColorPalettes",
                key: palette_id.as_str().to_string(),
            })?;
        let mut next = current.clone();
        patch.apply_to(&mut next);
        next.updated_at = now;
        next.validate()?;
        self.palettes.insert(palette_id.clone(), next.clone());
        Ok(next)
    }

    /// Palettes owned by `user_id` plus every system palette.
    pub fn palettes_visible_to(
        &self,
        user_id: &UserId,
        favorites_only: bool,
    ) -> Vec<&PaletteRecord> {
        self.palettes
            .values()
            .filter(|p| p.user_id == *user_id || p.is_system)
            .filter(|p| !favorites_only || p.is_favorite)
            .collect()
    }

    pub fn insert_palette_color(
        &mut self,
        now: MonotonicTimeNs,
        input: &PaletteColorCreateRequest,
    ) -> Result<PaletteColorRecord, StorageError> {
        input.validate()?;
        if !self.palettes.contains_key(&input.palette_id) {
            return Err(StorageError::ForeignKeyViolation {
                table: "PaletteColors.paletteId",
                key: input.palette_id.as_str().to_string(),
            });
        }
        let id = self.next_palette_color_id(&input.palette_id, now)?;
        let rec = PaletteColorRecord::v1(id, input, now)?;
        self.palette_colors.insert(rec.id.clone(), rec.clone());
        Ok(rec)
    }

    /// Matches on the (id, paletteId) pair; a color under another palette is invisible here.
    pub fn get_palette_color(
        &self,
        color_id: &PaletteColorId,
        palette_id: &PaletteId,
    ) -> Option<&PaletteColorRecord> {
        self.palette_colors
            .get(color_id)
            .filter(|c| c.palette_id == *palette_id)
    }

    pub fn palette_colors(&self) -> &BTreeMap<PaletteColorId, PaletteColorRecord> {
        &self.palette_colors
    }

    pub fn update_palette_color(
        &mut self,
        color_id: &PaletteColorId,
        palette_id: &PaletteId,
        patch: &PaletteColorPatch,
    ) -> Result<PaletteColorRecord, StorageError> {
        let current = self
            .get_palette_color(color_id, palette_id)
            .ok_or_else(|| StorageError::RowNotFound {
                table: "PaletteColors",
                key: format!("{}:{}", palette_id.as_str(), color_id.as_str()),
            })?;
        let mut next = current.clone();
        patch.apply_to(&mut next);
        next.validate()?;
        self.palette_colors.insert(color_id.clone(), next.clone());
        Ok(next)
    }

    /// Hard delete. Returns the number of rows removed (0 or 1).
    pub fn delete_palette_color(
        &mut self,
        color_id: &PaletteColorId,
        palette_id: &PaletteId,
    ) -> usize {
        if self.get_palette_color(color_id, palette_id).is_none() {
            return 0;
        }
        usize::from(self.palette_colors.remove(color_id).is_some())
    }

    pub fn palette_colors_for_palette(&self, palette_id: &PaletteId) -> Vec<&PaletteColorRecord> {
        self.palette_colors
            .values()
            .filter(|c| c.palette_id == *palette_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn named(name: &str) -> PaletteCreateRequest {
        PaletteCreateRequest {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn color(palette_id: &PaletteId, hex: &str) -> PaletteColorCreateRequest {
        PaletteColorCreateRequest {
            palette_id: palette_id.clone(),
            hex_value: hex.to_string(),
            order_index: None,
            role: None,
            label: None,
            contrast_on_light: None,
            contrast_on_dark: None,
        }
    }

    #[test]
    fn generated_ids_are_prefixed_and_distinct() {
        let mut s = PaletteStore::new_in_memory();
        let a = s
            .insert_palette(MonotonicTimeNs(1), user("user_a"), &named("One"))
            .unwrap();
        let b = s
            .insert_palette(MonotonicTimeNs(1), user("user_a"), &named("One"))
            .unwrap();
        assert!(a.id.as_str().starts_with("pal_"));
        assert_eq!(a.id.as_str().len(), "pal_".len() + 16);
        assert_ne!(a.id, b.id);

        let c = s
            .insert_palette_color(MonotonicTimeNs(2), &color(&a.id, "#FFFFFF"))
            .unwrap();
        assert!(c.id.as_str().starts_with("pcol_"));
    }

    #[test]
    fn rejected_patch_leaves_row_untouched() {
        let mut s = PaletteStore::new_in_memory();
        let p = s
            .insert_palette(MonotonicTimeNs(5), user("user_a"), &named("Sunset"))
            .unwrap();
        // now earlier than created_at fails post-image validation
        let out = s.update_palette(
            MonotonicTimeNs(4),
            &p.id,
            &PalettePatch {
                name: Some("Dusk".to_string()),
                ..Default::default()
            },
        );
        assert!(matches!(out, Err(StorageError::ContractViolation(_))));
        assert_eq!(s.get_palette(&p.id).unwrap().name, "Sunset");
    }

    #[test]
    fn delete_requires_matching_parent() {
        let mut s = PaletteStore::new_in_memory();
        let a = s
            .insert_palette(MonotonicTimeNs(1), user("user_a"), &named("A"))
            .unwrap();
        let b = s
            .insert_palette(MonotonicTimeNs(1), user("user_a"), &named("B"))
            .unwrap();
        let c = s
            .insert_palette_color(MonotonicTimeNs(2), &color(&a.id, "#123456"))
            .unwrap();
        assert_eq!(s.delete_palette_color(&c.id, &b.id), 0);
        assert_eq!(s.palette_colors_for_palette(&a.id).len(), 1);
        assert_eq!(s.delete_palette_color(&c.id, &a.id), 1);
        assert_eq!(s.delete_palette_color(&c.id, &a.id), 0);
    }
}
