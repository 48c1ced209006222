#![forbid(unsafe_code)]

use chroma_contracts::identity::UserId;
use chroma_contracts::palette::{
    PaletteColorCreateRequest, PaletteColorId, PaletteColorPatch, PaletteColorRecord,
    PaletteCreateRequest, PaletteId, PalettePatch, PaletteRecord,
};
use chroma_contracts::MonotonicTimeNs;

use crate::store::{PaletteStore, StorageError};

/// Typed repository interface for the `ColorPalettes` + `PaletteColors` tables.
///
/// This is the query/mutation surface the authorization core runs against.
/// Color reads and writes are always keyed by the (color id, palette id) pair.
pub trait PaletteTablesRepo {
    fn insert_palette_row(
        &mut self,
        now: MonotonicTimeNs,
        user_id: UserId,
        input: &PaletteCreateRequest,
    ) -> Result<PaletteRecord, StorageError>;

    fn palette_row(&self, palette_id: &PaletteId) -> Option<&PaletteRecord>;

    fn update_palette_row(
        &mut self,
        now: MonotonicTimeNs,
        palette_id: &PaletteId,
        patch: &PalettePatch,
    ) -> Result<PaletteRecord, StorageError>;

    fn palette_rows_visible_to(
        &self,
        user_id: &UserId,
        favorites_only: bool,
    ) -> Result<Vec<PaletteRecord>, StorageError>;

    fn insert_palette_color_row(
        &mut self,
        now: MonotonicTimeNs,
        input: &PaletteColorCreateRequest,
    ) -> Result<PaletteColorRecord, StorageError>;

    fn palette_color_row(
        &self,
        color_id: &PaletteColorId,
        palette_id: &PaletteId,
    ) -> Option<&PaletteColorRecord>;

    fn update_palette_color_row(
        &mut self,
        color_id: &PaletteColorId,
        palette_id: &PaletteId,
        patch: &PaletteColorPatch,
    ) -> Result<PaletteColorRecord, StorageError>;

    /// Returns the affected-row count.
    fn delete_palette_color_row(
        &mut self,
        color_id: &PaletteColorId,
        palette_id: &PaletteId,
    ) -> Result<usize, StorageError>;

    fn palette_color_rows_for_palette(
        &self,
        palette_id: &PaletteId,
    ) -> Result<Vec<PaletteColorRecord>, StorageError>;
}

impl PaletteTablesRepo for PaletteStore {
    fn insert_palette_row(
        &mut self,
        now: MonotonicTimeNs,
        user_id: UserId,
        input: &PaletteCreateRequest,
    ) -> Result<PaletteRecord, StorageError> {
        self.insert_palette(now, user_id, input)
    }

    fn palette_row(&self, palette_id: &PaletteId) -> Option<&PaletteRecord> {
        self.get_palette(palette_id)
    }

    fn update_palette_row(
        &mut self,
        now: MonotonicTimeNs,
        palette_id: &PaletteId,
        patch: &PalettePatch,
    ) -> Result<PaletteRecord, StorageError> {
        self.update_palette(now, palette_id, patch)
    }

    fn palette_rows_visible_to(
        &self,
        user_id: &UserId,
        favorites_only: bool,
    ) -> Result<Vec<PaletteRecord>, StorageError> {
        Ok(self
            .palettes_visible_to(user_id, favorites_only)
            .into_iter()
            .cloned()
            .collect())
    }

    fn insert_palette_color_row(
        &mut self,
        now: MonotonicTimeNs,
        input: &PaletteColorCreateRequest,
    ) -> Result<PaletteColorRecord, StorageError> {
        self.insert_palette_color(now, input)
    }

    fn palette_color_row(
        &self,
        color_id: &PaletteColorId,
        palette_id: &PaletteId,
    ) -> Option<&PaletteColorRecord> {
        self.get_palette_color(color_id, palette_id)
    }

    fn update_palette_color_row(
        &mut self,
        color_id: &PaletteColorId,
        palette_id: &PaletteId,
        patch: &PaletteColorPatch,
    ) -> Result<PaletteColorRecord, StorageError> {
        self.update_palette_color(color_id, palette_id, patch)
    }

    fn delete_palette_color_row(
        &mut self,
        color_id: &PaletteColorId,
        palette_id: &PaletteId,
    ) -> Result<usize, StorageError> {
        Ok(self.delete_palette_color(color_id, palette_id))
    }

    fn palette_color_rows_for_palette(
        &self,
        palette_id: &PaletteId,
    ) -> Result<Vec<PaletteColorRecord>, StorageError> {
        Ok(self
            .palette_colors_for_palette(palette_id)
            .into_iter()
            .cloned()
            .collect())
    }
}
