#![forbid(unsafe_code)]

use chroma_contracts::identity::RequestContext;
use chroma_contracts::palette::{
    PaletteColorCreateRequest, PaletteColorDeleteRequest, PaletteColorListRequest,
    PaletteColorListResult, PaletteColorRecord, PaletteColorUpdateRequest,
};
use chroma_contracts::{MonotonicTimeNs, Validate};
use chroma_storage::repo::PaletteTablesRepo;
use tracing::{debug, info, warn};

use crate::access::{require_caller, resolve_owned_palette};
use crate::runtime::reason_codes;
use crate::{PaletteError, PaletteRuntime};

fn color_not_found(req_color: &str, req_palette: &str) -> PaletteError {
    PaletteError::NotFound {
        entity: "palette color",
        key: format!("{req_palette}:{req_color}"),
    }
}

impl PaletteRuntime {
    pub fn create_palette_color<R: PaletteTablesRepo>(
        &self,
        store: &mut R,
        ctx: &RequestContext,
        now: MonotonicTimeNs,
        req: &PaletteColorCreateRequest,
    ) -> Result<PaletteColorRecord, PaletteError> {
        let caller = require_caller(ctx)?;
        req.validate()?;
        resolve_owned_palette(store, &req.palette_id, &caller)?;

        let rec = store.insert_palette_color_row(now, req)?;
        info!(
            palette_id = rec.palette_id.as_str(),
            color_id = rec.id.as_str(),
            reason_code = reason_codes::PALETTE_COLOR_OK_CREATE.0,
            "palette color created"
        );
        Ok(rec)
    }

    /// The color must live under the named palette; a color id from any other
    /// palette is reported as missing.
    pub fn update_palette_color<R: PaletteTablesRepo>(
        &self,
        store: &mut R,
        ctx: &RequestContext,
        req: &PaletteColorUpdateRequest,
    ) -> Result<PaletteColorRecord, PaletteError> {
        let caller = require_caller(ctx)?;
        req.validate()?;
        resolve_owned_palette(store, &req.palette_id, &caller)?;

        if store
            .palette_color_row(&req.color_id, &req.palette_id)
            .is_none()
        {
            warn!(
                palette_id = req.palette_id.as_str(),
                color_id = req.color_id.as_str(),
                "palette color update refused: no such color under palette"
            );
            return Err(color_not_found(
                req.color_id.as_str(),
                req.palette_id.as_str(),
            ));
        }

        let rec = store.update_palette_color_row(&req.color_id, &req.palette_id, &req.fields)?;
        info!(
            palette_id = rec.palette_id.as_str(),
            color_id = rec.id.as_str(),
            reason_code = reason_codes::PALETTE_COLOR_OK_UPDATE.0,
            "palette color updated"
        );
        Ok(rec)
    }

    /// Deletes by (id, paletteId). Missing rows are detected from the affected-row count.
    pub fn delete_palette_color<R: PaletteTablesRepo>(
        &self,
        store: &mut R,
        ctx: &RequestContext,
        req: &PaletteColorDeleteRequest,
    ) -> Result<(), PaletteError> {
        let caller = require_caller(ctx)?;
        req.validate()?;
        resolve_owned_palette(store, &req.palette_id, &caller)?;

        let affected = store.delete_palette_color_row(&req.color_id, &req.palette_id)?;
        if affected == 0 {
            warn!(
                palette_id = req.palette_id.as_str(),
                color_id = req.color_id.as_str(),
                "palette color delete affected no rows"
            );
            return Err(color_not_found(
                req.color_id.as_str(),
                req.palette_id.as_str(),
            ));
        }
        info!(
            palette_id = req.palette_id.as_str(),
            color_id = req.color_id.as_str(),
            reason_code = reason_codes::PALETTE_COLOR_OK_DELETE.0,
            "palette color deleted"
        );
        Ok(())
    }

    pub fn list_palette_colors<R: PaletteTablesRepo>(
        &self,
        store: &R,
        ctx: &RequestContext,
        req: &PaletteColorListRequest,
    ) -> Result<PaletteColorListResult, PaletteError> {
        let caller = require_caller(ctx)?;
        req.validate()?;
        resolve_owned_palette(store, &req.palette_id, &caller)?;

        let items = store.palette_color_rows_for_palette(&req.palette_id)?;
        debug!(
            palette_id = req.palette_id.as_str(),
            total = items.len(),
            reason_code = reason_codes::PALETTE_COLOR_OK_LIST.0,
            "palette colors listed"
        );
        Ok(PaletteColorListResult::from_items(items))
    }
}
