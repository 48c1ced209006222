#![forbid(unsafe_code)]

use chroma_contracts::identity::RequestContext;
use chroma_contracts::palette::{
    PaletteCreateRequest, PaletteListRequest, PaletteListResult, PaletteRecord,
    PaletteUpdateRequest,
};
use chroma_contracts::{MonotonicTimeNs, Validate};
use chroma_storage::repo::PaletteTablesRepo;
use tracing::{debug, info};

use crate::access::{require_caller, resolve_owned_palette};
use crate::runtime::reason_codes;
use crate::{PaletteError, PaletteRuntime};

impl PaletteRuntime {
    pub fn create_palette<R: PaletteTablesRepo>(
        &self,
        store: &mut R,
        ctx: &RequestContext,
        now: MonotonicTimeNs,
        req: &PaletteCreateRequest,
    ) -> Result<PaletteRecord, PaletteError> {
        let caller = require_caller(ctx)?;
        req.validate()?;

        let rec = store.insert_palette_row(now, caller, req)?;
        info!(
            palette_id = rec.id.as_str(),
            owner = rec.user_id.as_str(),
            reason_code = reason_codes::PALETTE_OK_CREATE.0,
            "palette created"
        );
        Ok(rec)
    }

    /// Partial update. Absent fields keep their stored value; `updated_at` always moves to `now`.
    pub fn update_palette<R: PaletteTablesRepo>(
        &self,
        store: &mut R,
        ctx: &RequestContext,
        now: MonotonicTimeNs,
        req: &PaletteUpdateRequest,
    ) -> Result<PaletteRecord, PaletteError> {
        let caller = require_caller(ctx)?;
        req.validate()?;
        resolve_owned_palette(store, &req.palette_id, &caller)?;

        let rec = store.update_palette_row(now, &req.palette_id, &req.fields)?;
        info!(
            palette_id = rec.id.as_str(),
            reason_code = reason_codes::PALETTE_OK_UPDATE.0,
            "palette updated"
        );
        Ok(rec)
    }

    pub fn list_palettes<R: PaletteTablesRepo>(
        &self,
        store: &R,
        ctx: &RequestContext,
        req: &PaletteListRequest,
    ) -> Result<PaletteListResult, PaletteError> {
        let caller = require_caller(ctx)?;
        let items = store.palette_rows_visible_to(&caller, req.favorites_only)?;
        debug!(
            caller = caller.as_str(),
            favorites_only = req.favorites_only,
            total = items.len(),
            reason_code = reason_codes::PALETTE_OK_LIST.0,
            "palettes listed"
        );
        Ok(PaletteListResult::from_items(items))
    }
}
