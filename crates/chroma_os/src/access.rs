#![forbid(unsafe_code)]

use chroma_contracts::identity::{RequestContext, UserId};
use chroma_contracts::palette::{PaletteId, PaletteRecord};
use chroma_storage::repo::PaletteTablesRepo;
use tracing::{debug, warn};

use crate::PaletteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteAccess {
    Owner,
    SystemShared,
}

/// Identity gate. Fails closed when the transport produced no caller.
pub fn require_caller(ctx: &RequestContext) -> Result<UserId, PaletteError> {
    match &ctx.caller {
        Some(caller) => Ok(caller.clone()),
        None => {
            warn!("palette request refused: no caller identity");
            Err(PaletteError::Unauthorized)
        }
    }
}

/// Ownership wins over sharing when both hold. Read and write intent are not told apart.
pub fn palette_access(palette: &PaletteRecord, caller: &UserId) -> Option<PaletteAccess> {
    if palette.user_id == *caller {
        Some(PaletteAccess::Owner)
    } else if palette.is_system {
        Some(PaletteAccess::SystemShared)
    } else {
        None
    }
}

/// Ownership resolver: `NOT_FOUND` for a missing palette, `FORBIDDEN` when the
/// caller neither owns it nor can see it as a system palette.
pub fn resolve_owned_palette<R: PaletteTablesRepo>(
    store: &R,
    palette_id: &PaletteId,
    caller: &UserId,
) -> Result<PaletteRecord, PaletteError> {
    let Some(palette) = store.palette_row(palette_id) else {
        debug!(palette_id = palette_id.as_str(), "palette not found");
        return Err(PaletteError::NotFound {
            entity: "palette",
            key: palette_id.as_str().to_string(),
        });
    };
    match palette_access(palette, caller) {
        Some(access) => {
            debug!(
                palette_id = palette_id.as_str(),
                caller = caller.as_str(),
                ?access,
                "palette access granted"
            );
            Ok(palette.clone())
        }
        None => {
            warn!(
                palette_id = palette_id.as_str(),
                caller = caller.as_str(),
                "palette access refused"
            );
            Err(PaletteError::Forbidden {
                palette_id: palette_id.as_str().to_string(),
            })
        }
    }
}
