#![forbid(unsafe_code)]

use chroma_contracts::identity::RequestContext;
use chroma_contracts::palette::{PaletteRequest, PaletteResponse, PaletteRpcRequest};
use chroma_contracts::Validate;
use chroma_storage::repo::PaletteTablesRepo;

use crate::access::require_caller;
use crate::PaletteError;

pub mod reason_codes {
    use chroma_contracts::ReasonCodeId;

    pub const PALETTE_OK_CREATE: ReasonCodeId = ReasonCodeId(0xC010_0001);
    pub const PALETTE_OK_UPDATE: ReasonCodeId = ReasonCodeId(0xC010_0002);
    pub const PALETTE_OK_LIST: ReasonCodeId = ReasonCodeId(0xC010_0003);
    pub const PALETTE_COLOR_OK_CREATE: ReasonCodeId = ReasonCodeId(0xC010_0011);
    pub const PALETTE_COLOR_OK_UPDATE: ReasonCodeId = ReasonCodeId(0xC010_0012);
    pub const PALETTE_COLOR_OK_DELETE: ReasonCodeId = ReasonCodeId(0xC010_0013);
    pub const PALETTE_COLOR_OK_LIST: ReasonCodeId = ReasonCodeId(0xC010_0014);
}

/// Stateless executor for palette and palette-color operations.
///
/// Every operation runs identity gate, then request-shape validation, then
/// (for anything scoped to an existing palette) the ownership resolver, and only
/// then touches rows. The store is passed in per call.
///
/// `run` is the boundary gate: it checks the caller and the whole envelope
/// before dispatch. The per-operation methods repeat both checks so they hold
/// when called directly.
#[derive(Debug, Default, Clone)]
pub struct PaletteRuntime;

impl PaletteRuntime {
    pub fn run<R: PaletteTablesRepo>(
        &self,
        store: &mut R,
        ctx: &RequestContext,
        req: &PaletteRpcRequest,
    ) -> Result<PaletteResponse, PaletteError> {
        require_caller(ctx)?;
        req.validate()?;

        match &req.request {
            PaletteRequest::CreatePalette(r) => self
                .create_palette(store, ctx, req.now, r)
                .map(PaletteResponse::Palette),
            PaletteRequest::UpdatePalette(r) => self
                .update_palette(store, ctx, req.now, r)
                .map(PaletteResponse::Palette),
            PaletteRequest::ListPalettes(r) => self
                .list_palettes(store, ctx, r)
                .map(PaletteResponse::PaletteList),
            PaletteRequest::CreatePaletteColor(r) => self
                .create_palette_color(store, ctx, req.now, r)
                .map(PaletteResponse::Color),
            PaletteRequest::UpdatePaletteColor(r) => self
                .update_palette_color(store, ctx, r)
                .map(PaletteResponse::Color),
            PaletteRequest::DeletePaletteColor(r) => self
                .delete_palette_color(store, ctx, r)
                .map(|()| PaletteResponse::ColorDeleted),
            PaletteRequest::ListPaletteColors(r) => self
                .list_palette_colors(store, ctx, r)
                .map(PaletteResponse::ColorList),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chroma_contracts::identity::UserId;
    use chroma_contracts::palette::{
        PaletteColorCreateRequest, PaletteColorDeleteRequest, PaletteColorListRequest,
        PaletteCreateRequest, PaletteListRequest, PalettePatch, PaletteRecord,
        PaletteUpdateRequest,
    };
    use chroma_contracts::{MonotonicTimeNs, SchemaVersion};
    use chroma_storage::store::PaletteStore;

    fn ctx(id: &str) -> RequestContext {
        RequestContext::for_user(UserId::new(id).unwrap())
    }

    fn call(
        store: &mut PaletteStore,
        ctx: &RequestContext,
        now: u64,
        request: PaletteRequest,
    ) -> Result<PaletteResponse, PaletteError> {
        PaletteRuntime.run(
            store,
            ctx,
            &PaletteRpcRequest::v1(MonotonicTimeNs(now), request),
        )
    }

    fn expect_palette(out: Result<PaletteResponse, PaletteError>) -> PaletteRecord {
        match out {
            Ok(PaletteResponse::Palette(p)) => p,
            other => panic!("expected palette, got {other:?}"),
        }
    }

    #[test]
    fn sunset_palette_scenario() {
        let mut store = PaletteStore::new_in_memory();
        let a = ctx("user_a");
        let b = ctx("user_b");

        let created = expect_palette(call(
            &mut store,
            &a,
            100,
            PaletteRequest::CreatePalette(PaletteCreateRequest {
                name: "Sunset".to_string(),
                ..Default::default()
            }),
        ));
        assert_eq!(created.user_id.as_str(), "user_a");
        assert!(!created.is_favorite);
        assert!(!created.is_system);

        let favorite = PaletteRequest::UpdatePalette(PaletteUpdateRequest {
            palette_id: created.id.clone(),
            fields: PalettePatch {
                is_favorite: Some(true),
                ..Default::default()
            },
        });
        assert!(matches!(
            call(&mut store, &b, 110, favorite.clone()),
            Err(PaletteError::Forbidden { .. })
        ));

        let updated = expect_palette(call(&mut store, &a, 120, favorite));
        assert!(updated.is_favorite);
        assert_eq!(updated.name, "Sunset");
        assert!(updated.updated_at > created.updated_at);
    }

    #[test]
    fn mismatched_parent_delete_scenario() {
        let mut store = PaletteStore::new_in_memory();
        let a = ctx("user_a");

        let sunset = expect_palette(call(
            &mut store,
            &a,
            1,
            PaletteRequest::CreatePalette(PaletteCreateRequest {
                name: "Sunset".to_string(),
                ..Default::default()
            }),
        ));
        let other = expect_palette(call(
            &mut store,
            &a,
            2,
            PaletteRequest::CreatePalette(PaletteCreateRequest {
                name: "Ocean".to_string(),
                ..Default::default()
            }),
        ));

        let color = match call(
            &mut store,
            &a,
            3,
            PaletteRequest::CreatePaletteColor(PaletteColorCreateRequest {
                palette_id: sunset.id.clone(),
                hex_value: "#FF5733".to_string(),
                order_index: None,
                role: None,
                label: None,
                contrast_on_light: None,
                contrast_on_dark: None,
            }),
        ) {
            Ok(PaletteResponse::Color(c)) => c,
            other => panic!("expected color, got {other:?}"),
        };

        let list = PaletteRequest::ListPaletteColors(PaletteColorListRequest {
            palette_id: sunset.id.clone(),
        });
        match call(&mut store, &a, 4, list.clone()) {
            Ok(PaletteResponse::ColorList(l)) => {
                assert_eq!(l.total, 1);
                assert_eq!(l.items[0].hex_value, "#FF5733");
            }
            other => panic!("expected color list, got {other:?}"),
        }

        let out = call(
            &mut store,
            &a,
            5,
            PaletteRequest::DeletePaletteColor(PaletteColorDeleteRequest {
                color_id: color.id.clone(),
                palette_id: other.id,
            }),
        );
        assert!(matches!(out, Err(PaletteError::NotFound { .. })));

        match call(&mut store, &a, 6, list) {
            Ok(PaletteResponse::ColorList(l)) => assert_eq!(l.items[0].id, color.id),
            other => panic!("expected color list, got {other:?}"),
        }
    }

    #[test]
    fn favorites_only_listing_scenario() {
        let mut store = PaletteStore::new_in_memory();
        let a = ctx("user_a");

        for (name, fav) in [("Plain", None), ("Loved", Some(true))] {
            call(
                &mut store,
                &a,
                1,
                PaletteRequest::CreatePalette(PaletteCreateRequest {
                    name: name.to_string(),
                    is_favorite: fav,
                    ..Default::default()
                }),
            )
            .unwrap();
        }

        match call(
            &mut store,
            &a,
            2,
            PaletteRequest::ListPalettes(PaletteListRequest {
                favorites_only: true,
            }),
        ) {
            Ok(PaletteResponse::PaletteList(l)) => {
                assert_eq!(l.total, 1);
                assert_eq!(l.items[0].name, "Loved");
            }
            other => panic!("expected palette list, got {other:?}"),
        }
    }

    #[test]
    fn anonymous_caller_is_refused_before_anything_else() {
        let mut store = PaletteStore::new_in_memory();
        // an empty patch would be a validation error, but identity is checked first
        let out = call(
            &mut store,
            &RequestContext::anonymous(),
            1,
            PaletteRequest::UpdatePalette(PaletteUpdateRequest {
                palette_id: chroma_contracts::palette::PaletteId::new("pal_x").unwrap(),
                fields: PalettePatch::default(),
            }),
        );
        assert_eq!(out, Err(PaletteError::Unauthorized));
    }

    #[test]
    fn unknown_schema_version_is_rejected() {
        let mut store = PaletteStore::new_in_memory();
        let mut req = PaletteRpcRequest::v1(
            MonotonicTimeNs(1),
            PaletteRequest::ListPalettes(PaletteListRequest::default()),
        );
        req.schema_version = SchemaVersion(99);
        assert!(matches!(
            PaletteRuntime.run(&mut store, &ctx("user_a"), &req),
            Err(PaletteError::Validation(_))
        ));
    }

    #[test]
    fn envelope_is_validated_before_any_row_is_read() {
        let mut store = PaletteStore::new_in_memory();
        let out = call(
            &mut store,
            &ctx("user_a"),
            1,
            PaletteRequest::UpdatePalette(PaletteUpdateRequest {
                palette_id: chroma_contracts::palette::PaletteId::new("pal_missing").unwrap(),
                fields: PalettePatch::default(),
            }),
        );
        assert!(matches!(out, Err(PaletteError::Validation(_))));
    }

    #[test]
    fn unknown_long_palette_id_is_not_found() {
        let mut store = PaletteStore::new_in_memory();
        let long_id = format!("pal_{}", "9".repeat(120));
        let out = call(
            &mut store,
            &ctx("user_a"),
            1,
            PaletteRequest::ListPaletteColors(PaletteColorListRequest {
                palette_id: chroma_contracts::palette::PaletteId::new(long_id).unwrap(),
            }),
        );
        assert!(matches!(
            out,
            Err(PaletteError::NotFound {
                entity: "palette",
                ..
            })
        ));
    }
}
