#![forbid(unsafe_code)]

use chroma_contracts::identity::UserId;
use chroma_contracts::palette::{
    PaletteColorCreateRequest, PaletteColorPatch, PaletteCreateRequest, PaletteId, PalettePatch,
};
use chroma_contracts::MonotonicTimeNs;
use chroma_storage::repo::PaletteTablesRepo;
use chroma_storage::store::{PaletteStore, StorageError};

fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

fn palette(name: &str) -> PaletteCreateRequest {
    PaletteCreateRequest {
        name: name.to_string(),
        ..Default::default()
    }
}

fn color(palette_id: &PaletteId, hex: &str, order_index: i32) -> PaletteColorCreateRequest {
    PaletteColorCreateRequest {
        palette_id: palette_id.clone(),
        hex_value: hex.to_string(),
        order_index: Some(order_index),
        role: Some("primary".to_string()),
        label: None,
        contrast_on_light: Some(3.1),
        contrast_on_dark: None,
    }
}

#[test]
fn at_palette_db_01_palette_color_requires_existing_palette() {
    let mut s = PaletteStore::new_in_memory();

    let missing = PaletteId::new("pal_missing").unwrap();
    let out = s.insert_palette_color_row(MonotonicTimeNs(10), &color(&missing, "#000000", 0));
    assert!(matches!(
        out,
        Err(StorageError::ForeignKeyViolation {
            table: "PaletteColors.paletteId",
            ..
        })
    ));
    assert!(s.palette_colors().is_empty());
}

#[test]
fn at_palette_db_02_user_insert_never_sets_system_flag() {
    let mut s = PaletteStore::new_in_memory();

    let rec = s
        .insert_palette_row(
            MonotonicTimeNs(100),
            user("user_a"),
            &PaletteCreateRequest {
                name: "Sunset".to_string(),
                description: Some("warm".to_string()),
                source_type: Some("image".to_string()),
                source_reference: Some("photo-42".to_string()),
                is_favorite: Some(true),
            },
        )
        .unwrap();

    assert!(!rec.is_system);
    assert!(rec.is_favorite);
    assert_eq!(rec.created_at, rec.updated_at);
    assert_eq!(s.palette_row(&rec.id), Some(&rec));
}

#[test]
fn at_palette_db_03_visibility_is_owner_or_system() {
    let mut s = PaletteStore::new_in_memory();

    let a = s
        .insert_palette_row(MonotonicTimeNs(1), user("user_a"), &palette("A"))
        .unwrap();
    let b = s
        .insert_palette_row(MonotonicTimeNs(1), user("user_b"), &palette("B"))
        .unwrap();
    let shared = s
        .seed_system_palette(MonotonicTimeNs(1), user("system"), &palette("Material"))
        .unwrap();
    assert!(shared.is_system);

    let visible: Vec<PaletteId> = s
        .palette_rows_visible_to(&user("user_a"), false)
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert!(visible.contains(&a.id));
    assert!(visible.contains(&shared.id));
    assert!(!visible.contains(&b.id));
    assert_eq!(visible.len(), 2);
}

#[test]
fn at_palette_db_04_favorites_filter_applies_on_top_of_visibility() {
    let mut s = PaletteStore::new_in_memory();

    let fav = s
        .insert_palette_row(
            MonotonicTimeNs(1),
            user("user_a"),
            &PaletteCreateRequest {
                name: "Fav".to_string(),
                is_favorite: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
    s.insert_palette_row(MonotonicTimeNs(1), user("user_a"), &palette("Plain"))
        .unwrap();
    s.seed_system_palette(MonotonicTimeNs(1), user("system"), &palette("Shared"))
        .unwrap();

    let favorites = s.palette_rows_visible_to(&user("user_a"), true).unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].id, fav.id);
}

#[test]
fn at_palette_db_05_palette_update_refreshes_updated_at_only() {
    let mut s = PaletteStore::new_in_memory();

    let rec = s
        .insert_palette_row(MonotonicTimeNs(10), user("user_a"), &palette("Sunset"))
        .unwrap();
    let updated = s
        .update_palette_row(
            MonotonicTimeNs(20),
            &rec.id,
            &PalettePatch {
                is_favorite: Some(true),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(updated.name, "Sunset");
    assert!(updated.is_favorite);
    assert_eq!(updated.created_at, MonotonicTimeNs(10));
    assert_eq!(updated.updated_at, MonotonicTimeNs(20));

    let missing = s.update_palette_row(
        MonotonicTimeNs(21),
        &PaletteId::new("pal_missing").unwrap(),
        &PalettePatch {
            name: Some("x".to_string()),
            ..Default::default()
        },
    );
    assert!(matches!(
        missing,
        Err(StorageError::RowNotFound {
            table: "ColorPalettes",
            ..
        })
    ));
}

#[test]
fn at_palette_db_06_color_rows_are_keyed_by_id_and_palette() {
    let mut s = PaletteStore::new_in_memory();

    let a = s
        .insert_palette_row(MonotonicTimeNs(1), user("user_a"), &palette("A"))
        .unwrap();
    let b = s
        .insert_palette_row(MonotonicTimeNs(1), user("user_a"), &palette("B"))
        .unwrap();
    let c = s
        .insert_palette_color_row(MonotonicTimeNs(2), &color(&a.id, "#FF5733", 0))
        .unwrap();

    assert!(s.palette_color_row(&c.id, &a.id).is_some());
    assert!(s.palette_color_row(&c.id, &b.id).is_none());

    let wrong_parent = s.update_palette_color_row(
        &c.id,
        &b.id,
        &PaletteColorPatch {
            label: Some("accent".to_string()),
            ..Default::default()
        },
    );
    assert!(matches!(wrong_parent, Err(StorageError::RowNotFound { .. })));
    assert_eq!(s.palette_color_row(&c.id, &a.id).unwrap().label, None);

    assert_eq!(s.delete_palette_color_row(&c.id, &b.id).unwrap(), 0);
    assert_eq!(s.palette_color_rows_for_palette(&a.id).unwrap().len(), 1);
    assert_eq!(s.delete_palette_color_row(&c.id, &a.id).unwrap(), 1);
    assert!(s.palette_color_rows_for_palette(&a.id).unwrap().is_empty());
}

#[test]
fn at_palette_db_07_color_update_keeps_created_at_and_absent_fields() {
    let mut s = PaletteStore::new_in_memory();

    let a = s
        .insert_palette_row(MonotonicTimeNs(1), user("user_a"), &palette("A"))
        .unwrap();
    let c = s
        .insert_palette_color_row(MonotonicTimeNs(2), &color(&a.id, "#FF5733", 3))
        .unwrap();

    let updated = s
        .update_palette_color_row(
            &c.id,
            &a.id,
            &PaletteColorPatch {
                hex_value: Some("#00FF00".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(updated.hex_value, "#00FF00");
    assert_eq!(updated.order_index, Some(3));
    assert_eq!(updated.role.as_deref(), Some("primary"));
    assert_eq!(updated.contrast_on_light, Some(3.1));
    assert_eq!(updated.created_at, MonotonicTimeNs(2));
}
