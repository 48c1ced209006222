#![forbid(unsafe_code)]

use crate::common::{validate_non_empty, validate_opt_finite, validate_opt_text, validate_text};
use crate::identity::UserId;
use crate::{ContractViolation, MonotonicTimeNs, SchemaVersion, Validate};

pub const CHROMA_PALETTE_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

pub const OP_CREATE_PALETTE: &str = "createPalette";
pub const OP_UPDATE_PALETTE: &str = "updatePalette";
pub const OP_LIST_PALETTES: &str = "listPalettes";
pub const OP_CREATE_PALETTE_COLOR: &str = "createPaletteColor";
pub const OP_UPDATE_PALETTE_COLOR: &str = "updatePaletteColor";
pub const OP_DELETE_PALETTE_COLOR: &str = "deletePaletteColor";
pub const OP_LIST_PALETTE_COLORS: &str = "listPaletteColors";

pub const PALETTE_NAME_MAX_LEN: usize = 128;
pub const PALETTE_DESCRIPTION_MAX_LEN: usize = 2048;
pub const PALETTE_SOURCE_TYPE_MAX_LEN: usize = 64;
pub const PALETTE_SOURCE_REFERENCE_MAX_LEN: usize = 512;
pub const COLOR_ROLE_MAX_LEN: usize = 64;
pub const COLOR_LABEL_MAX_LEN: usize = 128;

#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct PaletteId(String);

impl PaletteId {
    pub fn new(id: impl Into<String>) -> Result<Self, ContractViolation> {
        let v = Self(id.into());
        v.validate()?;
        Ok(v)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Validate for PaletteId {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_non_empty("palette_id", &self.0)
    }
}

impl TryFrom<String> for PaletteId {
    type Error = ContractViolation;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PaletteId::new(value)
    }
}

impl From<PaletteId> for String {
    fn from(value: PaletteId) -> Self {
        value.0
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct PaletteColorId(String);

impl PaletteColorId {
    pub fn new(id: impl Into<String>) -> Result<Self, ContractViolation> {
        let v = Self(id.into());
        v.validate()?;
        Ok(v)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Validate for PaletteColorId {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_non_empty("palette_color_id", &self.0)
    }
}

impl TryFrom<String> for PaletteColorId {
    type Error = ContractViolation;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PaletteColorId::new(value)
    }
}

impl From<PaletteColorId> for String {
    fn from(value: PaletteColorId) -> Self {
        value.0
    }
}

/// Row of the `ColorPalettes` table.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteRecord {
    #[serde(skip)]
    pub schema_version: SchemaVersion,
    pub id: PaletteId,
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub source_type: Option<String>,
    pub source_reference: Option<String>,
    pub is_favorite: bool,
    pub is_system: bool,
    pub created_at: MonotonicTimeNs,
    pub updated_at: MonotonicTimeNs,
}

impl PaletteRecord {
    /// Builds a user-created palette row. `is_system` is not an input here; user rows are never shared.
    pub fn v1_user(
        id: PaletteId,
        user_id: UserId,
        input: &PaletteCreateRequest,
        now: MonotonicTimeNs,
    ) -> Result<Self, ContractViolation> {
        let r = Self {
            schema_version: CHROMA_PALETTE_CONTRACT_VERSION,
            id,
            user_id,
            name: input.name.clone(),
            description: input.description.clone(),
            source_type: input.source_type.clone(),
            source_reference: input.source_reference.clone(),
            is_favorite: input.is_favorite.unwrap_or(false),
            is_system: false,
            created_at: now,
            updated_at: now,
        };
        r.validate()?;
        Ok(r)
    }

    /// Pre-seeded shared palette. Only seeding paths call this.
    pub fn v1_system(
        id: PaletteId,
        user_id: UserId,
        input: &PaletteCreateRequest,
        now: MonotonicTimeNs,
    ) -> Result<Self, ContractViolation> {
        let mut r = Self::v1_user(id, user_id, input, now)?;
        r.is_system = true;
        Ok(r)
    }
}

impl Validate for PaletteRecord {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != CHROMA_PALETTE_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "palette_record.schema_version",
                reason: "must match CHROMA_PALETTE_CONTRACT_VERSION",
            });
        }
        self.id.validate()?;
        self.user_id.validate()?;
        validate_text("palette_record.name", &self.name, PALETTE_NAME_MAX_LEN)?;
        validate_palette_free_text(
            [
                "palette_record.description",
                "palette_record.source_type",
                "palette_record.source_reference",
            ],
            self.description.as_deref(),
            self.source_type.as_deref(),
            self.source_reference.as_deref(),
        )?;
        if self.updated_at.0 < self.created_at.0 {
            return Err(ContractViolation::InvalidValue {
                field: "palette_record.updated_at",
                reason: "must be >= created_at",
            });
        }
        Ok(())
    }
}

/// Row of the `PaletteColors` table. Colors carry no update timestamp.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteColorRecord {
    #[serde(skip)]
    pub schema_version: SchemaVersion,
    pub id: PaletteColorId,
    pub palette_id: PaletteId,
    pub order_index: Option<i32>,
    pub hex_value: String,
    pub role: Option<String>,
    pub label: Option<String>,
    pub contrast_on_light: Option<f64>,
    pub contrast_on_dark: Option<f64>,
    pub created_at: MonotonicTimeNs,
}

impl PaletteColorRecord {
    pub fn v1(
        id: PaletteColorId,
        input: &PaletteColorCreateRequest,
        now: MonotonicTimeNs,
    ) -> Result<Self, ContractViolation> {
        let r = Self {
            schema_version: CHROMA_PALETTE_CONTRACT_VERSION,
            id,
            palette_id: input.palette_id.clone(),
            order_index: input.order_index,
            hex_value: input.hex_value.clone(),
            role: input.role.clone(),
            label: input.label.clone(),
            contrast_on_light: input.contrast_on_light,
            contrast_on_dark: input.contrast_on_dark,
            created_at: now,
        };
        r.validate()?;
        Ok(r)
    }
}

impl Validate for PaletteColorRecord {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != CHROMA_PALETTE_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "palette_color_record.schema_version",
                reason: "must match CHROMA_PALETTE_CONTRACT_VERSION",
            });
        }
        self.id.validate()?;
        self.palette_id.validate()?;
        validate_non_empty("palette_color_record.hex_value", &self.hex_value)?;
        validate_color_free_text(
            [
                "palette_color_record.role",
                "palette_color_record.label",
                "palette_color_record.contrast_on_light",
                "palette_color_record.contrast_on_dark",
            ],
            self.role.as_deref(),
            self.label.as_deref(),
            self.contrast_on_light,
            self.contrast_on_dark,
        )
    }
}

fn patch_value<T: Clone>(slot: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        *slot = v.clone();
    }
}

fn patch_optional<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
    if let Some(v) = value {
        *slot = Some(v.clone());
    }
}

/// Partial update for a palette. `None` means "leave unchanged", never "clear".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PalettePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub source_type: Option<String>,
    pub source_reference: Option<String>,
    pub is_favorite: Option<bool>,
}

impl PalettePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.source_type.is_none()
            && self.source_reference.is_none()
            && self.is_favorite.is_none()
    }

    /// Writes present fields onto `record`. Timestamps are the caller's business.
    pub fn apply_to(&self, record: &mut PaletteRecord) {
        patch_value(&mut record.name, &self.name);
        patch_optional(&mut record.description, &self.description);
        patch_optional(&mut record.source_type, &self.source_type);
        patch_optional(&mut record.source_reference, &self.source_reference);
        patch_value(&mut record.is_favorite, &self.is_favorite);
    }
}

impl Validate for PalettePatch {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "palette_patch",
                reason: "at least one field must be present",
            });
        }
        if let Some(name) = &self.name {
            validate_text("palette_patch.name", name, PALETTE_NAME_MAX_LEN)?;
        }
        validate_palette_free_text(
            [
                "palette_patch.description",
                "palette_patch.source_type",
                "palette_patch.source_reference",
            ],
            self.description.as_deref(),
            self.source_type.as_deref(),
            self.source_reference.as_deref(),
        )
    }
}

/// Partial update for a palette color.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaletteColorPatch {
    pub order_index: Option<i32>,
    pub hex_value: Option<String>,
    pub role: Option<String>,
    pub label: Option<String>,
    pub contrast_on_light: Option<f64>,
    pub contrast_on_dark: Option<f64>,
}

impl PaletteColorPatch {
    pub fn is_empty(&self) -> bool {
        self.order_index.is_none()
            && self.hex_value.is_none()
            && self.role.is_none()
            && self.label.is_none()
            && self.contrast_on_light.is_none()
            && self.contrast_on_dark.is_none()
    }

    pub fn apply_to(&self, record: &mut PaletteColorRecord) {
        patch_optional(&mut record.order_index, &self.order_index);
        patch_value(&mut record.hex_value, &self.hex_value);
        patch_optional(&mut record.role, &self.role);
        patch_optional(&mut record.label, &self.label);
        patch_optional(&mut record.contrast_on_light, &self.contrast_on_light);
        patch_optional(&mut record.contrast_on_dark, &self.contrast_on_dark);
    }
}

impl Validate for PaletteColorPatch {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "palette_color_patch",
                reason: "at least one field must be present",
            });
        }
        if let Some(hex_value) = &self.hex_value {
            validate_non_empty("palette_color_patch.hex_value", hex_value)?;
        }
        validate_color_free_text(
            [
                "palette_color_patch.role",
                "palette_color_patch.label",
                "palette_color_patch.contrast_on_light",
                "palette_color_patch.contrast_on_dark",
            ],
            self.role.as_deref(),
            self.label.as_deref(),
            self.contrast_on_light,
            self.contrast_on_dark,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaletteCreateRequest {
    pub name: String,
    pub description: Option<String>,
    pub source_type: Option<String>,
    pub source_reference: Option<String>,
    pub is_favorite: Option<bool>,
}

impl Validate for PaletteCreateRequest {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_text(
            "palette_create_request.name",
            &self.name,
            PALETTE_NAME_MAX_LEN,
        )?;
        validate_palette_free_text(
            [
                "palette_create_request.description",
                "palette_create_request.source_type",
                "palette_create_request.source_reference",
            ],
            self.description.as_deref(),
            self.source_type.as_deref(),
            self.source_reference.as_deref(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteUpdateRequest {
    pub palette_id: PaletteId,
    pub fields: PalettePatch,
}

impl Validate for PaletteUpdateRequest {
    fn validate(&self) -> Result<(), ContractViolation> {
        self.palette_id.validate()?;
        self.fields.validate()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaletteListRequest {
    pub favorites_only: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaletteColorCreateRequest {
    pub palette_id: PaletteId,
    pub hex_value: String,
    pub order_index: Option<i32>,
    pub role: Option<String>,
    pub label: Option<String>,
    pub contrast_on_light: Option<f64>,
    pub contrast_on_dark: Option<f64>,
}

impl Validate for PaletteColorCreateRequest {
    fn validate(&self) -> Result<(), ContractViolation> {
        self.palette_id.validate()?;
        validate_non_empty("palette_color_create_request.hex_value", &self.hex_value)?;
        validate_color_free_text(
            [
                "palette_color_create_request.role",
                "palette_color_create_request.label",
                "palette_color_create_request.contrast_on_light",
                "palette_color_create_request.contrast_on_dark",
            ],
            self.role.as_deref(),
            self.label.as_deref(),
            self.contrast_on_light,
            self.contrast_on_dark,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaletteColorUpdateRequest {
    pub color_id: PaletteColorId,
    pub palette_id: PaletteId,
    pub fields: PaletteColorPatch,
}

impl Validate for PaletteColorUpdateRequest {
    fn validate(&self) -> Result<(), ContractViolation> {
        self.color_id.validate()?;
        self.palette_id.validate()?;
        self.fields.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteColorDeleteRequest {
    pub color_id: PaletteColorId,
    pub palette_id: PaletteId,
}

impl Validate for PaletteColorDeleteRequest {
    fn validate(&self) -> Result<(), ContractViolation> {
        self.color_id.validate()?;
        self.palette_id.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteColorListRequest {
    pub palette_id: PaletteId,
}

impl Validate for PaletteColorListRequest {
    fn validate(&self) -> Result<(), ContractViolation> {
        self.palette_id.validate()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaletteRequest {
    CreatePalette(PaletteCreateRequest),
    UpdatePalette(PaletteUpdateRequest),
    ListPalettes(PaletteListRequest),
    CreatePaletteColor(PaletteColorCreateRequest),
    UpdatePaletteColor(PaletteColorUpdateRequest),
    DeletePaletteColor(PaletteColorDeleteRequest),
    ListPaletteColors(PaletteColorListRequest),
}

impl PaletteRequest {
    pub fn operation(&self) -> &'static str {
        match self {
            PaletteRequest::CreatePalette(_) => OP_CREATE_PALETTE,
            PaletteRequest::UpdatePalette(_) => OP_UPDATE_PALETTE,
            PaletteRequest::ListPalettes(_) => OP_LIST_PALETTES,
            PaletteRequest::CreatePaletteColor(_) => OP_CREATE_PALETTE_COLOR,
            PaletteRequest::UpdatePaletteColor(_) => OP_UPDATE_PALETTE_COLOR,
            PaletteRequest::DeletePaletteColor(_) => OP_DELETE_PALETTE_COLOR,
            PaletteRequest::ListPaletteColors(_) => OP_LIST_PALETTE_COLORS,
        }
    }

}

impl Validate for PaletteRequest {
    fn validate(&self) -> Result<(), ContractViolation> {
        match self {
            PaletteRequest::CreatePalette(r) => r.validate(),
            PaletteRequest::UpdatePalette(r) => r.validate(),
            PaletteRequest::ListPalettes(_) => Ok(()),
            PaletteRequest::CreatePaletteColor(r) => r.validate(),
            PaletteRequest::UpdatePaletteColor(r) => r.validate(),
            PaletteRequest::DeletePaletteColor(r) => r.validate(),
            PaletteRequest::ListPaletteColors(r) => r.validate(),
        }
    }
}

/// One remote call: the operation plus the request time stamped by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteRpcRequest {
    pub schema_version: SchemaVersion,
    pub now: MonotonicTimeNs,
    pub request: PaletteRequest,
}

impl PaletteRpcRequest {
    pub fn v1(now: MonotonicTimeNs, request: PaletteRequest) -> Self {
        Self {
            schema_version: CHROMA_PALETTE_CONTRACT_VERSION,
            now,
            request,
        }
    }
}

impl Validate for PaletteRpcRequest {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != CHROMA_PALETTE_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "palette_rpc_request.schema_version",
                reason: "must match CHROMA_PALETTE_CONTRACT_VERSION",
            });
        }
        self.request.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PaletteListResult {
    pub items: Vec<PaletteRecord>,
    pub total: usize,
}

impl PaletteListResult {
    pub fn from_items(items: Vec<PaletteRecord>) -> Self {
        let total = items.len();
        Self { items, total }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PaletteColorListResult {
    pub items: Vec<PaletteColorRecord>,
    pub total: usize,
}

impl PaletteColorListResult {
    pub fn from_items(items: Vec<PaletteColorRecord>) -> Self {
        let total = items.len();
        Self { items, total }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaletteResponse {
    Palette(PaletteRecord),
    PaletteList(PaletteListResult),
    Color(PaletteColorRecord),
    ColorList(PaletteColorListResult),
    ColorDeleted,
}

fn validate_palette_free_text(
    fields: [&'static str; 3],
    description: Option<&str>,
    source_type: Option<&str>,
    source_reference: Option<&str>,
) -> Result<(), ContractViolation> {
    validate_opt_text(fields[0], description, PALETTE_DESCRIPTION_MAX_LEN)?;
    validate_opt_text(fields[1], source_type, PALETTE_SOURCE_TYPE_MAX_LEN)?;
    validate_opt_text(fields[2], source_reference, PALETTE_SOURCE_REFERENCE_MAX_LEN)
}

fn validate_color_free_text(
    fields: [&'static str; 4],
    role: Option<&str>,
    label: Option<&str>,
    contrast_on_light: Option<f64>,
    contrast_on_dark: Option<f64>,
) -> Result<(), ContractViolation> {
    validate_opt_text(fields[0], role, COLOR_ROLE_MAX_LEN)?;
    validate_opt_text(fields[1], label, COLOR_LABEL_MAX_LEN)?;
    validate_opt_finite(fields[2], contrast_on_light)?;
    validate_opt_finite(fields[3], contrast_on_dark)
}
