#![forbid(unsafe_code)]

//! JSON shapes accepted and produced by the HTTP transport.
//!
//! Inputs are camelCase. Unknown fields are ignored, which is how a client-sent
//! `isSystem` on create gets dropped on the floor.

use chroma_contracts::palette::{
    PaletteColorCreateRequest, PaletteColorDeleteRequest, PaletteColorId, PaletteColorListRequest,
    PaletteColorPatch, PaletteColorUpdateRequest, PaletteCreateRequest, PaletteId,
    PaletteListRequest, PalettePatch, PaletteRequest, PaletteResponse, PaletteUpdateRequest,
    OP_CREATE_PALETTE, OP_CREATE_PALETTE_COLOR, OP_DELETE_PALETTE_COLOR, OP_LIST_PALETTES,
    OP_LIST_PALETTE_COLORS, OP_UPDATE_PALETTE, OP_UPDATE_PALETTE_COLOR,
};
use chroma_contracts::ContractViolation;
use chroma_os::PaletteError;

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaletteInput {
    pub name: String,
    pub description: Option<String>,
    pub source_type: Option<String>,
    pub source_reference: Option<String>,
    pub is_favorite: Option<bool>,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaletteInput {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub source_type: Option<String>,
    pub source_reference: Option<String>,
    pub is_favorite: Option<bool>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPalettesInput {
    #[serde(default)]
    pub favorites_only: bool,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaletteColorInput {
    pub palette_id: String,
    pub hex_value: String,
    pub order_index: Option<i32>,
    pub role: Option<String>,
    pub label: Option<String>,
    pub contrast_on_light: Option<f64>,
    pub contrast_on_dark: Option<f64>,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaletteColorInput {
    pub id: String,
    pub palette_id: String,
    pub order_index: Option<i32>,
    pub hex_value: Option<String>,
    pub role: Option<String>,
    pub label: Option<String>,
    pub contrast_on_light: Option<f64>,
    pub contrast_on_dark: Option<f64>,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteColorKeyInput {
    pub id: String,
    pub palette_id: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPaletteColorsInput {
    pub palette_id: String,
}

fn parse<T: serde::de::DeserializeOwned>(body: &serde_json::Value) -> Result<T, PaletteError> {
    serde_json::from_value(body.clone()).map_err(|_| {
        PaletteError::Validation(ContractViolation::InvalidValue {
            field: "request_body",
            reason: "does not match the operation input shape",
        })
    })
}

/// Decodes `body` as the input of `operation` and lifts it into a contract request.
pub fn decode_request(
    operation: &str,
    body: &serde_json::Value,
) -> Result<PaletteRequest, PaletteError> {
    let request = match operation {
        OP_CREATE_PALETTE => {
            let i: CreatePaletteInput = parse(body)?;
            PaletteRequest::CreatePalette(PaletteCreateRequest {
                name: i.name,
                description: i.description,
                source_type: i.source_type,
                source_reference: i.source_reference,
                is_favorite: i.is_favorite,
            })
        }
        OP_UPDATE_PALETTE => {
            let i: UpdatePaletteInput = parse(body)?;
            PaletteRequest::UpdatePalette(PaletteUpdateRequest {
                palette_id: PaletteId::new(i.id)?,
                fields: PalettePatch {
                    name: i.name,
                    description: i.description,
                    source_type: i.source_type,
                    source_reference: i.source_reference,
                    is_favorite: i.is_favorite,
                },
            })
        }
        OP_LIST_PALETTES => {
            let i: ListPalettesInput = parse(body)?;
            PaletteRequest::ListPalettes(PaletteListRequest {
                favorites_only: i.favorites_only,
            })
        }
        OP_CREATE_PALETTE_COLOR => {
            let i: CreatePaletteColorInput = parse(body)?;
            PaletteRequest::CreatePaletteColor(PaletteColorCreateRequest {
                palette_id: PaletteId::new(i.palette_id)?,
                hex_value: i.hex_value,
                order_index: i.order_index,
                role: i.role,
                label: i.label,
                contrast_on_light: i.contrast_on_light,
                contrast_on_dark: i.contrast_on_dark,
            })
        }
        OP_UPDATE_PALETTE_COLOR => {
            let i: UpdatePaletteColorInput = parse(body)?;
            PaletteRequest::UpdatePaletteColor(PaletteColorUpdateRequest {
                color_id: PaletteColorId::new(i.id)?,
                palette_id: PaletteId::new(i.palette_id)?,
                fields: PaletteColorPatch {
                    order_index: i.order_index,
                    hex_value: i.hex_value,
                    role: i.role,
                    label: i.label,
                    contrast_on_light: i.contrast_on_light,
                    contrast_on_dark: i.contrast_on_dark,
                },
            })
        }
        OP_DELETE_PALETTE_COLOR => {
            let i: PaletteColorKeyInput = parse(body)?;
            PaletteRequest::DeletePaletteColor(PaletteColorDeleteRequest {
                color_id: PaletteColorId::new(i.id)?,
                palette_id: PaletteId::new(i.palette_id)?,
            })
        }
        OP_LIST_PALETTE_COLORS => {
            let i: ListPaletteColorsInput = parse(body)?;
            PaletteRequest::ListPaletteColors(PaletteColorListRequest {
                palette_id: PaletteId::new(i.palette_id)?,
            })
        }
        _ => {
            return Err(PaletteError::NotFound {
                entity: "operation",
                key: operation.to_string(),
            })
        }
    };
    Ok(request)
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RpcErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RpcEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorBody>,
}

impl RpcEnvelope {
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(e: &PaletteError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(RpcErrorBody {
                code: e.code().to_string(),
                message: e.to_string(),
            }),
        }
    }
}

pub fn encode_response(response: &PaletteResponse) -> Result<serde_json::Value, serde_json::Error> {
    match response {
        PaletteResponse::Palette(p) => Ok(serde_json::json!({ "palette": p })),
        PaletteResponse::PaletteList(l) => serde_json::to_value(l),
        PaletteResponse::Color(c) => Ok(serde_json::json!({ "color": c })),
        PaletteResponse::ColorList(l) => serde_json::to_value(l),
        PaletteResponse::ColorDeleted => Ok(serde_json::json!({ "success": true })),
    }
}
