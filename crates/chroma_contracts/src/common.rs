#![forbid(unsafe_code)]

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaVersion(pub u32);

/// Unix-epoch nanoseconds. The caller supplies `now`; nothing in the core reads a clock.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct MonotonicTimeNs(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReasonCodeId(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub enum ContractViolation {
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
    NotFinite {
        field: &'static str,
    },
}

impl std::fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContractViolation::InvalidValue { field, reason } => write!(f, "{field}: {reason}"),
            ContractViolation::NotFinite { field } => write!(f, "{field}: must be finite"),
        }
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), ContractViolation>;
}

/// Opaque values (row ids, color values): any non-empty string is accepted as-is.
pub(crate) fn validate_non_empty(field: &'static str, s: &str) -> Result<(), ContractViolation> {
    if s.is_empty() {
        return Err(ContractViolation::InvalidValue {
            field,
            reason: "must not be empty",
        });
    }
    Ok(())
}

pub(crate) fn validate_text(
    field: &'static str,
    s: &str,
    max_len: usize,
) -> Result<(), ContractViolation> {
    validate_non_empty(field, s)?;
    if s.len() > max_len {
        return Err(ContractViolation::InvalidValue {
            field,
            reason: "too long",
        });
    }
    Ok(())
}

/// Free-text fields that may legitimately be empty but are still length-bounded.
pub(crate) fn validate_opt_text(
    field: &'static str,
    s: Option<&str>,
    max_len: usize,
) -> Result<(), ContractViolation> {
    match s {
        Some(s) if s.len() > max_len => Err(ContractViolation::InvalidValue {
            field,
            reason: "too long",
        }),
        _ => Ok(()),
    }
}

pub(crate) fn validate_opt_finite(
    field: &'static str,
    v: Option<f64>,
) -> Result<(), ContractViolation> {
    match v {
        Some(v) if !v.is_finite() => Err(ContractViolation::NotFinite { field }),
        _ => Ok(()),
    }
}
