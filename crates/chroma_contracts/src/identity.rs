#![forbid(unsafe_code)]

use crate::{ContractViolation, Validate};

/// Authenticated caller identity, as handed over by the external auth layer.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Result<Self, ContractViolation> {
        let v = Self(id.into());
        v.validate()?;
        Ok(v)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Validate for UserId {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.0.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "user_id",
                reason: "must not be empty",
            });
        }
        if self.0.len() > 128 {
            return Err(ContractViolation::InvalidValue {
                field: "user_id",
                reason: "must be <= 128 chars",
            });
        }
        Ok(())
    }
}

impl TryFrom<String> for UserId {
    type Error = ContractViolation;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        UserId::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// Per-request context resolved once at the transport boundary.
///
/// `caller` is `None` when the auth layer produced no identity; the core's
/// identity gate turns that into `UNAUTHORIZED`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub caller: Option<UserId>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self { caller: None }
    }

    pub fn for_user(user_id: UserId) -> Self {
        Self {
            caller: Some(user_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_rejects_blank_and_oversized_values() {
        assert!(UserId::new("   ").is_err());
        assert!(UserId::new("u".repeat(129)).is_err());
        assert_eq!(UserId::new("user_a").unwrap().as_str(), "user_a");
    }

    #[test]
    fn user_id_deserialize_runs_validation() {
        let ok: UserId = serde_json::from_str("\"user_a\"").unwrap();
        assert_eq!(ok.as_str(), "user_a");
        assert!(serde_json::from_str::<UserId>("\"\"").is_err());
    }
}
