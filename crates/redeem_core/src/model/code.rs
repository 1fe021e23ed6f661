//! Redemption code domain model.
//!
//! # Responsibility
//! - Define the canonical code record persisted in the registry slot.
//! - Provide the per-record claim/release transitions.
//!
//! # Invariants
//! - `id` is stable and never reassigned.
//! - `status == Claimed` iff `claimed_by` and `claimed_at` are both set.
//! - `description` is fixed at creation.

use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of one code record.
///
/// Stored as an opaque string so ids written by older builds (epoch-millis
/// strings) keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeId(String);

impl CodeId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for CodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Claim state of a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeStatus {
    /// Not yet handed out.
    Available,
    /// Handed out to a named claimant.
    Claimed,
}

impl CodeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Claimed => "claimed",
        }
    }
}

/// Validation failures for [`CodeRecord::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeValidationError {
    EmptyId,
    EmptyCode { id: CodeId },
    MissingClaimFields { id: CodeId },
    UnexpectedClaimFields { id: CodeId },
    EmptyOptionalField { id: CodeId, field: &'static str },
}

impl Display for CodeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "code id must not be empty"),
            Self::EmptyCode { id } => write!(f, "code `{id}` has empty code text"),
            Self::MissingClaimFields { id } => {
                write!(f, "code `{id}` is claimed but lacks claimedBy/claimedAt")
            }
            Self::UnexpectedClaimFields { id } => {
                write!(f, "code `{id}` is available but carries claim fields")
            }
            Self::EmptyOptionalField { id, field } => {
                write!(f, "code `{id}` has empty `{field}`; absent fields must be omitted")
            }
        }
    }
}

impl Error for CodeValidationError {}

/// One redemption code.
///
/// Wire names follow the slot schema: `claimedBy`, `claimedAt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeRecord {
    pub id: CodeId,
    pub code: String,
    pub status: CodeStatus,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub claimed_by: Option<String>,
    /// Locale-formatted local time, e.g. `2026/10/18 09:05:00`.
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub claimed_at: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

/// Reads `null`, a missing field and `""` alike as absent.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|text| !text.is_empty()))
}

impl CodeRecord {
    /// Creates an available code with a generated id.
    ///
    /// Callers are expected to pass already-normalized text; see
    /// `CodeRegistry::add` for trimming rules.
    pub fn new(code: impl Into<String>, description: Option<String>) -> Self {
        Self::with_id(CodeId::generate(), code, description)
    }

    /// Creates an available code with a caller-provided id.
    pub fn with_id(id: CodeId, code: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id,
            code: code.into(),
            status: CodeStatus::Available,
            claimed_by: None,
            claimed_at: None,
            description,
        }
    }

    /// Marks this code as claimed. Overwrites any earlier claim.
    pub fn claim(&mut self, claimant: impl Into<String>, claimed_at: impl Into<String>) {
        self.status = CodeStatus::Claimed;
        self.claimed_by = Some(claimant.into());
        self.claimed_at = Some(claimed_at.into());
    }

    /// Returns this code to the available pool.
    pub fn release(&mut self) {
        self.status = CodeStatus::Available;
        self.claimed_by = None;
        self.claimed_at = None;
    }

    pub fn is_available(&self) -> bool {
        self.status == CodeStatus::Available
    }

    pub fn is_claimed(&self) -> bool {
        self.status == CodeStatus::Claimed
    }

    /// Checks the per-record invariants.
    ///
    /// # Errors
    /// - Empty id or empty (after trim) code text.
    /// - Claim fields missing on a claimed code, or present on an available one.
    /// - Optional fields present but empty.
    pub fn validate(&self) -> Result<(), CodeValidationError> {
        if self.id.as_str().is_empty() {
            return Err(CodeValidationError::EmptyId);
        }
        if self.code.trim().is_empty() {
            return Err(CodeValidationError::EmptyCode {
                id: self.id.clone(),
            });
        }

        let has_claimant = self.claimed_by.is_some();
        let has_timestamp = self.claimed_at.is_some();
        match self.status {
            CodeStatus::Claimed if !(has_claimant && has_timestamp) => {
                return Err(CodeValidationError::MissingClaimFields {
                    id: self.id.clone(),
                });
            }
            CodeStatus::Available if has_claimant || has_timestamp => {
                return Err(CodeValidationError::UnexpectedClaimFields {
                    id: self.id.clone(),
                });
            }
            _ => {}
        }

        for (field, value) in [
            ("claimedBy", &self.claimed_by),
            ("claimedAt", &self.claimed_at),
            ("description", &self.description),
        ] {
            if value.as_deref().is_some_and(str::is_empty) {
                return Err(CodeValidationError::EmptyOptionalField {
                    id: self.id.clone(),
                    field,
                });
            }
        }

        Ok(())
    }
}
