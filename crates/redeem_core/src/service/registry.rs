//! Code registry use-case service.
//!
//! # Responsibility
//! - Own the ordered code collection for one interactive session.
//! - Apply add/claim/unclaim/remove and mirror every applied change to the
//!   persistent slot before returning.
//! - Hold the transient status filter and derived views (`visible`, `counts`).
//!
//! # Invariants
//! - Every record in memory satisfies `CodeRecord::validate()`.
//! - Insertion order is the only order; filtering never reorders.
//! - The filter never enters the persisted snapshot.
//! - Rejected and not-found outcomes touch neither memory nor storage.

use crate::model::code::{CodeId, CodeRecord, CodeStatus};
use crate::repo::slot_repo::SlotRepository;
use crate::repo::snapshot::{read_snapshot, write_snapshot};
use crate::repo::RepoError;
use crate::service::clock::{Clock, SystemClock};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Slot key used unless the caller picks another one.
pub const DEFAULT_SLOT_KEY: &str = "redemption-codes";

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Failure to mirror an applied mutation into storage.
///
/// The in-memory change has already happened when this is returned.
#[derive(Debug)]
pub enum RegistryError {
    Persist(RepoError),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persist(err) => write!(f, "failed to persist code snapshot: {err}"),
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persist(err) => Some(err),
        }
    }
}

impl From<RepoError> for RegistryError {
    fn from(value: RepoError) -> Self {
        Self::Persist(value)
    }
}

/// Why a mutation was declined without touching state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Code text was empty after trimming.
    EmptyCode,
    /// Claimant name was the empty string.
    EmptyClaimant,
    /// The user dismissed the name prompt or declined the delete confirmation.
    Cancelled,
}

impl Rejection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmptyCode => "empty_code",
            Self::EmptyClaimant => "empty_claimant",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Result of a mutating registry call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome<T = ()> {
    /// State changed and the snapshot was written.
    Applied(T),
    /// No record carries this id.
    NotFound(CodeId),
    /// Input was declined.
    Rejected(Rejection),
}

impl<T> MutationOutcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// Returns the applied payload, `None` for no-op outcomes.
    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::NotFound(_) | Self::Rejected(_) => None,
        }
    }
}

/// Transient status filter for `visible()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeFilter {
    #[default]
    All,
    Available,
    Claimed,
}

impl CodeFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Available => "available",
            Self::Claimed => "claimed",
        }
    }

    pub fn matches(self, record: &CodeRecord) -> bool {
        match self {
            Self::All => true,
            Self::Available => record.status == CodeStatus::Available,
            Self::Claimed => record.status == CodeStatus::Claimed,
        }
    }
}

impl Display for CodeFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown filter name passed to `CodeFilter::from_str`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFilterError(String);

impl Display for ParseFilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported filter `{}`; expected all|available|claimed",
            self.0
        )
    }
}

impl Error for ParseFilterError {}

impl FromStr for CodeFilter {
    type Err = ParseFilterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "available" => Ok(Self::Available),
            "claimed" => Ok(Self::Claimed),
            other => Err(ParseFilterError(other.to_string())),
        }
    }
}

/// Derived collection tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CodeCounts {
    pub total: usize,
    pub available: usize,
    pub claimed: usize,
}

/// Why the current view is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The collection has no codes at all.
    NoCodes,
    /// Codes exist but none match the active filter.
    NoMatches,
}

/// Session-owned registry of redemption codes.
///
/// Construct one instance at startup and hand out references; all writes go
/// through `&mut self`.
pub struct CodeRegistry<R: SlotRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
    slot_key: String,
    records: Vec<CodeRecord>,
    filter: CodeFilter,
}

impl<R: SlotRepository> CodeRegistry<R, SystemClock> {
    /// Hydrates a registry from the default slot.
    ///
    /// Never fails: missing, unreadable or invalid snapshots start empty.
    pub fn load(repo: R) -> Self {
        Self::load_with_key(repo, DEFAULT_SLOT_KEY)
    }

    /// Hydrates a registry from a caller-chosen slot key.
    pub fn load_with_key(repo: R, slot_key: impl Into<String>) -> Self {
        CodeRegistry::load_with(repo, slot_key, SystemClock)
    }
}

impl<R: SlotRepository, C: Clock> CodeRegistry<R, C> {
    /// Hydrates a registry with an explicit slot key and timestamp source.
    pub fn load_with(repo: R, slot_key: impl Into<String>, clock: C) -> Self {
        let slot_key = slot_key.into();
        let records = match read_snapshot(&repo, &slot_key) {
            Ok(Some(records)) => {
                info!(
                    "event=registry_load module=registry status=ok total={}",
                    records.len()
                );
                records
            }
            Ok(None) => {
                info!("event=registry_load module=registry status=ok total=0 slot=empty");
                Vec::new()
            }
            Err(err) => {
                warn!(
                    "event=registry_load module=registry status=error error_code=snapshot_discarded error={err}"
                );
                Vec::new()
            }
        };

        Self {
            repo,
            clock,
            slot_key,
            records,
            filter: CodeFilter::default(),
        }
    }

    /// Appends a new available code.
    ///
    /// # Contract
    /// - `code` is trimmed; blank input is `Rejected(EmptyCode)`.
    /// - `description` is trimmed and kept only when non-empty.
    /// - Returns the new id on success.
    pub fn add(
        &mut self,
        code: &str,
        description: Option<&str>,
    ) -> RegistryResult<MutationOutcome<CodeId>> {
        let code = code.trim();
        if code.is_empty() {
            return Ok(self.rejected("code_add", Rejection::EmptyCode));
        }
        let description = description
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        let record = CodeRecord::new(code, description);
        let id = record.id.clone();
        self.records.push(record);
        self.persist("code_add", &id)?;
        Ok(MutationOutcome::Applied(id))
    }

    /// Claims a code for `claimant`.
    ///
    /// # Contract
    /// - `None` means the name prompt was dismissed: `Rejected(Cancelled)`.
    /// - `Some("")` is `Rejected(EmptyClaimant)`; any other name is stored
    ///   exactly as given, surrounding whitespace included.
    /// - Claiming an already-claimed code overwrites claimant and timestamp.
    pub fn claim(
        &mut self,
        id: &CodeId,
        claimant: Option<&str>,
    ) -> RegistryResult<MutationOutcome> {
        let Some(claimant) = claimant else {
            return Ok(self.rejected("code_claim", Rejection::Cancelled));
        };
        if claimant.is_empty() {
            return Ok(self.rejected("code_claim", Rejection::EmptyClaimant));
        }

        let Some(index) = self.position(id) else {
            return Ok(self.not_found("code_claim", id));
        };
        let claimed_at = self.clock.now_label();
        self.records[index].claim(claimant, claimed_at);
        self.persist("code_claim", id)?;
        Ok(MutationOutcome::Applied(()))
    }

    /// Releases a claimed code back to available. Idempotent.
    pub fn unclaim(&mut self, id: &CodeId) -> RegistryResult<MutationOutcome> {
        let Some(index) = self.position(id) else {
            return Ok(self.not_found("code_unclaim", id));
        };
        self.records[index].release();
        self.persist("code_unclaim", id)?;
        Ok(MutationOutcome::Applied(()))
    }

    /// Permanently deletes a code once the caller has confirmed.
    pub fn remove(&mut self, id: &CodeId, confirmed: bool) -> RegistryResult<MutationOutcome> {
        if !confirmed {
            return Ok(self.rejected("code_remove", Rejection::Cancelled));
        }
        let Some(index) = self.position(id) else {
            return Ok(self.not_found("code_remove", id));
        };
        self.records.remove(index);
        self.persist("code_remove", id)?;
        Ok(MutationOutcome::Applied(()))
    }

    /// Switches the view filter. Not persisted.
    pub fn set_filter(&mut self, filter: CodeFilter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> CodeFilter {
        self.filter
    }

    /// Records matching the current filter, in insertion order.
    pub fn visible(&self) -> impl Iterator<Item = &CodeRecord> + '_ {
        let filter = self.filter;
        self.records
            .iter()
            .filter(move |record| filter.matches(record))
    }

    pub fn counts(&self) -> CodeCounts {
        self.records
            .iter()
            .fold(CodeCounts::default(), |mut counts, record| {
                counts.total += 1;
                match record.status {
                    CodeStatus::Available => counts.available += 1,
                    CodeStatus::Claimed => counts.claimed += 1,
                }
                counts
            })
    }

    /// Explains an empty `visible()` view; `None` when something is visible.
    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.records.is_empty() {
            Some(EmptyState::NoCodes)
        } else if self.visible().next().is_none() {
            Some(EmptyState::NoMatches)
        } else {
            None
        }
    }

    pub fn get(&self, id: &CodeId) -> Option<&CodeRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    /// Full collection in insertion order, ignoring the filter.
    pub fn records(&self) -> &[CodeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn slot_key(&self) -> &str {
        &self.slot_key
    }

    fn position(&self, id: &CodeId) -> Option<usize> {
        self.records.iter().position(|record| &record.id == id)
    }

    fn persist(&self, event: &'static str, id: &CodeId) -> RegistryResult<()> {
        match write_snapshot(&self.repo, &self.slot_key, &self.records) {
            Ok(()) => {
                info!(
                    "event={event} module=registry status=ok id={id} total={}",
                    self.records.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event={event} module=registry status=error id={id} error_code=persist_failed error={err}"
                );
                Err(err.into())
            }
        }
    }

    fn rejected<T>(&self, event: &'static str, reason: Rejection) -> MutationOutcome<T> {
        debug!(
            "event={event} module=registry status=skipped reason={}",
            reason.as_str()
        );
        MutationOutcome::Rejected(reason)
    }

    fn not_found<T>(&self, event: &'static str, id: &CodeId) -> MutationOutcome<T> {
        debug!("event={event} module=registry status=skipped reason=not_found id={id}");
        MutationOutcome::NotFound(id.clone())
    }
}
