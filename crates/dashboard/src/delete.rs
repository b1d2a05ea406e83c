//! Confirm-then-delete workflow with cascade onto the local snapshot.
//!
//! ```text
//! Idle --request--> Confirming --cancel--> Idle
//!                   Confirming --confirm--> Executing --(ok | err)--> Idle
//! ```
//!
//! Only one delete may be pending at a time. Clones of a [`DeleteWorkflow`]
//! share the same state, so a second request from anywhere is rejected with
//! [`WorkflowError::Busy`] until the first one settles.

use std::sync::Arc;

use ads_client::{AdsBackend, ClientError, ClientResult};
use ads_core::config::CascadeMode;
use ads_core::types::{Entity, EntityId, EntityKind, Removal};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{info, warn};

use crate::cache::{EntityCache, Mutation};

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub kind: EntityKind,
    pub id: EntityId,
    pub name: String,
}

impl DeleteRequest {
    pub fn new(kind: EntityKind, id: EntityId, name: impl Into<String>) -> Self {
        Self {
            kind,
            id,
            name: name.into(),
        }
    }

    pub fn for_entity(entity: &Entity) -> Self {
        Self::new(entity.kind(), entity.id(), entity.name())
    }

    /// The text shown before anything is deleted.
    pub fn confirmation_message(&self) -> String {
        let question = format!(
            "Are you sure you want to delete the {}: \"{}\"?",
            self.kind.label(),
            self.name
        );
        match self.kind {
            EntityKind::Campaign => format!(
                "⚠️ Warning: Deleting this campaign will also delete all associated ad sets and ads.\n\n{question}"
            ),
            EntityKind::AdSet => format!(
                "⚠️ Warning: Deleting this ad set will also delete all associated ads.\n\n{question}"
            ),
            EntityKind::AdCreative | EntityKind::Ad => question,
        }
    }
}

// ---------------------------------------------------------------------------
// State / outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeleteState {
    #[default]
    Idle,
    Confirming(DeleteRequest),
    Executing(DeleteRequest),
}

#[derive(Debug)]
pub enum DeleteOutcome {
    Cancelled,
    /// Everything removed from the local snapshot.
    Deleted(Removal),
    /// The backend refused; the snapshot is unchanged. Display is the alert text.
    Failed(ClientError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Another delete is already in progress")]
    Busy,

    #[error("No delete is awaiting confirmation")]
    NothingPending,
}

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DeleteWorkflow {
    mode: CascadeMode,
    state: Arc<Mutex<DeleteState>>,
}

/// Puts the workflow back to `Idle` when execution ends, however it ends.
struct Settle<'a>(&'a Mutex<DeleteState>);

impl Drop for Settle<'_> {
    fn drop(&mut self) {
        *self.0.lock() = DeleteState::Idle;
    }
}

impl DeleteWorkflow {
    pub fn new(mode: CascadeMode) -> Self {
        Self {
            mode,
            state: Arc::new(Mutex::new(DeleteState::Idle)),
        }
    }

    pub fn mode(&self) -> CascadeMode {
        self.mode
    }

    pub fn state(&self) -> DeleteState {
        self.state.lock().clone()
    }

    /// Start a delete. Returns the confirmation text to show.
    pub fn request(&self, request: DeleteRequest) -> Result<String, WorkflowError> {
        let mut state = self.state.lock();
        if *state != DeleteState::Idle {
            return Err(WorkflowError::Busy);
        }
        let message = request.confirmation_message();
        *state = DeleteState::Confirming(request);
        Ok(message)
    }

    pub fn cancel(&self) -> Result<DeleteOutcome, WorkflowError> {
        let mut state = self.state.lock();
        match &*state {
            DeleteState::Confirming(request) => {
                info!(kind = %request.kind, id = request.id, "Delete cancelled");
                *state = DeleteState::Idle;
                Ok(DeleteOutcome::Cancelled)
            }
            DeleteState::Idle => Err(WorkflowError::NothingPending),
            DeleteState::Executing(_) => Err(WorkflowError::Busy),
        }
    }

    /// Run the confirmed delete against the backend, then mirror it locally.
    ///
    /// The snapshot is only touched after the backend reports success.
    pub async fn confirm(
        &self,
        backend: &dyn AdsBackend,
        cache: &mut EntityCache,
    ) -> Result<DeleteOutcome, WorkflowError> {
        let request = {
            let mut state = self.state.lock();
            let request = match &*state {
                DeleteState::Confirming(request) => request.clone(),
                DeleteState::Idle => return Err(WorkflowError::NothingPending),
                DeleteState::Executing(_) => return Err(WorkflowError::Busy),
            };
            *state = DeleteState::Executing(request.clone());
            request
        };
        let _settle = Settle(&self.state);

        let result = match (self.mode, request.kind) {
            (CascadeMode::Client, EntityKind::AdCreative) => {
                self.delete_creative_and_ads(backend, cache, request.id).await
            }
            _ => backend.delete(request.kind, request.id).await.map(|r| r.removed),
        };

        match result {
            Ok(reported) => {
                let mut removed = cache.apply(Mutation::Delete {
                    kind: request.kind,
                    id: request.id,
                });
                let extra = cache.apply(Mutation::Purge(reported));
                for kind in EntityKind::ALL {
                    for id in extra.ids(kind) {
                        removed.push(kind, *id);
                    }
                }
                info!(kind = %request.kind, id = request.id, removed = %removed, "Delete succeeded");
                Ok(DeleteOutcome::Deleted(removed))
            }
            Err(e) => {
                warn!(kind = %request.kind, id = request.id, error = %e, "Delete failed");
                Ok(DeleteOutcome::Failed(e))
            }
        }
    }

    /// Request, ask, and either cancel or execute.
    pub async fn run(
        &self,
        backend: &dyn AdsBackend,
        cache: &mut EntityCache,
        request: DeleteRequest,
        confirmer: &mut dyn Confirm,
    ) -> Result<DeleteOutcome, WorkflowError> {
        let message = self.request(request)?;
        if confirmer.confirm(&message) {
            self.confirm(backend, cache).await
        } else {
            self.cancel()
        }
    }

    /// Delete every cached ad that uses the creative, one call each, then the
    /// creative itself. Ads already deleted stay deleted if a later call fails.
    async fn delete_creative_and_ads(
        &self,
        backend: &dyn AdsBackend,
        cache: &EntityCache,
        creative_id: EntityId,
    ) -> ClientResult<Removal> {
        let ad_ids = cache.ads_for_creative(creative_id);
        for ad_id in &ad_ids {
            backend.delete(EntityKind::Ad, *ad_id).await?;
        }
        let response = backend.delete(EntityKind::AdCreative, creative_id).await?;
        let mut removed = response.removed;
        for ad_id in ad_ids {
            removed.push(EntityKind::Ad, ad_id);
        }
        Ok(removed)
    }
}
