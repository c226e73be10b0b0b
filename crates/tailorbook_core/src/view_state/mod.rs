//! Per-screen view-state holders.
//!
//! # Responsibility
//! - Subscribe to repository read paths and publish immutable UI snapshots.
//! - Funnel user intent (edits, saves, deletes, searches) back through the
//!   repository.
//!
//! # Invariants
//! - Snapshots are published through `tokio::sync::watch`; an update
//!   replaces the whole snapshot.
//! - A holder's background subscription is aborted when the holder drops.
//! - Holders that spawn subscriptions must be created inside a Tokio runtime.
//! - A blank name never reaches the store; the save is skipped silently.

use crate::model::customer::CustomerId;
use crate::repo::customer_repo::CustomersRepository;
use log::{info, warn};
use std::future::Future;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub mod customer_ui_state;
pub mod details;
pub mod edit;
pub mod entry;
pub mod home;

pub use customer_ui_state::{CustomerUiState, MeasurementInputs};
pub use details::DetailsViewState;
pub use edit::EditViewState;
pub use entry::EntryViewState;
pub use home::{HomeUiState, HomeViewState, SearchUiState};

/// Owns a spawned subscription task and aborts it on drop.
#[derive(Debug)]
pub struct SubscriptionGuard {
    task: JoinHandle<()>,
}

impl SubscriptionGuard {
    pub(crate) fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            task: tokio::spawn(future),
        }
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Progress of a holder that loads one existing customer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Loading,
    Loaded,
    /// No row had the requested id when the holder was created. The holder
    /// keeps listening and moves to `Loaded` if the row appears.
    NotFound,
}

/// Snapshot published by the edit and details holders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerViewState {
    pub load: LoadState,
    pub customer: CustomerUiState,
}

/// Result of a save intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The record was written through the repository.
    Saved,
    /// The form was invalid or not loaded yet; nothing was written.
    Skipped,
}

/// Publishes `NotFound` if `id` is absent and nothing has loaded yet.
async fn flag_missing<R>(repo: &R, id: CustomerId, state: &watch::Sender<CustomerViewState>)
where
    R: CustomersRepository + ?Sized,
{
    match repo.customer(id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            let flagged = state.send_if_modified(|current| {
                if current.load == LoadState::Loading {
                    current.load = LoadState::NotFound;
                    true
                } else {
                    false
                }
            });
            if flagged {
                info!("event=customer_load module=view_state status=not_found customer_id={id}");
            }
        }
        Err(err) => {
            warn!("event=customer_load module=view_state status=error customer_id={id} error={err}");
        }
    }
}
