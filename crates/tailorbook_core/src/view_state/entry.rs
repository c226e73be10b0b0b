//! Create-customer screen state.

use super::{CustomerUiState, SaveOutcome};
use crate::repo::customer_repo::CustomersRepository;
use crate::store::StoreResult;
use log::debug;
use std::sync::Arc;
use tokio::sync::watch;

pub struct EntryViewState<R: CustomersRepository + ?Sized> {
    repo: Arc<R>,
    ui_state: watch::Sender<CustomerUiState>,
}

impl<R: CustomersRepository + ?Sized> EntryViewState<R> {
    /// Starts with an empty form; saving is not allowed until a name is typed.
    pub fn new(repo: Arc<R>) -> Self {
        let (ui_state, _) = watch::channel(CustomerUiState::default());
        Self { repo, ui_state }
    }

    pub fn subscribe(&self) -> watch::Receiver<CustomerUiState> {
        self.ui_state.subscribe()
    }

    pub fn ui_state(&self) -> CustomerUiState {
        self.ui_state.borrow().clone()
    }

    /// Replaces the form and recomputes whether saving is allowed.
    pub fn update_ui_state(&self, new_state: CustomerUiState) {
        let action_enabled = new_state.is_valid();
        self.ui_state.send_replace(CustomerUiState {
            action_enabled,
            ..new_state
        });
    }

    /// Inserts the form as a new customer, or does nothing if it is invalid.
    pub async fn save_customer(&self) -> StoreResult<SaveOutcome> {
        let snapshot = self.ui_state();
        if !snapshot.is_valid() {
            debug!("event=customer_save module=view_state status=skipped reason=blank_name");
            return Ok(SaveOutcome::Skipped);
        }

        let id = self.repo.insert_customer(&snapshot.to_customer()).await?;
        debug!("event=customer_save module=view_state status=ok customer_id={id:?}");
        Ok(SaveOutcome::Saved)
    }
}
