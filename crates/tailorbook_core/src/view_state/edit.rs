//! Edit-customer screen state.
//!
//! The form is seeded once from the first value of the customer's live
//! stream and is then owned by the user; later store changes do not
//! overwrite it. Text typed before the seed arrives is kept; the seed only
//! fills the fields left blank. The holder always writes under the id it was
//! created for.

use super::{
    flag_missing, CustomerUiState, CustomerViewState, LoadState, SaveOutcome, SubscriptionGuard,
};
use crate::model::customer::{Customer, CustomerId};
use crate::repo::customer_repo::CustomersRepository;
use crate::store::StoreResult;
use futures::StreamExt;
use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::watch;

pub struct EditViewState<R: CustomersRepository + ?Sized + 'static> {
    repo: Arc<R>,
    customer_id: CustomerId,
    state: Arc<watch::Sender<CustomerViewState>>,
    _load: SubscriptionGuard,
}

impl<R: CustomersRepository + ?Sized + 'static> EditViewState<R> {
    pub fn new(repo: Arc<R>, customer_id: CustomerId) -> Self {
        let (state, _) = watch::channel(CustomerViewState::default());
        let state = Arc::new(state);
        let load = SubscriptionGuard::spawn(seed_form(
            Arc::clone(&repo),
            customer_id,
            Arc::clone(&state),
        ));

        Self {
            repo,
            customer_id,
            state,
            _load: load,
        }
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn subscribe(&self) -> watch::Receiver<CustomerViewState> {
        self.state.subscribe()
    }

    pub fn ui_state(&self) -> CustomerViewState {
        self.state.borrow().clone()
    }

    /// Replaces the form and recomputes whether saving is allowed.
    ///
    /// The load state is left as is, so edits made before the seed arrives
    /// are merged with it rather than replacing it.
    pub fn update_ui_state(&self, new_state: CustomerUiState) {
        let action_enabled = new_state.is_valid();
        let customer_id = self.customer_id;
        self.state.send_modify(|current| {
            current.customer = CustomerUiState {
                id: customer_id,
                action_enabled,
                ..new_state
            };
        });
    }

    /// Writes the form over the stored row.
    ///
    /// Does nothing while the form is invalid or has not been seeded yet.
    pub async fn update_customer(&self) -> StoreResult<SaveOutcome> {
        let snapshot = self.ui_state();
        if snapshot.load != LoadState::Loaded {
            debug!(
                "event=customer_update module=view_state status=skipped reason=not_loaded customer_id={}",
                self.customer_id
            );
            return Ok(SaveOutcome::Skipped);
        }
        if !snapshot.customer.is_valid() {
            debug!(
                "event=customer_update module=view_state status=skipped reason=blank_name customer_id={}",
                self.customer_id
            );
            return Ok(SaveOutcome::Skipped);
        }

        let customer = Customer {
            id: self.customer_id,
            ..snapshot.customer.to_customer()
        };
        let changed = self.repo.update_customer(&customer).await?;
        debug!(
            "event=customer_update module=view_state status=ok customer_id={} changed={changed}",
            self.customer_id
        );
        Ok(SaveOutcome::Saved)
    }
}

async fn seed_form<R>(repo: Arc<R>, id: CustomerId, state: Arc<watch::Sender<CustomerViewState>>)
where
    R: CustomersRepository + ?Sized,
{
    let mut stream = repo.customer_stream(id);
    flag_missing(repo.as_ref(), id, &state).await;

    while let Some(result) = stream.next().await {
        match result {
            Ok(customer) => {
                let seed = CustomerUiState::from_customer(&customer, true);
                state.send_if_modified(|current| {
                    if current.load == LoadState::Loaded {
                        return false;
                    }
                    current.customer.id = id;
                    current.customer.fill_blank_fields(&seed);
                    current.load = LoadState::Loaded;
                    true
                });
                return;
            }
            Err(err) => {
                warn!("event=customer_load module=view_state status=error customer_id={id} error={err}");
            }
        }
    }
}
