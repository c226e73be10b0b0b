//! Customer details screen state.
//!
//! Follows the customer's live stream for as long as the holder exists, so
//! edits made elsewhere show up immediately.

use super::{flag_missing, CustomerUiState, CustomerViewState, LoadState, SubscriptionGuard};
use crate::model::customer::CustomerId;
use crate::repo::customer_repo::CustomersRepository;
use crate::store::StoreResult;
use futures::StreamExt;
use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::watch;

pub struct DetailsViewState<R: CustomersRepository + ?Sized + 'static> {
    repo: Arc<R>,
    customer_id: CustomerId,
    state: watch::Receiver<CustomerViewState>,
    _subscription: SubscriptionGuard,
}

impl<R: CustomersRepository + ?Sized + 'static> DetailsViewState<R> {
    pub fn new(repo: Arc<R>, customer_id: CustomerId) -> Self {
        let (sender, state) = watch::channel(CustomerViewState::default());
        let subscription =
            SubscriptionGuard::spawn(follow_customer(Arc::clone(&repo), customer_id, sender));

        Self {
            repo,
            customer_id,
            state,
            _subscription: subscription,
        }
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn subscribe(&self) -> watch::Receiver<CustomerViewState> {
        self.state.clone()
    }

    pub fn ui_state(&self) -> CustomerViewState {
        self.state.borrow().clone()
    }

    /// Deletes the displayed customer.
    ///
    /// Returns `false` without touching the store while nothing is loaded.
    pub async fn delete_customer(&self) -> StoreResult<bool> {
        let snapshot = self.ui_state();
        if snapshot.load != LoadState::Loaded {
            debug!(
                "event=customer_delete module=view_state status=skipped reason=not_loaded customer_id={}",
                self.customer_id
            );
            return Ok(false);
        }

        let deleted = self
            .repo
            .delete_customer(&snapshot.customer.to_customer())
            .await?;
        debug!(
            "event=customer_delete module=view_state status=ok customer_id={} deleted={deleted}",
            self.customer_id
        );
        Ok(deleted)
    }
}

async fn follow_customer<R>(repo: Arc<R>, id: CustomerId, sender: watch::Sender<CustomerViewState>)
where
    R: CustomersRepository + ?Sized,
{
    let mut stream = repo.customer_stream(id);
    flag_missing(repo.as_ref(), id, &sender).await;

    while let Some(result) = stream.next().await {
        match result {
            Ok(customer) => {
                sender.send_replace(CustomerViewState {
                    load: LoadState::Loaded,
                    customer: CustomerUiState::from_customer(&customer, false),
                });
            }
            Err(err) => {
                warn!("event=customer_refresh module=view_state status=error customer_id={id} error={err}");
            }
        }
    }
}
