//! List and search screen state.
//!
//! The full list follows the store reactively. Search results do not: they
//! are a one-shot snapshot refreshed only when the presentation calls
//! [`HomeViewState::refresh_search_results`], typically on every keystroke.
//! Overlapping refreshes are not de-duplicated; whichever finishes last
//! decides the published results.

use super::SubscriptionGuard;
use crate::model::customer::Customer;
use crate::repo::customer_repo::CustomersRepository;
use crate::store::{LiveQuery, StoreResult};
use futures::StreamExt;
use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::watch;

/// Reactive list snapshot, ordered by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeUiState {
    pub customers: Vec<Customer>,
}

/// Typed search text and the last one-shot result list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchUiState {
    pub query: String,
    pub results: Vec<Customer>,
}

pub struct HomeViewState<R: CustomersRepository + ?Sized + 'static> {
    repo: Arc<R>,
    ui_state: watch::Receiver<HomeUiState>,
    search: watch::Sender<SearchUiState>,
    _subscription: SubscriptionGuard,
}

impl<R: CustomersRepository + ?Sized + 'static> HomeViewState<R> {
    pub fn new(repo: Arc<R>) -> Self {
        let (sender, ui_state) = watch::channel(HomeUiState::default());
        let subscription =
            SubscriptionGuard::spawn(publish_customer_list(repo.all_customers_stream(), sender));
        let (search, _) = watch::channel(SearchUiState::default());

        Self {
            repo,
            ui_state,
            search,
            _subscription: subscription,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<HomeUiState> {
        self.ui_state.clone()
    }

    pub fn ui_state(&self) -> HomeUiState {
        self.ui_state.borrow().clone()
    }

    pub fn subscribe_search(&self) -> watch::Receiver<SearchUiState> {
        self.search.subscribe()
    }

    pub fn search_state(&self) -> SearchUiState {
        self.search.borrow().clone()
    }

    /// Stores the typed search text. Does not query.
    pub fn update_search(&self, text: impl Into<String>) {
        let text = text.into();
        self.search.send_modify(|search| search.query = text);
    }

    /// Clears the search text and the last results.
    pub fn clear_search(&self) {
        self.search.send_replace(SearchUiState::default());
    }

    /// Runs the one-shot name search for the current text.
    pub async fn refresh_search_results(&self) -> StoreResult<()> {
        let query = self.search.borrow().query.clone();
        let results = self.repo.search_customers(&query).await?;
        debug!(
            "event=customer_search module=view_state status=ok hits={}",
            results.len()
        );
        self.search.send_modify(|search| search.results = results);
        Ok(())
    }

    pub fn is_searching(&self) -> bool {
        !self.search.borrow().query.is_empty()
    }

    /// The list the presentation should render: search results while a query
    /// is typed, the live list otherwise.
    pub fn visible_customers(&self) -> Vec<Customer> {
        if self.is_searching() {
            self.search.borrow().results.clone()
        } else {
            self.ui_state.borrow().customers.clone()
        }
    }
}

async fn publish_customer_list(
    mut stream: LiveQuery<Vec<Customer>>,
    sender: watch::Sender<HomeUiState>,
) {
    while let Some(result) = stream.next().await {
        match result {
            Ok(customers) => {
                sender.send_replace(HomeUiState { customers });
            }
            Err(err) => {
                warn!("event=customer_list_refresh module=view_state status=error error={err}");
            }
        }
    }
}
