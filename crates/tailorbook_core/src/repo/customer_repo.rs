//! Customer repository contract and its local SQLite implementation.

use crate::model::customer::{Customer, CustomerId};
use crate::store::{CustomerStore, LiveQuery, StoreResult};
use async_trait::async_trait;

/// Data access contract consumed by the view-state holders.
#[async_trait]
pub trait CustomersRepository: Send + Sync {
    /// Live list of all customers ordered by name.
    fn all_customers_stream(&self) -> LiveQuery<Vec<Customer>>;
    /// Live view of one customer; silent while the id does not exist.
    fn customer_stream(&self, id: CustomerId) -> LiveQuery<Customer>;
    /// One-shot snapshot of all customers ordered by name.
    async fn all_customers(&self) -> StoreResult<Vec<Customer>>;
    /// One-shot point lookup.
    async fn customer(&self, id: CustomerId) -> StoreResult<Option<Customer>>;
    async fn insert_customer(&self, customer: &Customer) -> StoreResult<Option<CustomerId>>;
    async fn update_customer(&self, customer: &Customer) -> StoreResult<bool>;
    async fn delete_customer(&self, customer: &Customer) -> StoreResult<bool>;
    /// One-shot case-sensitive substring search on the customer name.
    async fn search_customers(&self, text: &str) -> StoreResult<Vec<Customer>>;
}

/// Repository backed by the on-device [`CustomerStore`].
#[derive(Debug, Clone)]
pub struct LocalCustomersRepository {
    store: CustomerStore,
}

impl LocalCustomersRepository {
    pub fn new(store: CustomerStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CustomerStore {
        &self.store
    }

    /// Returns the store, e.g. to close it on shutdown.
    pub fn into_store(self) -> CustomerStore {
        self.store
    }
}

#[async_trait]
impl CustomersRepository for LocalCustomersRepository {
    fn all_customers_stream(&self) -> LiveQuery<Vec<Customer>> {
        self.store.get_all()
    }

    fn customer_stream(&self, id: CustomerId) -> LiveQuery<Customer> {
        self.store.get_by_id(id)
    }

    async fn all_customers(&self) -> StoreResult<Vec<Customer>> {
        self.store.list_all().await
    }

    async fn customer(&self, id: CustomerId) -> StoreResult<Option<Customer>> {
        self.store.find_by_id(id).await
    }

    async fn insert_customer(&self, customer: &Customer) -> StoreResult<Option<CustomerId>> {
        self.store.insert(customer).await
    }

    async fn update_customer(&self, customer: &Customer) -> StoreResult<bool> {
        self.store.update(customer).await
    }

    async fn delete_customer(&self, customer: &Customer) -> StoreResult<bool> {
        self.store.delete(customer).await
    }

    async fn search_customers(&self, text: &str) -> StoreResult<Vec<Customer>> {
        self.store.search_by_name_pattern(text).await
    }
}
