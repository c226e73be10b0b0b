//! Core of the tailoring customer book.
//!
//! Layers, leaf first: `db` (SQLite bootstrap), `store` (customer table with
//! live queries), `repo` (data access contract), `view_state` (per-screen
//! state holders consumed by the presentation layer).

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;
pub mod view_state;

pub use config::{LogConfig, StoreConfig, StoreLocation};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::customer::{Customer, CustomerId, Measurement, Measurements, UNASSIGNED_ID};
pub use repo::customer_repo::{CustomersRepository, LocalCustomersRepository};
pub use store::{CustomerStore, LiveQuery, StoreError, StoreResult};
pub use view_state::{
    CustomerUiState, CustomerViewState, DetailsViewState, EditViewState, EntryViewState,
    HomeUiState, HomeViewState, LoadState, MeasurementInputs, SaveOutcome, SearchUiState,
};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
