//! Repository layer between view state and the record store.
//!
//! # Responsibility
//! - Define the customer data access contract used by view-state holders.
//! - Keep SQLite and invalidation details behind the store.
//!
//! # Invariants
//! - Implementations forward to the store one-to-one; they add no
//!   validation and do not translate errors.

pub mod customer_repo;
