//! Customer domain model.
//!
//! # Responsibility
//! - Define the persisted customer record and its measurement set.
//!
//! # Invariants
//! - A customer is identified by a store-assigned `CustomerId`; `0` means
//!   "not yet stored".
//! - Numeric fields default to zero; only `name` carries meaning when empty.

pub mod customer;
