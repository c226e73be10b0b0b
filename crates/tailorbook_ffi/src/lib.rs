//! Flutter-facing bindings for the tailoring customer book.

pub mod api;
