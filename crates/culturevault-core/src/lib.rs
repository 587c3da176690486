//! # CultureVault Core
//!
//! Domain logic for CultureVault: place records, the bundled catalog with
//! its substring filter, the recency history rules, the search-merge engine,
//! and the store traits that connect it to persistence and to the remote
//! AI lookup.
//!
//! The binary crate supplies the concrete edges (HTTP gateway client,
//! file-backed stores, CLI, server); everything in here runs against the
//! traits in [`store`] and is exercised the same way in tests and in
//! production.

pub mod catalog;
pub mod history;
pub mod models;
pub mod search;
pub mod store;
