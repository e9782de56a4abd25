//! Outbound adapters implementing the domain ports against real backends.

pub mod auth;
pub mod cache;
pub mod persistence;
