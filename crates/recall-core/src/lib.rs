//! Core types and domain logic for the Recall expense tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! defines the consume-record aggregate, the store traits that backends
//! implement, and the logic that links a loosely-specified request payload
//! into a fully-resolved aggregate.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod entity;
pub mod error;
pub mod projection;
pub mod proto;
pub mod resolve;
pub mod service;
pub mod store;

pub use error::{Error, Result};
