//! JSON HTTP API for Recall.
//!
//! Exposes an axum [`Router`] backed by any store implementing both
//! [`ReferenceStore`] and [`RecordStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! Successful responses are wrapped as `{"code":0,"data":...}`; failures as
//! `{"code":<http status>,"error":"..."}`, including bodies and paths the
//! [`extract`] types reject before a handler runs.

pub mod error;
pub mod extract;
pub mod records;
pub mod references;

use std::sync::Arc;

use axum::{
  Json, Router,
  routing::{get, post},
};
use recall_core::store::{RecordStore, ReferenceStore};
use serde::{Deserialize, Serialize};

pub use error::ApiError;

/// Success envelope around every response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
  pub code: u16,
  pub data: T,
}

impl<T> Envelope<T> {
  pub fn json(data: T) -> Json<Self> { Json(Self { code: 0, data }) }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ReferenceStore + RecordStore + 'static,
{
  Router::new()
    // Consume records
    .route("/consume/record", get(records::list::<S>))
    .route("/consume/record/{id}", get(records::get_one::<S>))
    .route("/consume/record/add", post(records::add::<S>))
    .route("/consume/record/update", post(records::update::<S>))
    .route("/consume/record/del", post(records::delete::<S>))
    .route("/repl/consume/record/add", post(records::add_for_repl::<S>))
    // Reference entities
    .route(
      "/pay/platform",
      get(references::list_pay_platforms::<S>).post(references::add_pay_platform::<S>),
    )
    .route(
      "/pay/method",
      get(references::list_pay_methods::<S>).post(references::add_pay_method::<S>),
    )
    .route(
      "/pay/account",
      get(references::list_pay_accounts::<S>).post(references::add_pay_account::<S>),
    )
    .route(
      "/consume/platform",
      get(references::list_consume_platforms::<S>)
        .post(references::add_consume_platform::<S>),
    )
    .route(
      "/consume/tag",
      get(references::list_tags::<S>).post(references::add_tag::<S>),
    )
    .with_state(store)
}

// ─── Router tests ─────────────────────────────────────────────────────────────
