//! Handlers for the reference-entity endpoints.
//!
//! Each kind supports `GET` (list, id order) and `POST` (add, returns the
//! stored entity):
//!
//! | Path | Body for `POST` |
//! |------|-----------------|
//! | `/pay/platform` | [`NewReference`] |
//! | `/pay/method` | [`NewReference`] |
//! | `/pay/account` | [`NewPayAccount`] |
//! | `/consume/platform` | [`NewReference`] |
//! | `/consume/tag` | [`NewTag`] |

use std::sync::Arc;

use axum::{Json, extract::State};
use recall_core::{
  entity::{
    ConsumePlatform, NewPayAccount, NewReference, NewTag, PayAccount, PayMethod,
    PayPlatform, Tag,
  },
  store::ReferenceStore,
};

use crate::{Envelope, error::ApiError, extract::ApiJson};

// ─── Pay platforms ───────────────────────────────────────────────────────────

pub async fn list_pay_platforms<S: ReferenceStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Envelope<Vec<PayPlatform>>>, ApiError> {
  let all = store.list_pay_platforms().await.map_err(ApiError::store)?;
  Ok(Envelope::json(all))
}

pub async fn add_pay_platform<S: ReferenceStore>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<NewReference>,
) -> Result<Json<Envelope<PayPlatform>>, ApiError> {
  let added = store.add_pay_platform(body).await.map_err(ApiError::store)?;
  Ok(Envelope::json(added))
}

// ─── Pay methods ─────────────────────────────────────────────────────────────

pub async fn list_pay_methods<S: ReferenceStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Envelope<Vec<PayMethod>>>, ApiError> {
  let all = store.list_pay_methods().await.map_err(ApiError::store)?;
  Ok(Envelope::json(all))
}

pub async fn add_pay_method<S: ReferenceStore>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<NewReference>,
) -> Result<Json<Envelope<PayMethod>>, ApiError> {
  let added = store.add_pay_method(body).await.map_err(ApiError::store)?;
  Ok(Envelope::json(added))
}

// ─── Pay accounts ────────────────────────────────────────────────────────────

pub async fn list_pay_accounts<S: ReferenceStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Envelope<Vec<PayAccount>>>, ApiError> {
  let all = store.list_pay_accounts().await.map_err(ApiError::store)?;
  Ok(Envelope::json(all))
}

pub async fn add_pay_account<S: ReferenceStore>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<NewPayAccount>,
) -> Result<Json<Envelope<PayAccount>>, ApiError> {
  let added = store.add_pay_account(body).await.map_err(ApiError::store)?;
  Ok(Envelope::json(added))
}

// ─── Consume platforms ───────────────────────────────────────────────────────

pub async fn list_consume_platforms<S: ReferenceStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Envelope<Vec<ConsumePlatform>>>, ApiError> {
  let all = store.list_consume_platforms().await.map_err(ApiError::store)?;
  Ok(Envelope::json(all))
}

pub async fn add_consume_platform<S: ReferenceStore>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<NewReference>,
) -> Result<Json<Envelope<ConsumePlatform>>, ApiError> {
  let added = store.add_consume_platform(body).await.map_err(ApiError::store)?;
  Ok(Envelope::json(added))
}

// ─── Tags ────────────────────────────────────────────────────────────────────

pub async fn list_tags<S: ReferenceStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Envelope<Vec<Tag>>>, ApiError> {
  let all = store.list_tags().await.map_err(ApiError::store)?;
  Ok(Envelope::json(all))
}

pub async fn add_tag<S: ReferenceStore>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<NewTag>,
) -> Result<Json<Envelope<Tag>>, ApiError> {
  let added = store.add_tag(body).await.map_err(ApiError::store)?;
  Ok(Envelope::json(added))
}
