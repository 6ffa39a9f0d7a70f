//! Handlers for consume-record endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/consume/record` | All records |
//! | `GET`  | `/consume/record/{id}` | 404 if not found, 400 if `id` is not a number |
//! | `POST` | `/consume/record/add` | Body: [`ConsumeRecordProto`]; `consumeDate` required |
//! | `POST` | `/repl/consume/record/add` | As above, returns a [`ConsumeRecordView`] |
//! | `POST` | `/consume/record/update` | Body: [`ConsumeRecordProto`]; `id` required |
//! | `POST` | `/consume/record/del` | Body: list of [`ConsumeRecordProto`]; returns those with an id |

use std::sync::Arc;

use axum::{Json, extract::State};
use recall_core::{
  entity::ConsumeRecord,
  proto::{ConsumeRecordProto, ConsumeRecordView},
  service::RecordService,
  store::{RecordStore, ReferenceStore},
};

use crate::{
  Envelope,
  error::ApiError,
  extract::{ApiJson, ApiPath},
};

fn service<S>(store: Arc<S>) -> RecordService<S, S>
where
  S: ReferenceStore + RecordStore,
{
  RecordService::new(Arc::clone(&store), store)
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /consume/record`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Envelope<Vec<ConsumeRecord>>>, ApiError>
where
  S: ReferenceStore + RecordStore,
{
  let records = service(store).list().await?;
  Ok(Envelope::json(records))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /consume/record/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<Envelope<ConsumeRecord>>, ApiError>
where
  S: ReferenceStore + RecordStore,
{
  let record = service(store).get(id).await?;
  Ok(Envelope::json(record))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /consume/record/add`
pub async fn add<S>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<ConsumeRecordProto>,
) -> Result<Json<Envelope<ConsumeRecord>>, ApiError>
where
  S: ReferenceStore + RecordStore,
{
  let record = service(store).create(&body).await?;
  Ok(Envelope::json(record))
}

/// `POST /repl/consume/record/add` — identifiers instead of nested entities.
pub async fn add_for_repl<S>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<ConsumeRecordProto>,
) -> Result<Json<Envelope<ConsumeRecordView>>, ApiError>
where
  S: ReferenceStore + RecordStore,
{
  let view = service(store).create_projected(&body).await?;
  Ok(Envelope::json(view))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `POST /consume/record/update`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<ConsumeRecordProto>,
) -> Result<Json<Envelope<ConsumeRecord>>, ApiError>
where
  S: ReferenceStore + RecordStore,
{
  let record = service(store).update(&body).await?;
  Ok(Envelope::json(record))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `POST /consume/record/del`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<Vec<ConsumeRecordProto>>,
) -> Result<Json<Envelope<Vec<ConsumeRecordProto>>>, ApiError>
where
  S: ReferenceStore + RecordStore,
{
  let deleted = service(store).delete(body).await?;
  Ok(Envelope::json(deleted))
}
