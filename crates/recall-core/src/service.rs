//! [`RecordService`] — create, update, delete and list consume records.
//!
//! Linking is delegated to the [`Resolver`], persistence to a [`RecordStore`].
//! Every resolution failure happens before the store is written to.

use std::sync::Arc;

use tracing::info;

use crate::{
  Error, Result,
  entity::{ConsumeRecord, EntityKind},
  projection::project,
  proto::{ConsumeRecordProto, ConsumeRecordView},
  resolve::{ResolutionPolicy, Resolver},
  store::{RecordStore, ReferenceStore},
};

pub struct RecordService<R, S> {
  references: Arc<R>,
  records:    Arc<S>,
  policy:     ResolutionPolicy,
}

impl<R, S> Clone for RecordService<R, S> {
  fn clone(&self) -> Self {
    Self {
      references: Arc::clone(&self.references),
      records:    Arc::clone(&self.records),
      policy:     self.policy,
    }
  }
}

impl<R, S> RecordService<R, S>
where
  R: ReferenceStore,
  S: RecordStore,
{
  pub fn new(references: Arc<R>, records: Arc<S>) -> Self {
    Self { references, records, policy: ResolutionPolicy::default() }
  }

  pub fn with_policy(mut self, policy: ResolutionPolicy) -> Self {
    self.policy = policy;
    self
  }

  fn resolver(&self) -> Resolver<'_, R> {
    Resolver::with_policy(self.references.as_ref(), self.policy)
  }

  /// Link and persist a new record. `consumeDate` is required.
  pub async fn create(&self, payload: &ConsumeRecordProto) -> Result<ConsumeRecord> {
    if payload.consume_date.is_none() {
      return Err(Error::MissingField("consumeDate"));
    }

    let record = self.resolver().resolve(payload, None).await?;
    let saved = self.records.save_record(record).await.map_err(Error::store)?;
    info!(id = ?saved.id, "created consume record");
    Ok(saved)
  }

  /// [`create`](Self::create), then [`project`] the stored record.
  pub async fn create_projected(
    &self,
    payload: &ConsumeRecordProto,
  ) -> Result<ConsumeRecordView> {
    let record = self.create(payload).await?;
    Ok(project(&record))
  }

  /// Overwrite every linkable field of an existing record. `id` is required
  /// and is checked before the store is touched.
  pub async fn update(&self, payload: &ConsumeRecordProto) -> Result<ConsumeRecord> {
    let id = payload.id.ok_or(Error::MissingField("id"))?;

    let existing = self.get(id).await?;
    let record = self.resolver().resolve(payload, Some(&existing)).await?;
    let saved = self.records.save_record(record).await.map_err(Error::store)?;
    info!(id, "updated consume record");
    Ok(saved)
  }

  /// Delete every payload that carries an id, in one batch. Payloads without
  /// an id are dropped from the returned acknowledgement, not reported.
  pub async fn delete(
    &self,
    payloads: Vec<ConsumeRecordProto>,
  ) -> Result<Vec<ConsumeRecordProto>> {
    let kept: Vec<ConsumeRecordProto> =
      payloads.into_iter().filter(|p| p.id.is_some()).collect();
    let ids: Vec<i64> = kept.iter().filter_map(|p| p.id).collect();

    self.records.delete_records(ids.clone()).await.map_err(Error::store)?;
    info!(?ids, "deleted consume records");
    Ok(kept)
  }

  pub async fn list(&self) -> Result<Vec<ConsumeRecord>> {
    self.records.list_records().await.map_err(Error::store)
  }

  pub async fn get(&self, id: i64) -> Result<ConsumeRecord> {
    self
      .records
      .get_record(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::NotFound { kind: EntityKind::ConsumeRecord, id })
  }
}
