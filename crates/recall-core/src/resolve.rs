//! Linking a request payload into a consume-record aggregate.
//!
//! Each reference field is resolved with an explicit [`Lookup`] strategy. The
//! default [`ResolutionPolicy`] is asymmetric: payment platform, payment
//! account and payment method must exist, while consumption platform and tags
//! are dropped silently when they do not.

use std::{collections::BTreeMap, future::Future};

use tracing::debug;

use crate::{
  Error, Result,
  entity::{ConsumeRecord, EntityKind, Tag},
  proto::ConsumeRecordProto,
  store::ReferenceStore,
};

// ─── Strategy ────────────────────────────────────────────────────────────────

/// What to do when a referenced id does not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
  /// Fail the whole resolution with [`Error::NotFound`].
  Strict,
  /// Leave the link absent.
  Lenient,
}

impl Lookup {
  fn settle<T>(self, kind: EntityKind, id: i64, found: Option<T>) -> Result<Option<T>> {
    match (found, self) {
      (Some(entity), _) => Ok(Some(entity)),
      (None, Lookup::Strict) => Err(Error::NotFound { kind, id }),
      (None, Lookup::Lenient) => {
        debug!(%kind, id, "dropping unresolved reference");
        Ok(None)
      }
    }
  }
}

/// The lookup strategy used for each reference field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionPolicy {
  pub pay_platform:     Lookup,
  pub pay_method:       Lookup,
  pub pay_account:      Lookup,
  pub consume_platform: Lookup,
  pub tags:             Lookup,
}

impl Default for ResolutionPolicy {
  fn default() -> Self {
    Self {
      pay_platform:     Lookup::Strict,
      pay_method:       Lookup::Strict,
      pay_account:      Lookup::Strict,
      consume_platform: Lookup::Lenient,
      tags:             Lookup::Lenient,
    }
  }
}

// ─── Resolver ────────────────────────────────────────────────────────────────

/// Resolves [`ConsumeRecordProto`] ids against a [`ReferenceStore`].
pub struct Resolver<'a, R> {
  store:  &'a R,
  policy: ResolutionPolicy,
}

impl<'a, R: ReferenceStore> Resolver<'a, R> {
  pub fn new(store: &'a R) -> Self { Self::with_policy(store, ResolutionPolicy::default()) }

  pub fn with_policy(store: &'a R, policy: ResolutionPolicy) -> Self { Self { store, policy } }

  /// Build the aggregate described by `payload`, on top of `existing` when
  /// updating.
  ///
  /// Every linkable field and both scalars are overwritten from the payload;
  /// only identity and timestamps are carried over from `existing`. The
  /// result is a new value and is not persisted. If any strict lookup fails,
  /// nothing is returned and `existing` is untouched.
  pub async fn resolve(
    &self,
    payload:  &ConsumeRecordProto,
    existing: Option<&ConsumeRecord>,
  ) -> Result<ConsumeRecord> {
    let policy = self.policy;

    let (pay_platform, pay_method, pay_account, consume_platform, tags) = tokio::try_join!(
      self.link(
        EntityKind::PayPlatform,
        policy.pay_platform,
        payload.pay_platform_id,
        |id| self.store.get_pay_platform(id),
      ),
      self.link(
        EntityKind::PayMethod,
        policy.pay_method,
        payload.pay_method_id,
        |id| self.store.get_pay_method(id),
      ),
      self.link(
        EntityKind::PayAccount,
        policy.pay_account,
        payload.pay_account_id,
        |id| self.store.get_pay_account(id),
      ),
      self.link(
        EntityKind::ConsumePlatform,
        policy.consume_platform,
        payload.consume_platform_id,
        |id| self.store.get_consume_platform(id),
      ),
      self.link_tags(&payload.tag_ids),
    )?;

    Ok(ConsumeRecord {
      id: existing.and_then(|r| r.id),
      pay_platform,
      pay_method,
      pay_account,
      sum: payload.sum,
      consume_date: payload.consume_date,
      consume_platform,
      tags,
      created_at: existing.and_then(|r| r.created_at),
      updated_at: existing.and_then(|r| r.updated_at),
    })
  }

  async fn link<T, F, Fut>(
    &self,
    kind:   EntityKind,
    lookup: Lookup,
    id:     Option<i64>,
    fetch:  F,
  ) -> Result<Option<T>>
  where
    F: FnOnce(i64) -> Fut,
    Fut: Future<Output = Result<Option<T>, R::Error>>,
  {
    let Some(id) = id else { return Ok(None) };
    let found = fetch(id).await.map_err(Error::store)?;
    lookup.settle(kind, id, found)
  }

  /// Resolve each tag id independently; the result is unique by id and
  /// ordered by id.
  async fn link_tags(&self, ids: &[i64]) -> Result<Vec<Tag>> {
    let mut tags = BTreeMap::new();
    for &id in ids {
      if tags.contains_key(&id) {
        continue;
      }
      let tag = self
        .link(EntityKind::Tag, self.policy.tags, Some(id), |id| self.store.get_tag(id))
        .await?;
      if let Some(tag) = tag {
        tags.insert(tag.id, tag);
      }
    }
    Ok(tags.into_values().collect())
  }
}
