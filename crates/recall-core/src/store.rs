//! The `ReferenceStore` and `RecordStore` traits.
//!
//! Both are implemented by storage backends (e.g. `recall-store-sqlite`).
//! Higher layers (`recall-api`, the [`RecordService`](crate::service::RecordService))
//! depend on these abstractions, not on any concrete backend.
//!
//! Getters return `Ok(None)` for a missing id; turning that into a failure is
//! the caller's decision (see [`Lookup`](crate::resolve::Lookup)).

use std::future::Future;

use crate::entity::{
  ConsumePlatform, ConsumeRecord, NewPayAccount, NewReference, NewTag,
  PayAccount, PayMethod, PayPlatform, Tag,
};

// ─── Reference store ─────────────────────────────────────────────────────────

/// Storage for the reference entities a consume record links to.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ReferenceStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Lookups ───────────────────────────────────────────────────────────

  fn get_pay_platform(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<PayPlatform>, Self::Error>> + Send + '_;

  fn get_pay_method(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<PayMethod>, Self::Error>> + Send + '_;

  fn get_pay_account(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<PayAccount>, Self::Error>> + Send + '_;

  fn get_consume_platform(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<ConsumePlatform>, Self::Error>> + Send + '_;

  fn get_tag(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Tag>, Self::Error>> + Send + '_;

  // ── Management ────────────────────────────────────────────────────────

  fn add_pay_platform(
    &self,
    input: NewReference,
  ) -> impl Future<Output = Result<PayPlatform, Self::Error>> + Send + '_;

  fn add_pay_method(
    &self,
    input: NewReference,
  ) -> impl Future<Output = Result<PayMethod, Self::Error>> + Send + '_;

  fn add_pay_account(
    &self,
    input: NewPayAccount,
  ) -> impl Future<Output = Result<PayAccount, Self::Error>> + Send + '_;

  fn add_consume_platform(
    &self,
    input: NewReference,
  ) -> impl Future<Output = Result<ConsumePlatform, Self::Error>> + Send + '_;

  /// The `superior` pointer is stored as given; it is not checked against
  /// existing tags.
  fn add_tag(
    &self,
    input: NewTag,
  ) -> impl Future<Output = Result<Tag, Self::Error>> + Send + '_;

  fn list_pay_platforms(
    &self,
  ) -> impl Future<Output = Result<Vec<PayPlatform>, Self::Error>> + Send + '_;

  fn list_pay_methods(
    &self,
  ) -> impl Future<Output = Result<Vec<PayMethod>, Self::Error>> + Send + '_;

  fn list_pay_accounts(
    &self,
  ) -> impl Future<Output = Result<Vec<PayAccount>, Self::Error>> + Send + '_;

  fn list_consume_platforms(
    &self,
  ) -> impl Future<Output = Result<Vec<ConsumePlatform>, Self::Error>> + Send + '_;

  fn list_tags(
    &self,
  ) -> impl Future<Output = Result<Vec<Tag>, Self::Error>> + Send + '_;
}

// ─── Record store ────────────────────────────────────────────────────────────

/// Storage for the consume-record aggregate.
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Retrieve a record with its references and tags. `None` if not found.
  fn get_record(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<ConsumeRecord>, Self::Error>> + Send + '_;

  /// Insert the record when `id` is absent, otherwise overwrite it.
  ///
  /// Returns the record as stored: identity assigned, timestamps stamped.
  /// The write is atomic, tag links included.
  fn save_record(
    &self,
    record: ConsumeRecord,
  ) -> impl Future<Output = Result<ConsumeRecord, Self::Error>> + Send + '_;

  /// Delete every record in `ids`. Unknown ids are ignored. Referenced
  /// platforms, accounts, methods and tags are never deleted.
  fn delete_records(
    &self,
    ids: Vec<i64>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn list_records(
    &self,
  ) -> impl Future<Output = Result<Vec<ConsumeRecord>, Self::Error>> + Send + '_;
}
