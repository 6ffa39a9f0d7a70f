//! Integration tests for `SqliteStore` against an in-memory database.

use std::sync::Arc;

use chrono::NaiveDate;
use recall_core::{
  entity::{ConsumeRecord, EntityKind, NewPayAccount, NewReference, NewTag},
  proto::ConsumeRecordProto,
  service::RecordService,
  store::{RecordStore, ReferenceStore},
};
use rust_decimal::Decimal;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn reference(identifier: &str) -> NewReference {
  NewReference { identifier: Some(identifier.into()), label: None }
}

fn tag(identifier: &str, superior: Option<i64>) -> NewTag {
  NewTag { identifier: Some(identifier.into()), label: None, superior }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

// ─── Reference entities ──────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_pay_platform() {
  let s = store().await;

  let added = s.add_pay_platform(reference("VISA")).await.unwrap();
  assert!(added.created_at.is_some());
  assert_eq!(added.created_at, added.updated_at);

  let fetched = s.get_pay_platform(added.id).await.unwrap();
  assert_eq!(fetched, Some(added));
}

#[tokio::test]
async fn get_missing_reference_returns_none() {
  let s = store().await;

  assert!(s.get_pay_platform(1).await.unwrap().is_none());
  assert!(s.get_pay_method(1).await.unwrap().is_none());
  assert!(s.get_pay_account(1).await.unwrap().is_none());
  assert!(s.get_consume_platform(1).await.unwrap().is_none());
  assert!(s.get_tag(1).await.unwrap().is_none());
}

#[tokio::test]
async fn reference_kinds_are_separate_tables() {
  let s = store().await;

  let platform = s.add_pay_platform(reference("VISA")).await.unwrap();
  let method = s.add_pay_method(reference("NFC")).await.unwrap();

  // Both tables start their own id sequence.
  assert_eq!(platform.id, method.id);
  assert_eq!(
    s.get_pay_method(method.id).await.unwrap().unwrap().identifier.as_deref(),
    Some("NFC")
  );
}

#[tokio::test]
async fn pay_account_roundtrip() {
  let s = store().await;

  let account = s
    .add_pay_account(NewPayAccount {
      identifier:   Some("CMB-0042".into()),
      label:        Some("Salary card".into()),
      account_type: Some("debit".into()),
      in_use:       true,
    })
    .await
    .unwrap();

  let fetched = s.get_pay_account(account.id).await.unwrap().unwrap();
  assert_eq!(fetched.account_type.as_deref(), Some("debit"));
  assert!(fetched.in_use);
  assert_eq!(fetched, account);
}

#[tokio::test]
async fn tag_superior_is_stored_unchecked() {
  let s = store().await;

  let parent = s.add_tag(tag("food", None)).await.unwrap();
  let child = s.add_tag(tag("snacks", Some(parent.id))).await.unwrap();
  let orphan = s.add_tag(tag("lost", Some(9999))).await.unwrap();

  assert_eq!(child.superior, Some(parent.id));
  assert_eq!(orphan.superior, Some(9999));
  assert_eq!(s.list_tags().await.unwrap().len(), 3);
}

#[tokio::test]
async fn list_references_in_id_order() {
  let s = store().await;

  s.add_consume_platform(reference("TAOBAO")).await.unwrap();
  s.add_consume_platform(reference("JD")).await.unwrap();

  let all = s.list_consume_platforms().await.unwrap();
  let identifiers: Vec<_> = all.iter().filter_map(|p| p.identifier.as_deref()).collect();
  assert_eq!(identifiers, ["TAOBAO", "JD"]);
  assert!(s.list_pay_platforms().await.unwrap().is_empty());
  assert!(s.list_pay_methods().await.unwrap().is_empty());
  assert!(s.list_pay_accounts().await.unwrap().is_empty());
}

// ─── Records ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_new_record_assigns_id_and_stamps() {
  let s = store().await;

  let saved = s
    .save_record(ConsumeRecord {
      sum: Decimal::new(1234, 2),
      consume_date: Some(date(2024, 3, 1)),
      ..Default::default()
    })
    .await
    .unwrap();

  assert!(saved.id.is_some());
  assert!(saved.created_at.is_some());
  assert_eq!(saved.sum, Decimal::new(1234, 2));
  assert_eq!(saved.consume_date, Some(date(2024, 3, 1)));

  let fetched = s.get_record(saved.id.unwrap()).await.unwrap();
  assert_eq!(fetched, Some(saved));
}

#[tokio::test]
async fn save_links_references_and_tags() {
  let s = store().await;

  let platform = s.add_pay_platform(reference("ALIPAY")).await.unwrap();
  let method = s.add_pay_method(reference("QR")).await.unwrap();
  let shop = s.add_consume_platform(reference("MEITUAN")).await.unwrap();
  let a = s.add_tag(tag("a", None)).await.unwrap();
  let b = s.add_tag(tag("b", None)).await.unwrap();

  let saved = s
    .save_record(ConsumeRecord {
      pay_platform: Some(platform.clone()),
      pay_method: Some(method.clone()),
      consume_platform: Some(shop.clone()),
      tags: vec![a.clone(), b.clone()],
      consume_date: Some(date(2024, 3, 2)),
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(saved.pay_platform, Some(platform));
  assert_eq!(saved.pay_method, Some(method));
  assert_eq!(saved.consume_platform, Some(shop));
  assert_eq!(saved.tags, vec![a, b]);
  assert!(saved.pay_account.is_none());
}

#[tokio::test]
async fn save_existing_record_overwrites_and_keeps_created_at() {
  let s = store().await;

  let a = s.add_tag(tag("a", None)).await.unwrap();
  let b = s.add_tag(tag("b", None)).await.unwrap();
  let first = s
    .save_record(ConsumeRecord { tags: vec![a], ..Default::default() })
    .await
    .unwrap();

  let second = s
    .save_record(ConsumeRecord {
      id: first.id,
      sum: Decimal::new(99, 0),
      tags: vec![b.clone()],
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(second.id, first.id);
  assert_eq!(second.created_at, first.created_at);
  assert_eq!(second.sum, Decimal::new(99, 0));
  assert_eq!(second.tags, vec![b]);
  assert_eq!(s.list_records().await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_records_removes_only_records() {
  let s = store().await;

  let platform = s.add_pay_platform(reference("VISA")).await.unwrap();
  let t = s.add_tag(tag("rent", None)).await.unwrap();
  let one = s
    .save_record(ConsumeRecord {
      pay_platform: Some(platform.clone()),
      tags: vec![t.clone()],
      ..Default::default()
    })
    .await
    .unwrap();
  let two = s.save_record(ConsumeRecord::default()).await.unwrap();
  let three = s.save_record(ConsumeRecord::default()).await.unwrap();

  s.delete_records(vec![one.id.unwrap(), two.id.unwrap(), 777])
    .await
    .unwrap();

  let remaining = s.list_records().await.unwrap();
  assert_eq!(remaining.len(), 1);
  assert_eq!(remaining[0].id, three.id);
  assert_eq!(s.get_pay_platform(platform.id).await.unwrap(), Some(platform));
  assert_eq!(s.get_tag(t.id).await.unwrap(), Some(t));
}

#[tokio::test]
async fn deleting_a_record_cascades_to_its_tag_links() {
  let s = store().await;

  let rent = s.add_tag(tag("rent", None)).await.unwrap();
  let bills = s.add_tag(tag("bills", None)).await.unwrap();
  let gone = s
    .save_record(ConsumeRecord { tags: vec![rent.clone(), bills.clone()], ..Default::default() })
    .await
    .unwrap();
  let kept = s
    .save_record(ConsumeRecord { tags: vec![rent.clone()], ..Default::default() })
    .await
    .unwrap();

  s.delete_records(vec![gone.id.unwrap()]).await.unwrap();

  let links: Vec<(i64, i64)> = s
    .conn
    .call(|conn| {
      let mut stmt = conn.prepare("SELECT record_id, tag_id FROM cs_record_tags")?;
      let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
      Ok(rows)
    })
    .await
    .unwrap();
  assert_eq!(links, vec![(kept.id.unwrap(), rent.id)]);
  assert_eq!(s.list_tags().await.unwrap().len(), 2);
}

#[tokio::test]
async fn list_records_on_empty_store() {
  let s = store().await;
  assert!(s.list_records().await.unwrap().is_empty());
}

// ─── Service over SQLite ─────────────────────────────────────────────────────

fn service(s: &SqliteStore) -> RecordService<SqliteStore, SqliteStore> {
  let shared = Arc::new(s.clone());
  RecordService::new(shared.clone(), shared)
}

#[tokio::test]
async fn service_create_and_project() {
  let s = store().await;
  let visa = s.add_pay_platform(reference("VISA")).await.unwrap();

  let view = service(&s)
    .create_projected(&ConsumeRecordProto {
      consume_date: Some(date(2024, 1, 1)),
      pay_platform_id: Some(visa.id),
      sum: Decimal::new(1999, 2),
      ..Default::default()
    })
    .await
    .unwrap();

  assert!(view.id.is_some());
  assert_eq!(view.pay_platform_identifier.as_deref(), Some("VISA"));
  assert_eq!(view.sum, Decimal::new(1999, 2));
  assert!(view.tags.is_empty());
}

#[tokio::test]
async fn service_projects_every_reference_from_stored_rows() {
  let s = store().await;
  let visa = s.add_pay_platform(reference("VISA")).await.unwrap();
  let qr = s.add_pay_method(reference("QR")).await.unwrap();
  let debit = s
    .add_pay_account(NewPayAccount {
      identifier:   Some("BANK-1234".into()),
      label:        None,
      account_type: Some("debit".into()),
      in_use:       true,
    })
    .await
    .unwrap();
  let shop = s.add_consume_platform(reference("SHOP")).await.unwrap();
  let food = s.add_tag(tag("food", None)).await.unwrap();
  let snacks = s.add_tag(tag("snacks", Some(food.id))).await.unwrap();

  let view = service(&s)
    .create_projected(&ConsumeRecordProto {
      consume_date: Some(date(2024, 1, 1)),
      pay_platform_id: Some(visa.id),
      pay_method_id: Some(qr.id),
      pay_account_id: Some(debit.id),
      consume_platform_id: Some(shop.id),
      tag_ids: vec![snacks.id, food.id],
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(view.pay_platform_identifier.as_deref(), Some("VISA"));
  assert_eq!(view.pay_method_identifier.as_deref(), Some("QR"));
  assert_eq!(view.pay_account_identifier.as_deref(), Some("BANK-1234"));
  assert_eq!(view.consume_platform_identifier.as_deref(), Some("SHOP"));
  assert_eq!(view.tags, vec!["food".to_string(), "snacks".to_string()]);
}

#[tokio::test]
async fn service_rejects_unknown_pay_account_without_writing() {
  let s = store().await;

  let err = service(&s)
    .create(&ConsumeRecordProto {
      consume_date: Some(date(2024, 1, 1)),
      pay_account_id: Some(12),
      ..Default::default()
    })
    .await
    .unwrap_err();

  assert!(matches!(
    err,
    recall_core::Error::NotFound { kind: EntityKind::PayAccount, id: 12 }
  ));
  assert!(s.list_records().await.unwrap().is_empty());
}

#[tokio::test]
async fn service_update_drops_unknown_tags() {
  let s = store().await;
  let svc = service(&s);
  let food = s.add_tag(tag("food", None)).await.unwrap();

  let created = svc
    .create(&ConsumeRecordProto {
      consume_date: Some(date(2024, 1, 1)),
      ..Default::default()
    })
    .await
    .unwrap();

  let updated = svc
    .update(&ConsumeRecordProto {
      id: created.id,
      consume_date: Some(date(2024, 1, 2)),
      tag_ids: vec![food.id, 4040],
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(updated.tags, vec![food]);
  assert_eq!(updated.created_at, created.created_at);
  assert_eq!(svc.get(created.id.unwrap()).await.unwrap(), updated);
}
