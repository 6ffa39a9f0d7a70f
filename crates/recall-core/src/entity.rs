//! Persisted entities: the reference lookups and the consume-record aggregate.
//!
//! Identities and the `created_at`/`updated_at` stamps are assigned by the
//! store. A value that was never persisted carries no stamps.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The kinds of entity a lookup can target, used in error reporting.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
  PayPlatform,
  PayMethod,
  PayAccount,
  ConsumePlatform,
  Tag,
  ConsumeRecord,
}

// ─── Reference entities ──────────────────────────────────────────────────────

/// Where a payment was made through (e.g. a card network or wallet app).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayPlatform {
  pub id:         i64,
  pub identifier: Option<String>,
  pub label:      Option<String>,
  pub created_at: Option<DateTime<Utc>>,
  pub updated_at: Option<DateTime<Utc>>,
}

/// How a payment was made (e.g. contactless, online, cash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayMethod {
  pub id:         i64,
  pub identifier: Option<String>,
  pub label:      Option<String>,
  pub created_at: Option<DateTime<Utc>>,
  pub updated_at: Option<DateTime<Utc>>,
}

/// The account money was drawn from. `identifier` is typically the card
/// issuer plus the card's tail number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayAccount {
  pub id:           i64,
  pub identifier:   Option<String>,
  pub label:        Option<String>,
  #[serde(rename = "type")]
  pub account_type: Option<String>,
  pub in_use:       bool,
  pub created_at:   Option<DateTime<Utc>>,
  pub updated_at:   Option<DateTime<Utc>>,
}

/// Where the money was spent (a shop, a marketplace, a service).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumePlatform {
  pub id:         i64,
  pub identifier: Option<String>,
  pub label:      Option<String>,
  pub created_at: Option<DateTime<Utc>>,
  pub updated_at: Option<DateTime<Utc>>,
}

/// A descriptive tag. Tags form a single-parent hierarchy through
/// `superior`, a pointer by identity to another tag. Nothing prevents cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
  pub id:         i64,
  pub identifier: Option<String>,
  pub label:      Option<String>,
  pub superior:   Option<i64>,
  pub created_at: Option<DateTime<Utc>>,
  pub updated_at: Option<DateTime<Utc>>,
}

// ─── Inputs for new reference entities ──────────────────────────────────────

/// Input for the flat reference kinds: pay platforms, pay methods and
/// consume platforms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewReference {
  pub identifier: Option<String>,
  pub label:      Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayAccount {
  pub identifier:   Option<String>,
  pub label:        Option<String>,
  #[serde(rename = "type")]
  pub account_type: Option<String>,
  #[serde(default)]
  pub in_use:       bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTag {
  pub identifier: Option<String>,
  pub label:      Option<String>,
  pub superior:   Option<i64>,
}

// ─── Aggregate ───────────────────────────────────────────────────────────────

/// A single purchase together with its resolved reference links.
///
/// `id` is absent until the record is first persisted and never changes
/// afterwards. `tags` is a set: unique by tag id, kept in ascending id order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumeRecord {
  pub id:               Option<i64>,
  pub pay_platform:     Option<PayPlatform>,
  pub pay_method:       Option<PayMethod>,
  pub pay_account:      Option<PayAccount>,
  pub sum:              Decimal,
  pub consume_date:     Option<NaiveDate>,
  pub consume_platform: Option<ConsumePlatform>,
  pub tags:             Vec<Tag>,
  pub created_at:       Option<DateTime<Utc>>,
  pub updated_at:       Option<DateTime<Utc>>,
}

impl ConsumeRecord {
  pub fn tag_ids(&self) -> Vec<i64> { self.tags.iter().map(|t| t.id).collect() }
}
