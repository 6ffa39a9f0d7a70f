//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as `YYYY-MM-DD`
//! and sums as the canonical decimal string so no precision is lost.

use std::str::FromStr as _;

use chrono::{DateTime, NaiveDate, Utc};
use recall_core::entity::{
  ConsumePlatform, ConsumeRecord, PayAccount, PayMethod, PayPlatform, Tag,
};
use rust_decimal::Decimal;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Decimal ─────────────────────────────────────────────────────────────────

pub fn encode_decimal(d: Decimal) -> String { d.to_string() }

pub fn decode_decimal(s: &str) -> Result<Decimal> { Ok(Decimal::from_str(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw columns shared by `pay_platform`, `pay_method` and `cs_platform`.
pub struct RawReference {
  pub id:         i64,
  pub identifier: Option<String>,
  pub label:      Option<String>,
  pub created_at: String,
  pub updated_at: String,
}

impl RawReference {
  fn stamps(&self) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    Ok((decode_dt(&self.created_at)?, decode_dt(&self.updated_at)?))
  }

  pub fn into_pay_platform(self) -> Result<PayPlatform> {
    let (created_at, updated_at) = self.stamps()?;
    Ok(PayPlatform {
      id:         self.id,
      identifier: self.identifier,
      label:      self.label,
      created_at: Some(created_at),
      updated_at: Some(updated_at),
    })
  }

  pub fn into_pay_method(self) -> Result<PayMethod> {
    let (created_at, updated_at) = self.stamps()?;
    Ok(PayMethod {
      id:         self.id,
      identifier: self.identifier,
      label:      self.label,
      created_at: Some(created_at),
      updated_at: Some(updated_at),
    })
  }

  pub fn into_consume_platform(self) -> Result<ConsumePlatform> {
    let (created_at, updated_at) = self.stamps()?;
    Ok(ConsumePlatform {
      id:         self.id,
      identifier: self.identifier,
      label:      self.label,
      created_at: Some(created_at),
      updated_at: Some(updated_at),
    })
  }
}

/// Raw columns of a `pay_account` row.
pub struct RawPayAccount {
  pub id:           i64,
  pub identifier:   Option<String>,
  pub label:        Option<String>,
  pub account_type: Option<String>,
  pub in_use:       bool,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawPayAccount {
  pub fn into_pay_account(self) -> Result<PayAccount> {
    Ok(PayAccount {
      id:           self.id,
      identifier:   self.identifier,
      label:        self.label,
      account_type: self.account_type,
      in_use:       self.in_use,
      created_at:   Some(decode_dt(&self.created_at)?),
      updated_at:   Some(decode_dt(&self.updated_at)?),
    })
  }
}

/// Raw columns of a `cs_tag` row.
pub struct RawTag {
  pub id:         i64,
  pub identifier: Option<String>,
  pub label:      Option<String>,
  pub superior:   Option<i64>,
  pub created_at: String,
  pub updated_at: String,
}

impl RawTag {
  pub fn into_tag(self) -> Result<Tag> {
    Ok(Tag {
      id:         self.id,
      identifier: self.identifier,
      label:      self.label,
      superior:   self.superior,
      created_at: Some(decode_dt(&self.created_at)?),
      updated_at: Some(decode_dt(&self.updated_at)?),
    })
  }
}

/// A `cs_record` row with every reference it points at already loaded.
pub struct RawRecord {
  pub id:               i64,
  pub sum:              String,
  pub consume_date:     Option<String>,
  pub created_at:       String,
  pub updated_at:       String,
  // joined references; absent when the column is NULL or dangling
  pub pay_platform:     Option<RawReference>,
  pub pay_method:       Option<RawReference>,
  pub pay_account:      Option<RawPayAccount>,
  pub consume_platform: Option<RawReference>,
  // ordered by tag id
  pub tags:             Vec<RawTag>,
}

impl RawRecord {
  pub fn into_record(self) -> Result<ConsumeRecord> {
    Ok(ConsumeRecord {
      id:               Some(self.id),
      pay_platform:     self.pay_platform.map(RawReference::into_pay_platform).transpose()?,
      pay_method:       self.pay_method.map(RawReference::into_pay_method).transpose()?,
      pay_account:      self.pay_account.map(RawPayAccount::into_pay_account).transpose()?,
      sum:              decode_decimal(&self.sum)?,
      consume_date:     self.consume_date.as_deref().map(decode_date).transpose()?,
      consume_platform: self
        .consume_platform
        .map(RawReference::into_consume_platform)
        .transpose()?,
      tags:             self
        .tags
        .into_iter()
        .map(RawTag::into_tag)
        .collect::<Result<_>>()?,
      created_at:       Some(decode_dt(&self.created_at)?),
      updated_at:       Some(decode_dt(&self.updated_at)?),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decimal_text_keeps_scale() {
    let d = Decimal::new(1990, 2);
    assert_eq!(encode_decimal(d), "19.90");
    assert_eq!(decode_decimal("19.90").unwrap(), d);
  }

  #[test]
  fn date_text_is_iso() {
    let d = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    assert_eq!(encode_date(d), "2024-01-05");
    assert_eq!(decode_date("2024-01-05").unwrap(), d);
    assert!(decode_date("05/01/2024").is_err());
  }
}
