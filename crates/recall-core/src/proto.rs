//! Wire shapes exchanged with clients.
//!
//! [`ConsumeRecordProto`] is the loosely-validated inbound payload: it refers
//! to reference entities by id only. [`ConsumeRecordView`] is the
//! denormalised outbound shape used by the REPL, with ids replaced by
//! identifiers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inbound consume-record payload for create, update and delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumeRecordProto {
  /// Required for update; ignored on create.
  pub id:                  Option<i64>,
  pub pay_platform_id:     Option<i64>,
  pub pay_method_id:       Option<i64>,
  pub pay_account_id:      Option<i64>,
  #[serde(default)]
  pub sum:                 Decimal,
  /// Required for create.
  pub consume_date:        Option<NaiveDate>,
  pub consume_platform_id: Option<i64>,
  #[serde(default)]
  pub tag_ids:             Vec<i64>,
}

/// Outbound projection of a [`ConsumeRecord`](crate::entity::ConsumeRecord).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumeRecordView {
  pub id:                          Option<i64>,
  pub pay_platform_identifier:     Option<String>,
  pub pay_method_identifier:       Option<String>,
  pub pay_account_identifier:      Option<String>,
  pub sum:                         Decimal,
  pub consume_date:                Option<NaiveDate>,
  pub consume_platform_identifier: Option<String>,
  pub tags:                        Vec<String>,
}
