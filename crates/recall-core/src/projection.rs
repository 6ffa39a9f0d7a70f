//! Aggregate → denormalised view.

use crate::{entity::ConsumeRecord, proto::ConsumeRecordView};

/// Replace every linked reference with its `identifier`.
///
/// An absent reference projects to an absent identifier. Tags without an
/// identifier are skipped.
pub fn project(record: &ConsumeRecord) -> ConsumeRecordView {
  ConsumeRecordView {
    id:                          record.id,
    pay_platform_identifier:     record
      .pay_platform
      .as_ref()
      .and_then(|p| p.identifier.clone()),
    pay_method_identifier:       record
      .pay_method
      .as_ref()
      .and_then(|m| m.identifier.clone()),
    pay_account_identifier:      record
      .pay_account
      .as_ref()
      .and_then(|a| a.identifier.clone()),
    sum:                         record.sum,
    consume_date:                record.consume_date,
    consume_platform_identifier: record
      .consume_platform
      .as_ref()
      .and_then(|p| p.identifier.clone()),
    tags:                        record
      .tags
      .iter()
      .filter_map(|t| t.identifier.clone())
      .collect(),
  }
}
