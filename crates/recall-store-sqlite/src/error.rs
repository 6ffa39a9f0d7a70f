//! Error type for `recall-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("decimal parse error: {0}")]
  Decimal(#[from] rust_decimal::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A row that was just written could not be read back.
  #[error("record {0} vanished during save")]
  Vanished(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
