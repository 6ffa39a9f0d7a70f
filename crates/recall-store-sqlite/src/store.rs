//! [`SqliteStore`] — the SQLite implementation of [`ReferenceStore`] and
//! [`RecordStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension as _, Row};

use recall_core::{
  entity::{
    ConsumePlatform, ConsumeRecord, NewPayAccount, NewReference, NewTag,
    PayAccount, PayMethod, PayPlatform, Tag,
  },
  store::{RecordStore, ReferenceStore},
};

use crate::{
  Error, Result,
  encode::{
    RawPayAccount, RawRecord, RawReference, RawTag, encode_date, encode_decimal,
    encode_dt,
  },
  schema::SCHEMA,
};

// ─── Tables ──────────────────────────────────────────────────────────────────

const PAY_PLATFORM: &str = "pay_platform";
const PAY_METHOD: &str = "pay_method";
const CS_PLATFORM: &str = "cs_platform";

const REFERENCE_COLUMNS: &str = "id, identifier, label, created_at, updated_at";
const PAY_ACCOUNT_COLUMNS: &str =
  "id, identifier, label, ac_type, in_use, created_at, updated_at";
const TAG_COLUMNS: &str = "id, identifier, label, superior, created_at, updated_at";
const RECORD_COLUMNS: &str = "id, pay_platform, pay_method, pay_account, cs_sum, \
                              cs_date, cs_platform, created_at, updated_at";

// ─── Row mapping ─────────────────────────────────────────────────────────────

fn reference_row(row: &Row<'_>) -> rusqlite::Result<RawReference> {
  Ok(RawReference {
    id:         row.get(0)?,
    identifier: row.get(1)?,
    label:      row.get(2)?,
    created_at: row.get(3)?,
    updated_at: row.get(4)?,
  })
}

fn pay_account_row(row: &Row<'_>) -> rusqlite::Result<RawPayAccount> {
  Ok(RawPayAccount {
    id:           row.get(0)?,
    identifier:   row.get(1)?,
    label:        row.get(2)?,
    account_type: row.get(3)?,
    in_use:       row.get(4)?,
    created_at:   row.get(5)?,
    updated_at:   row.get(6)?,
  })
}

fn tag_row(row: &Row<'_>) -> rusqlite::Result<RawTag> {
  Ok(RawTag {
    id:         row.get(0)?,
    identifier: row.get(1)?,
    label:      row.get(2)?,
    superior:   row.get(3)?,
    created_at: row.get(4)?,
    updated_at: row.get(5)?,
  })
}

/// A bare `cs_record` row; reference columns are still ids.
struct RecordRow {
  id:               i64,
  pay_platform:     Option<i64>,
  pay_method:       Option<i64>,
  pay_account:      Option<i64>,
  sum:              String,
  consume_date:     Option<String>,
  consume_platform: Option<i64>,
  created_at:       String,
  updated_at:       String,
}

fn record_row(row: &Row<'_>) -> rusqlite::Result<RecordRow> {
  Ok(RecordRow {
    id:               row.get(0)?,
    pay_platform:     row.get(1)?,
    pay_method:       row.get(2)?,
    pay_account:      row.get(3)?,
    sum:              row.get(4)?,
    consume_date:     row.get(5)?,
    consume_platform: row.get(6)?,
    created_at:       row.get(7)?,
    updated_at:       row.get(8)?,
  })
}

// ─── Blocking queries (run inside `Connection::call`) ────────────────────────

fn query_reference(
  conn:  &Connection,
  table: &str,
  id:    i64,
) -> rusqlite::Result<Option<RawReference>> {
  conn
    .query_row(
      &format!("SELECT {REFERENCE_COLUMNS} FROM {table} WHERE id = ?1"),
      [id],
      reference_row,
    )
    .optional()
}

fn query_pay_account(conn: &Connection, id: i64) -> rusqlite::Result<Option<RawPayAccount>> {
  conn
    .query_row(
      &format!("SELECT {PAY_ACCOUNT_COLUMNS} FROM pay_account WHERE id = ?1"),
      [id],
      pay_account_row,
    )
    .optional()
}

fn query_tag(conn: &Connection, id: i64) -> rusqlite::Result<Option<RawTag>> {
  conn
    .query_row(
      &format!("SELECT {TAG_COLUMNS} FROM cs_tag WHERE id = ?1"),
      [id],
      tag_row,
    )
    .optional()
}

fn query_record_tags(conn: &Connection, record_id: i64) -> rusqlite::Result<Vec<RawTag>> {
  let mut stmt = conn.prepare(
    "SELECT t.id, t.identifier, t.label, t.superior, t.created_at, t.updated_at
     FROM cs_tag t
     JOIN cs_record_tags rt ON rt.tag_id = t.id
     WHERE rt.record_id = ?1
     ORDER BY t.id",
  )?;
  stmt.query_map([record_id], tag_row)?.collect()
}

/// Follow every reference column of `row`. Dangling ids load as absent.
fn load_record(conn: &Connection, row: RecordRow) -> rusqlite::Result<RawRecord> {
  let pay_platform = row
    .pay_platform
    .map(|id| query_reference(conn, PAY_PLATFORM, id))
    .transpose()?
    .flatten();
  let pay_method = row
    .pay_method
    .map(|id| query_reference(conn, PAY_METHOD, id))
    .transpose()?
    .flatten();
  let pay_account = row
    .pay_account
    .map(|id| query_pay_account(conn, id))
    .transpose()?
    .flatten();
  let consume_platform = row
    .consume_platform
    .map(|id| query_reference(conn, CS_PLATFORM, id))
    .transpose()?
    .flatten();
  let tags = query_record_tags(conn, row.id)?;

  Ok(RawRecord {
    id: row.id,
    sum: row.sum,
    consume_date: row.consume_date,
    created_at: row.created_at,
    updated_at: row.updated_at,
    pay_platform,
    pay_method,
    pay_account,
    consume_platform,
    tags,
  })
}

fn query_record(conn: &Connection, id: i64) -> rusqlite::Result<Option<RawRecord>> {
  let row = conn
    .query_row(
      &format!("SELECT {RECORD_COLUMNS} FROM cs_record WHERE id = ?1"),
      [id],
      record_row,
    )
    .optional()?;
  row.map(|row| load_record(conn, row)).transpose()
}

fn query_all_records(conn: &Connection) -> rusqlite::Result<Vec<RawRecord>> {
  let mut stmt = conn.prepare(&format!("SELECT {RECORD_COLUMNS} FROM cs_record ORDER BY id"))?;
  let rows = stmt
    .query_map([], record_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  rows.into_iter().map(|row| load_record(conn, row)).collect()
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Recall store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Flat reference tables ─────────────────────────────────────────────────

  async fn fetch_reference(&self, table: &'static str, id: i64) -> Result<Option<RawReference>> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(query_reference(conn, table, id)?))
        .await?,
    )
  }

  async fn insert_reference(
    &self,
    table: &'static str,
    input: NewReference,
  ) -> Result<RawReference> {
    let now = encode_dt(Utc::now());

    Ok(
      self
        .conn
        .call(move |conn| {
          conn.execute(
            &format!(
              "INSERT INTO {table} (identifier, label, created_at, updated_at)
               VALUES (?1, ?2, ?3, ?3)"
            ),
            rusqlite::params![input.identifier, input.label, now],
          )?;
          let id = conn.last_insert_rowid();
          Ok(conn.query_row(
            &format!("SELECT {REFERENCE_COLUMNS} FROM {table} WHERE id = ?1"),
            [id],
            reference_row,
          )?)
        })
        .await?,
    )
  }

  async fn all_references(&self, table: &'static str) -> Result<Vec<RawReference>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          let mut stmt =
            conn.prepare(&format!("SELECT {REFERENCE_COLUMNS} FROM {table} ORDER BY id"))?;
          let rows = stmt
            .query_map([], reference_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }
}

// ─── ReferenceStore impl ─────────────────────────────────────────────────────

impl ReferenceStore for SqliteStore {
  type Error = Error;

  // ── Lookups ───────────────────────────────────────────────────────────────

  async fn get_pay_platform(&self, id: i64) -> Result<Option<PayPlatform>> {
    self
      .fetch_reference(PAY_PLATFORM, id)
      .await?
      .map(RawReference::into_pay_platform)
      .transpose()
  }

  async fn get_pay_method(&self, id: i64) -> Result<Option<PayMethod>> {
    self
      .fetch_reference(PAY_METHOD, id)
      .await?
      .map(RawReference::into_pay_method)
      .transpose()
  }

  async fn get_pay_account(&self, id: i64) -> Result<Option<PayAccount>> {
    let raw = self
      .conn
      .call(move |conn| Ok(query_pay_account(conn, id)?))
      .await?;
    raw.map(RawPayAccount::into_pay_account).transpose()
  }

  async fn get_consume_platform(&self, id: i64) -> Result<Option<ConsumePlatform>> {
    self
      .fetch_reference(CS_PLATFORM, id)
      .await?
      .map(RawReference::into_consume_platform)
      .transpose()
  }

  async fn get_tag(&self, id: i64) -> Result<Option<Tag>> {
    let raw = self.conn.call(move |conn| Ok(query_tag(conn, id)?)).await?;
    raw.map(RawTag::into_tag).transpose()
  }

  // ── Management ────────────────────────────────────────────────────────────

  async fn add_pay_platform(&self, input: NewReference) -> Result<PayPlatform> {
    self.insert_reference(PAY_PLATFORM, input).await?.into_pay_platform()
  }

  async fn add_pay_method(&self, input: NewReference) -> Result<PayMethod> {
    self.insert_reference(PAY_METHOD, input).await?.into_pay_method()
  }

  async fn add_pay_account(&self, input: NewPayAccount) -> Result<PayAccount> {
    let now = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO pay_account (identifier, label, ac_type, in_use, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
          rusqlite::params![
            input.identifier,
            input.label,
            input.account_type,
            input.in_use,
            now,
          ],
        )?;
        let id = conn.last_insert_rowid();
        Ok(conn.query_row(
          &format!("SELECT {PAY_ACCOUNT_COLUMNS} FROM pay_account WHERE id = ?1"),
          [id],
          pay_account_row,
        )?)
      })
      .await?;

    raw.into_pay_account()
  }

  async fn add_consume_platform(&self, input: NewReference) -> Result<ConsumePlatform> {
    self.insert_reference(CS_PLATFORM, input).await?.into_consume_platform()
  }

  async fn add_tag(&self, input: NewTag) -> Result<Tag> {
    let now = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO cs_tag (identifier, label, superior, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?4)",
          rusqlite::params![input.identifier, input.label, input.superior, now],
        )?;
        let id = conn.last_insert_rowid();
        Ok(conn.query_row(
          &format!("SELECT {TAG_COLUMNS} FROM cs_tag WHERE id = ?1"),
          [id],
          tag_row,
        )?)
      })
      .await?;

    raw.into_tag()
  }

  async fn list_pay_platforms(&self) -> Result<Vec<PayPlatform>> {
    self
      .all_references(PAY_PLATFORM)
      .await?
      .into_iter()
      .map(RawReference::into_pay_platform)
      .collect()
  }

  async fn list_pay_methods(&self) -> Result<Vec<PayMethod>> {
    self
      .all_references(PAY_METHOD)
      .await?
      .into_iter()
      .map(RawReference::into_pay_method)
      .collect()
  }

  async fn list_pay_accounts(&self) -> Result<Vec<PayAccount>> {
    let raws: Vec<RawPayAccount> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {PAY_ACCOUNT_COLUMNS} FROM pay_account ORDER BY id"))?;
        let rows = stmt
          .query_map([], pay_account_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPayAccount::into_pay_account).collect()
  }

  async fn list_consume_platforms(&self) -> Result<Vec<ConsumePlatform>> {
    self
      .all_references(CS_PLATFORM)
      .await?
      .into_iter()
      .map(RawReference::into_consume_platform)
      .collect()
  }

  async fn list_tags(&self) -> Result<Vec<Tag>> {
    let raws: Vec<RawTag> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!("SELECT {TAG_COLUMNS} FROM cs_tag ORDER BY id"))?;
        let rows = stmt
          .query_map([], tag_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTag::into_tag).collect()
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  async fn get_record(&self, id: i64) -> Result<Option<ConsumeRecord>> {
    let raw = self.conn.call(move |conn| Ok(query_record(conn, id)?)).await?;
    raw.map(RawRecord::into_record).transpose()
  }

  async fn save_record(&self, record: ConsumeRecord) -> Result<ConsumeRecord> {
    let existing_id      = record.id;
    let pay_platform     = record.pay_platform.as_ref().map(|p| p.id);
    let pay_method       = record.pay_method.as_ref().map(|m| m.id);
    let pay_account      = record.pay_account.as_ref().map(|a| a.id);
    let consume_platform = record.consume_platform.as_ref().map(|p| p.id);
    let sum_str          = encode_decimal(record.sum);
    let date_str         = record.consume_date.map(encode_date);
    let tag_ids          = record.tag_ids();
    let now_str          = encode_dt(Utc::now());

    let (id, raw) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let id = match existing_id {
          None => {
            tx.execute(
              "INSERT INTO cs_record (
                 pay_platform, pay_method, pay_account, cs_sum, cs_date,
                 cs_platform, created_at, updated_at
               ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
              rusqlite::params![
                pay_platform,
                pay_method,
                pay_account,
                sum_str,
                date_str,
                consume_platform,
                now_str,
              ],
            )?;
            tx.last_insert_rowid()
          }
          // Upsert keeps `created_at` of an existing row.
          Some(id) => {
            tx.execute(
              "INSERT INTO cs_record (
                 id, pay_platform, pay_method, pay_account, cs_sum, cs_date,
                 cs_platform, created_at, updated_at
               ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
               ON CONFLICT(id) DO UPDATE SET
                 pay_platform = excluded.pay_platform,
                 pay_method   = excluded.pay_method,
                 pay_account  = excluded.pay_account,
                 cs_sum       = excluded.cs_sum,
                 cs_date      = excluded.cs_date,
                 cs_platform  = excluded.cs_platform,
                 updated_at   = excluded.updated_at",
              rusqlite::params![
                id,
                pay_platform,
                pay_method,
                pay_account,
                sum_str,
                date_str,
                consume_platform,
                now_str,
              ],
            )?;
            id
          }
        };

        tx.execute("DELETE FROM cs_record_tags WHERE record_id = ?1", [id])?;
        {
          let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO cs_record_tags (record_id, tag_id) VALUES (?1, ?2)",
          )?;
          for tag_id in &tag_ids {
            stmt.execute(rusqlite::params![id, tag_id])?;
          }
        }
        tx.commit()?;

        Ok((id, query_record(conn, id)?))
      })
      .await?;

    raw.ok_or(Error::Vanished(id))?.into_record()
  }

  async fn delete_records(&self, ids: Vec<i64>) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        for id in &ids {
          tx.execute("DELETE FROM cs_record WHERE id = ?1", [id])?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_records(&self) -> Result<Vec<ConsumeRecord>> {
    let raws = self.conn.call(|conn| Ok(query_all_records(conn)?)).await?;
    raws.into_iter().map(RawRecord::into_record).collect()
  }
}
