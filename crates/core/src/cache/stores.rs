//! SQLite-backed cache stores.
//!
//! Implements [`CacheStorage`] for [`CacheDb`]. Entries are keyed by
//! `(store, request key)` and upserted, so repeated writes overwrite.

use super::CacheStorage;
use super::connection::CacheDb;
use super::hash::request_key;
use crate::Error;
use crate::request::RequestDescriptor;
use crate::response::ResponseDescriptor;
use bytes::Bytes;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// Raw entry columns: status, status text, headers json, body.
type EntryRow = (i64, String, String, Vec<u8>);

/// Owned copy of one entry write, movable into the connection thread.
struct EntryWrite {
    key: String,
    method: String,
    url: String,
    status: u16,
    status_text: String,
    headers_json: String,
    body: Bytes,
}

impl EntryWrite {
    fn new(request: &RequestDescriptor, response: &ResponseDescriptor) -> Result<Self, Error> {
        request.ensure_cacheable()?;
        Ok(Self {
            key: request_key(request),
            method: request.method.clone(),
            url: request.cache_url(),
            status: response.status,
            status_text: response.status_text.clone(),
            headers_json: serde_json::to_string(&response.headers)?,
            body: response.body.clone(),
        })
    }
}

fn ensure_store(conn: &rusqlite::Connection, name: &str) -> Result<(), Error> {
    conn.execute(
        "INSERT OR IGNORE INTO cache_stores (name, created_at) VALUES (?1, ?2)",
        params![name, chrono::Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

fn upsert_entry(conn: &rusqlite::Connection, store: &str, entry: &EntryWrite) -> Result<(), Error> {
    conn.execute(
        "INSERT INTO cache_entries (
            store, key, method, url, status, status_text, headers_json, body, stored_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        ON CONFLICT(store, key) DO UPDATE SET
            method = excluded.method,
            url = excluded.url,
            status = excluded.status,
            status_text = excluded.status_text,
            headers_json = excluded.headers_json,
            body = excluded.body,
            stored_at = excluded.stored_at",
        params![
            store,
            &entry.key,
            &entry.method,
            &entry.url,
            entry.status as i64,
            &entry.status_text,
            &entry.headers_json,
            &entry.body[..],
            chrono::Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

fn decode(row: EntryRow) -> Result<ResponseDescriptor, Error> {
    let (status, status_text, headers_json, body) = row;
    let status = u16::try_from(status).map_err(|_| Error::InvalidInput(format!("stored status {status}")))?;
    Ok(ResponseDescriptor { status, status_text, headers: serde_json::from_str(&headers_json)?, body: Bytes::from(body) })
}

fn query_entry(
    conn: &rusqlite::Connection, sql: &str, params: impl rusqlite::Params,
) -> Result<Option<ResponseDescriptor>, Error> {
    let result = conn.query_row(sql, params, |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?, row.get::<_, Vec<u8>>(3)?))
    });

    match result {
        Ok(row) => decode(row).map(Some),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[async_trait::async_trait]
impl CacheStorage for CacheDb {
    async fn open(&self, name: &str) -> Result<(), Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<(), Error> { ensure_store(conn, &name) })
            .await
            .map_err(Error::from)
    }

    async fn keys(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT name FROM cache_stores ORDER BY id ASC")?;
                let names = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    async fn delete(&self, name: &str) -> Result<bool, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let tx = conn.transaction()?;
                tx.execute("DELETE FROM cache_entries WHERE store = ?1", params![&name])?;
                let deleted = tx.execute("DELETE FROM cache_stores WHERE name = ?1", params![&name])?;
                tx.commit()?;
                Ok(deleted > 0)
            })
            .await
            .map_err(Error::from)
    }

    async fn match_in(&self, name: &str, request: &RequestDescriptor) -> Result<Option<ResponseDescriptor>, Error> {
        let name = name.to_string();
        let key = request_key(request);
        self.conn
            .call(move |conn| -> Result<Option<ResponseDescriptor>, Error> {
                query_entry(
                    conn,
                    "SELECT status, status_text, headers_json, body
                     FROM cache_entries WHERE store = ?1 AND key = ?2",
                    params![name, key],
                )
            })
            .await
            .map_err(Error::from)
    }

    async fn match_any(&self, request: &RequestDescriptor) -> Result<Option<ResponseDescriptor>, Error> {
        let key = request_key(request);
        self.conn
            .call(move |conn| -> Result<Option<ResponseDescriptor>, Error> {
                query_entry(
                    conn,
                    "SELECT e.status, e.status_text, e.headers_json, e.body
                     FROM cache_entries e JOIN cache_stores s ON s.name = e.store
                     WHERE e.key = ?1
                     ORDER BY s.id ASC LIMIT 1",
                    params![key],
                )
            })
            .await
            .map_err(Error::from)
    }

    async fn put(&self, name: &str, request: &RequestDescriptor, response: &ResponseDescriptor) -> Result<(), Error> {
        let name = name.to_string();
        let entry = EntryWrite::new(request, response)?;
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                ensure_store(&tx, &name)?;
                upsert_entry(&tx, &name, &entry)?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn add_all(&self, name: &str, entries: &[(RequestDescriptor, ResponseDescriptor)]) -> Result<(), Error> {
        let name = name.to_string();
        let writes = entries
            .iter()
            .map(|(req, resp)| EntryWrite::new(req, resp))
            .collect::<Result<Vec<_>, _>>()?;
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                ensure_store(&tx, &name)?;
                for entry in &writes {
                    upsert_entry(&tx, &name, entry)?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn entry_count(&self, name: &str) -> Result<usize, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<usize, Error> {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM cache_entries WHERE store = ?1", params![name], |row| {
                        row.get(0)
                    })?;
                Ok(count as usize)
            })
            .await
            .map_err(Error::from)
    }
}
