//! The single-connection session and its CRUD helpers

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::literal::Converter;
use crate::mysql::MySqlConnector;
use crate::row::Row;
use crate::serializer::{serialize_batch, serialize_record};
use crate::statement;
use crate::traits::{Connection, Connector, FieldSource, FromRow};

/// A session shared between tasks. The mutex serializes every call.
pub type SharedSession<K = MySqlConnector> = Arc<Mutex<Session<K>>>;

/// What a write does once its statement has run.
///
/// The default commits and then closes the session. This is the
/// transaction-boundary contract of every write helper: with `commit` set,
/// each call is its own transaction and the next operation transparently
/// opens a fresh connection. To group several writes into one transaction,
/// pass [`WriteOptions::deferred`] to all of them and finish with
/// [`Session::commit`] or [`Session::rollback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Commit and close after the statement
    pub commit: bool,
    /// Read back `LAST_INSERT_ID()` after an insert
    pub get_id: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            commit: true,
            get_id: false,
        }
    }
}

impl WriteOptions {
    /// Commit and close after the write.
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave the transaction open; the session stays connected.
    pub fn deferred() -> Self {
        Self {
            commit: false,
            get_id: false,
        }
    }

    /// Set whether to commit and close after the write.
    pub fn commit(mut self, commit: bool) -> Self {
        self.commit = commit;
        self
    }

    /// Set whether an insert returns the generated id.
    pub fn get_id(mut self, get_id: bool) -> Self {
        self.get_id = get_id;
        self
    }
}

/// Owns at most one database connection and runs CRUD helpers over it.
///
/// The session starts closed. Every operation first makes sure a connection
/// is open, opening one from the stored [`SessionConfig`] when needed. Writes
/// with [`WriteOptions::commit`] commit and then close the connection again.
///
/// All operations take `&mut self`, so calls on one session are serialized by
/// the borrow checker. To share a session between tasks, wrap it with
/// [`into_shared`](Self::into_shared) or give each task its own session.
///
/// # Example
///
/// ```ignore
/// use litedao::{Session, SessionConfig, Value, WriteOptions};
///
/// let mut session = Session::new(SessionConfig::new("shop", "app", "secret"));
///
/// let user = [("name", Value::from("O'Brien")), ("active", Value::from(true))];
/// let id = session
///     .insert("users", &user, WriteOptions::new().get_id(true))
///     .await?;
///
/// let row = session.select_unique("* FROM users WHERE id = 1").await?;
/// ```
pub struct Session<K: Connector = MySqlConnector> {
    config: SessionConfig,
    connector: K,
    converter: Option<Arc<dyn Converter>>,
    conn: Option<K::Connection>,
}

impl Session<MySqlConnector> {
    /// Create a closed MySQL session.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_connector(config, MySqlConnector)
    }

    /// Create a closed MySQL session from a `mysql://` URL.
    pub fn from_url(url: &str) -> Result<Self> {
        Ok(Self::new(SessionConfig::from_url(url)?))
    }
}

impl<K: Connector> Session<K> {
    /// Create a closed session that opens connections through `connector`.
    pub fn with_connector(config: SessionConfig, connector: K) -> Self {
        Self {
            config,
            connector,
            converter: None,
            conn: None,
        }
    }

    /// Override the value → literal converter for inserts and updates.
    pub fn with_converter(mut self, converter: impl Converter + 'static) -> Self {
        self.converter = Some(Arc::new(converter));
        self
    }

    /// Wrap the session for use from several tasks.
    pub fn into_shared(self) -> SharedSession<K> {
        Arc::new(Mutex::new(self))
    }

    /// The connection parameters.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    /// Open the connection. No-op when already open.
    pub async fn open(&mut self) -> Result<()> {
        if self.conn.is_none() {
            debug!(database = %self.config.database, "Opening session");
            let conn = self.connector.connect(&self.config).await?;
            self.conn = Some(conn);
        }
        Ok(())
    }

    /// Release the connection. No-op when already closed.
    pub async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            debug!(database = %self.config.database, "Closing session");
            conn.close().await?;
        }
        Ok(())
    }

    async fn ensure_open(&mut self) -> Result<&mut K::Connection> {
        self.open().await?;
        self.conn
            .as_mut()
            .ok_or_else(|| Error::Connection("session has no connection after open".to_string()))
    }

    /// Get a cursor on the live connection, opening it first if needed.
    pub async fn get_cursor(&mut self) -> Result<Cursor<'_, K::Connection>> {
        let conn = self.ensure_open().await?;
        Ok(Cursor::new(conn))
    }

    /// Run `SELECT <fragment>` and return every row.
    ///
    /// `fragment` is everything after the `SELECT` keyword, e.g.
    /// `"* FROM users WHERE active = 1"`.
    pub async fn select(&mut self, fragment: impl AsRef<str>) -> Result<Vec<Row>> {
        self.select_as(fragment).await
    }

    /// Run `SELECT <fragment> LIMIT 1` and return the row, or `None` when
    /// nothing matches.
    pub async fn select_unique(&mut self, fragment: impl AsRef<str>) -> Result<Option<Row>> {
        self.select_unique_as(fragment).await
    }

    /// Like [`select`](Self::select), building an entity from each row.
    pub async fn select_as<T: FromRow>(&mut self, fragment: impl AsRef<str>) -> Result<Vec<T>> {
        let sql = statement::select(fragment.as_ref(), false);
        let mut cursor = self.get_cursor().await?;
        cursor.execute(&sql).await?;
        cursor.fetch_all().iter().map(T::from_row).collect()
    }

    /// Like [`select_unique`](Self::select_unique), building an entity from
    /// the row.
    pub async fn select_unique_as<T: FromRow>(
        &mut self,
        fragment: impl AsRef<str>,
    ) -> Result<Option<T>> {
        let sql = statement::select(fragment.as_ref(), true);
        let mut cursor = self.get_cursor().await?;
        cursor.execute(&sql).await?;
        cursor.fetch_one().as_ref().map(T::from_row).transpose()
    }

    /// Insert one record.
    ///
    /// Returns the generated id when `opts.get_id` is set, read with
    /// `SELECT LAST_INSERT_ID()` on the same connection before any commit.
    pub async fn insert<S: FieldSource + ?Sized>(
        &mut self,
        table: &str,
        data: &S,
        opts: WriteOptions,
    ) -> Result<Option<u64>> {
        let record = serialize_record(data, self.converter.as_deref())?;
        let sql = statement::insert(table, &record);

        let mut cursor = self.get_cursor().await?;
        cursor.execute(&sql).await?;

        let id = if opts.get_id {
            cursor.execute(statement::LAST_INSERT_ID).await?;
            match cursor.fetch_one() {
                Some(row) => Some(row.get::<u64>(statement::LAST_INSERT_ID_COLUMN)?),
                None => return Err(Error::Query("LAST_INSERT_ID() returned no row".to_string())),
            }
        } else {
            None
        };

        self.finish_write(opts).await?;
        Ok(id)
    }

    /// Insert a batch of records with one multi-row statement.
    ///
    /// Columns come from the first record and every record must carry the
    /// same non-null fields (see [`serialize_batch`]). An empty batch does
    /// nothing and returns 0. Returns the number of affected rows.
    pub async fn insert_many<S: FieldSource>(
        &mut self,
        table: &str,
        rows: &[S],
        opts: WriteOptions,
    ) -> Result<u64> {
        if rows.is_empty() {
            debug!(table, "Empty batch, nothing to insert");
            return Ok(0);
        }

        let batch = serialize_batch(rows, self.converter.as_deref())?;
        let sql = statement::insert_many(table, &batch);

        let mut cursor = self.get_cursor().await?;
        let affected = cursor.execute(&sql).await?;

        self.finish_write(opts).await?;
        Ok(affected)
    }

    /// Update rows matching `condition` with the record's non-null fields.
    ///
    /// A `None` or blank condition updates every row in the table. Returns
    /// the number of affected rows.
    pub async fn update<S: FieldSource + ?Sized>(
        &mut self,
        table: &str,
        data: &S,
        condition: Option<&str>,
        opts: WriteOptions,
    ) -> Result<u64> {
        let record = serialize_record(data, self.converter.as_deref())?;
        if record.is_empty() {
            return Err(Error::EmptyRecord(table.to_string()));
        }
        let sql = statement::update(table, &record, condition);

        let mut cursor = self.get_cursor().await?;
        let affected = cursor.execute(&sql).await?;

        self.finish_write(opts).await?;
        Ok(affected)
    }

    /// Delete rows matching `condition`.
    ///
    /// A `None` or blank condition deletes every row in the table. Returns
    /// the number of affected rows.
    pub async fn delete(
        &mut self,
        table: &str,
        condition: Option<&str>,
        opts: WriteOptions,
    ) -> Result<u64> {
        let sql = statement::delete(table, condition);

        let mut cursor = self.get_cursor().await?;
        let affected = cursor.execute(&sql).await?;

        self.finish_write(opts).await?;
        Ok(affected)
    }

    /// Execute arbitrary SQL and hand back the cursor to read its result.
    ///
    /// Nothing is fetched, committed or closed.
    pub async fn sql(&mut self, text: &str) -> Result<Cursor<'_, K::Connection>> {
        let mut cursor = self.get_cursor().await?;
        cursor.execute(text).await?;
        Ok(cursor)
    }

    /// Commit the open transaction. No-op when closed.
    pub async fn commit(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.as_mut() {
            debug!("Committing");
            conn.commit().await?;
        }
        Ok(())
    }

    /// Roll back the open transaction. No-op when closed.
    pub async fn rollback(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.as_mut() {
            debug!("Rolling back");
            conn.rollback().await?;
        }
        Ok(())
    }

    /// Whether no row of `table` matches `condition`.
    ///
    /// Probes with `SELECT <primary_key or *> ... LIMIT 1`.
    pub async fn is_empty(
        &mut self,
        table: &str,
        primary_key: Option<&str>,
        condition: Option<&str>,
    ) -> Result<bool> {
        let sql = statement::exists_probe(table, primary_key, condition);
        let mut cursor = self.get_cursor().await?;
        cursor.execute(&sql).await?;
        Ok(cursor.fetch_one().is_none())
    }

    async fn finish_write(&mut self, opts: WriteOptions) -> Result<()> {
        if opts.commit {
            self.commit().await?;
            self.close().await?;
            info!(database = %self.config.database, "Write committed, session closed");
        }
        Ok(())
    }
}
