//! MySQL connector and connection

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::traits::{Connection, Connector, ResultSet};
use async_trait::async_trait;
use mysql_async::prelude::*;
use mysql_async::Row as MySqlAsyncRow;
use tracing::{debug, info};

use super::row::{column_names, decode_row};

/// Opens [`MySqlConnection`]s with `mysql_async`.
///
/// Each call to [`connect`](Connector::connect) opens one fresh physical
/// connection; nothing is pooled.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlConnector;

/// A single live MySQL connection.
///
/// This wraps `mysql_async::Conn` and runs every statement over the text
/// protocol, since values are already inlined as literals.
pub struct MySqlConnection {
    inner: mysql_async::Conn,
}

impl MySqlConnection {
    /// Get a reference to the underlying mysql_async connection.
    pub fn inner(&self) -> &mysql_async::Conn {
        &self.inner
    }

    /// Get a mutable reference to the underlying mysql_async connection.
    pub fn inner_mut(&mut self) -> &mut mysql_async::Conn {
        &mut self.inner
    }
}

/// Build mysql_async options from a session config.
pub(crate) fn to_mysql_opts(config: &SessionConfig) -> Result<mysql_async::OptsBuilder> {
    config.validate()?;
    let options = &config.options;

    let mut init = Vec::with_capacity(options.init.len() + 1);
    if !options.autocommit {
        init.push("SET autocommit=0".to_string());
    }
    init.extend(options.init.iter().cloned());

    let mut builder = mysql_async::OptsBuilder::default()
        .ip_or_hostname(config.host.clone())
        .tcp_port(config.port)
        .user(Some(config.user.clone()))
        .pass(Some(config.password.clone()))
        .db_name(Some(config.database.clone()))
        .init(init)
        .socket(options.socket.clone())
        .tcp_nodelay(options.tcp_nodelay)
        .tcp_keepalive(options.tcp_keepalive_ms)
        .wait_timeout(options.wait_timeout);

    if let Some(prefer_socket) = options.prefer_socket {
        builder = builder.prefer_socket(prefer_socket);
    }

    if options.ssl {
        builder = builder.ssl_opts(Some(mysql_async::SslOpts::default()));
    }

    Ok(builder)
}

#[async_trait]
impl Connector for MySqlConnector {
    type Connection = MySqlConnection;

    async fn connect(&self, config: &SessionConfig) -> Result<MySqlConnection> {
        let opts = to_mysql_opts(config)?;
        let inner = mysql_async::Conn::new(opts).await?;
        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            connection_id = inner.id(),
            "Connected to MySQL"
        );
        Ok(MySqlConnection { inner })
    }
}

#[async_trait]
impl Connection for MySqlConnection {
    async fn query(&mut self, sql: &str) -> Result<ResultSet> {
        let rows: Vec<MySqlAsyncRow> = self.inner.query(sql).await?;

        // Get affected rows and last insert id from connection
        let rows_affected = self.inner.affected_rows();
        let last_insert_id = self.inner.last_insert_id();

        let columns = rows.first().map(column_names).unwrap_or_default();
        let rows = rows
            .into_iter()
            .map(decode_row)
            .collect::<Result<Vec<_>>>()?;

        Ok(ResultSet {
            columns,
            rows,
            rows_affected,
            last_insert_id,
        })
    }

    async fn commit(&mut self) -> Result<()> {
        self.inner.query_drop("COMMIT").await?;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        self.inner.query_drop("ROLLBACK").await?;
        Ok(())
    }

    async fn close(self) -> Result<()> {
        let id = self.inner.id();
        self.inner.disconnect().await.map_err(Error::from)?;
        debug!(connection_id = id, "Disconnected from MySQL");
        Ok(())
    }
}
