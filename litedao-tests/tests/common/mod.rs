//! Scripted in-memory connector shared by the session tests
//!
//! Every statement a session sends is recorded in a [`Journal`]. Results are
//! served from a FIFO script; once the script runs dry each statement gets an
//! empty result set.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use litedao::{Connection, Connector, ResultSet, Row, SessionConfig};

/// What the connector observed.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    pub statements: Vec<String>,
    pub opens: usize,
    pub closes: usize,
    pub commits: usize,
    pub rollbacks: usize,
}

#[derive(Clone, Default)]
pub struct ScriptedConnector {
    journal: Arc<Mutex<Journal>>,
    script: Arc<Mutex<VecDeque<ResultSet>>>,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next unscripted statement.
    pub fn respond(&self, result: ResultSet) -> &Self {
        self.script.lock().unwrap().push_back(result);
        self
    }

    pub fn respond_rows(&self, rows: Vec<Row>) -> &Self {
        let columns = rows
            .first()
            .map(|r| r.columns().map(String::from).collect())
            .unwrap_or_default();
        self.respond(ResultSet {
            columns,
            rows,
            ..Default::default()
        })
    }

    pub fn respond_affected(&self, rows_affected: u64) -> &Self {
        self.respond(ResultSet {
            rows_affected,
            ..Default::default()
        })
    }

    pub fn journal(&self) -> Journal {
        self.journal.lock().unwrap().clone()
    }

    pub fn statements(&self) -> Vec<String> {
        self.journal().statements
    }
}

pub struct ScriptedConnection {
    journal: Arc<Mutex<Journal>>,
    script: Arc<Mutex<VecDeque<ResultSet>>>,
}

#[async_trait]
impl Connector for ScriptedConnector {
    type Connection = ScriptedConnection;

    async fn connect(&self, _config: &SessionConfig) -> litedao::Result<ScriptedConnection> {
        self.journal.lock().unwrap().opens += 1;
        Ok(ScriptedConnection {
            journal: Arc::clone(&self.journal),
            script: Arc::clone(&self.script),
        })
    }
}

#[async_trait]
impl Connection for ScriptedConnection {
    async fn query(&mut self, sql: &str) -> litedao::Result<ResultSet> {
        self.journal.lock().unwrap().statements.push(sql.to_string());
        Ok(self.script.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn commit(&mut self) -> litedao::Result<()> {
        self.journal.lock().unwrap().commits += 1;
        Ok(())
    }

    async fn rollback(&mut self) -> litedao::Result<()> {
        self.journal.lock().unwrap().rollbacks += 1;
        Ok(())
    }

    async fn close(self) -> litedao::Result<()> {
        self.journal.lock().unwrap().closes += 1;
        Ok(())
    }
}

pub fn test_config() -> SessionConfig {
    SessionConfig::new("shop", "app", "secret")
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
