//! Integration tests for litedao with a MySQL testcontainer
//!
//! These tests run the session against a real MySQL server: literal
//! escaping, type decoding over the text protocol, commit-then-close and
//! deferred transactions.
//!
//! They need a Docker daemon and are ignored by default; run them with
//! `cargo test -p litedao-tests -- --ignored`.
//!
//! One container serves the whole binary. `get_db_url` starts it on first
//! use behind a `OnceLock`, on a dedicated thread with its own runtime, and
//! loads the schema before handing out the URL. Tests run one at a time with
//! `serial_test` and empty every table before they start.
//!
//! The container thread polls a shutdown flag that a `shutdown_hooks` exit
//! hook raises; dropping the container there stops it. On Ctrl+C the
//! `watchdog` feature removes it instead.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use std::thread;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use common::init_tracing;
use litedao::{FieldSource, FromRow, Record, Session, Value, WriteOptions};
use rust_decimal::Decimal;
use serial_test::serial;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::mysql::Mysql;

// Holds the connection URL (container lives in the thread)
static DB_URL: OnceLock<String> = OnceLock::new();
// Flag to signal the container thread to exit
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

const SCHEMA: &str = r#"
CREATE TABLE users (
    id BIGINT AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    nickname VARCHAR(100) NULL,
    active TINYINT(1) NOT NULL DEFAULT 1,
    born DATE NULL,
    last_login DATETIME NULL,
    balance DECIMAL(10, 2) NOT NULL DEFAULT 0,
    prefs JSON NULL
);
CREATE TABLE products (
    sku VARCHAR(32) PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    stock INT UNSIGNED NOT NULL
);
"#;

const ALL_TABLES: &[&str] = &["users", "products"];

/// Cleanup function called on process exit.
/// Signals the container thread to stop and waits for it to finish.
extern "C" fn cleanup_on_exit() {
    SHUTDOWN.store(true, Ordering::SeqCst);
    // Give the container thread time to clean up
    std::thread::sleep(Duration::from_millis(500));
}

fn start_container() -> String {
    shutdown_hooks::add_shutdown_hook(cleanup_on_exit);

    let (ready_tx, ready_rx) = std::sync::mpsc::channel();

    // The container lives inside this thread with its own runtime, so it
    // outlives every test's runtime and is dropped when the thread exits.
    thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let container: ContainerAsync<Mysql> = Mysql::default().start().await.unwrap();
            let port = container.get_host_port_ipv4(3306).await.unwrap();
            let url = format!("mysql://root@127.0.0.1:{}/test", port);

            let mut session = Session::from_url(&url).unwrap();
            for stmt in SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty()) {
                session.sql(stmt).await.unwrap();
            }
            session.close().await.unwrap();

            ready_tx.send(url).unwrap();

            while !SHUTDOWN.load(Ordering::Relaxed) {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        });
    });

    ready_rx.recv().unwrap()
}

fn get_db_url() -> &'static str {
    DB_URL.get_or_init(start_container)
}

async fn fresh_session() -> anyhow::Result<Session> {
    init_tracing();
    let mut session = Session::from_url(get_db_url())?;
    for table in ALL_TABLES {
        session.delete(table, None, WriteOptions::deferred()).await?;
    }
    session.commit().await?;
    session.close().await?;
    Ok(session)
}

#[derive(Debug, FieldSource)]
struct NewUser {
    name: String,
    nickname: Option<String>,
    active: bool,
    born: Option<NaiveDate>,
    last_login: Option<NaiveDateTime>,
    balance: Decimal,
}

#[derive(Debug, PartialEq, FromRow)]
struct User {
    id: i64,
    name: String,
    nickname: Option<String>,
    active: bool,
    born: Option<NaiveDate>,
    last_login: Option<NaiveDateTime>,
    balance: Decimal,
}

fn new_user(name: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        nickname: None,
        active: true,
        born: NaiveDate::from_ymd_opt(1990, 5, 17),
        last_login: NaiveDate::from_ymd_opt(2024, 3, 1).and_then(|d| d.and_hms_opt(9, 30, 0)),
        balance: Decimal::new(1999, 2),
    }
}

// ============ CRUD Tests ============

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn test_insert_with_id_and_read_back() {
    let mut session = fresh_session().await.unwrap();

    let id = session
        .insert("users", &new_user("O'Brien"), WriteOptions::new().get_id(true))
        .await
        .unwrap()
        .unwrap();
    assert!(id > 0);
    assert!(session.is_closed());

    let user: User = session
        .select_unique_as(format!("* FROM users WHERE id = {}", id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.name, "O'Brien");
    assert_eq!(user.nickname, None);
    assert!(user.active);
    assert_eq!(user.born, NaiveDate::from_ymd_opt(1990, 5, 17));
    assert_eq!(
        user.last_login,
        NaiveDate::from_ymd_opt(2024, 3, 1).and_then(|d| d.and_hms_opt(9, 30, 0))
    );
    assert_eq!(user.balance, Decimal::new(1999, 2));
}

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn test_update_and_delete() {
    let mut session = fresh_session().await.unwrap();

    for name in ["ann", "bob", "cid"] {
        session
            .insert("users", &new_user(name), WriteOptions::default())
            .await
            .unwrap();
    }

    let updated = session
        .update(
            "users",
            &[("nickname", "bobby"), ("active", "0")],
            Some("name = 'bob'"),
            WriteOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(updated, 1);

    let bob: User = session
        .select_unique_as("* FROM users WHERE name = 'bob'")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bob.nickname.as_deref(), Some("bobby"));
    assert!(!bob.active);

    let deleted = session
        .delete("users", Some("active = 1"), WriteOptions::default())
        .await
        .unwrap();
    assert_eq!(deleted, 2);

    let remaining = session.select("name FROM users").await.unwrap();
    assert_eq!(remaining.len(), 1);
}

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn test_insert_many_and_count() {
    let mut session = fresh_session().await.unwrap();

    let products: Vec<Record> = (1..=3)
        .map(|i| {
            [
                ("sku".to_string(), Value::from(format!("SKU-{}", i))),
                ("name".to_string(), Value::from(format!("Product {}", i))),
                ("stock".to_string(), Value::U32(i * 10)),
            ]
            .into_iter()
            .collect()
        })
        .collect();

    let affected = session
        .insert_many("products", &products, WriteOptions::default())
        .await
        .unwrap();
    assert_eq!(affected, 3);

    let count = session
        .select_unique("COUNT(*) AS n FROM products")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(count.get::<i64>("n").unwrap(), 3);

    let top = session
        .select_unique("stock FROM products ORDER BY stock DESC")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(top.get_value("stock").unwrap(), &Value::U64(30));
}

// ============ Transaction Tests ============

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn test_deferred_insert_rolls_back() {
    let mut session = fresh_session().await.unwrap();

    session
        .insert("users", &new_user("ghost"), WriteOptions::deferred())
        .await
        .unwrap();
    assert!(!session
        .is_empty("users", Some("id"), Some("name = 'ghost'"))
        .await
        .unwrap());

    session.rollback().await.unwrap();
    session.close().await.unwrap();

    assert!(session
        .is_empty("users", Some("id"), Some("name = 'ghost'"))
        .await
        .unwrap());
}

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn test_uncommitted_write_is_invisible_to_other_sessions() {
    let mut writer = fresh_session().await.unwrap();
    let mut reader = Session::from_url(get_db_url()).unwrap();

    writer
        .insert("users", &new_user("pending"), WriteOptions::deferred())
        .await
        .unwrap();
    assert!(reader.is_empty("users", None, None).await.unwrap());
    reader.close().await.unwrap();

    writer.commit().await.unwrap();
    assert!(!reader.is_empty("users", None, None).await.unwrap());
}

// ============ Type Tests ============

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn test_json_column_and_row_json() {
    let mut session = fresh_session().await.unwrap();

    let prefs = serde_json::json!({ "theme": "dark", "quote": "it's" });
    session
        .insert(
            "users",
            &[("name", Value::from("jay")), ("prefs", Value::Json(prefs.clone()))],
            WriteOptions::default(),
        )
        .await
        .unwrap();

    let row = session
        .select_unique("name, prefs, nickname FROM users")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.get::<serde_json::Value>("prefs").unwrap(), prefs);
    assert_eq!(
        row.to_json(),
        serde_json::json!({ "name": "jay", "prefs": prefs, "nickname": null })
    );
}

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn test_raw_sql_cursor() {
    let mut session = fresh_session().await.unwrap();

    let mut cursor = session.sql("SELECT 1 AS a, 'x' AS b UNION ALL SELECT 2, 'y'").await.unwrap();
    assert_eq!(cursor.column_names(), ["a", "b"]);
    let rows = cursor.fetch_all();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].get::<i64>("a").unwrap(), 2);
    assert_eq!(rows[1].get::<String>("b").unwrap(), "y");
}
