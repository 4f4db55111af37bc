use ledgertodo_core::ledger::migrations::latest_version;
use ledgertodo_core::{
    open_ledger, open_ledger_in_memory, LedgerClient, LedgerError, MAX_RECORD_SIZE,
};
use ledgertodo_core::{derive_address, StorageAddress};
use rusqlite::Connection;

fn test_address(label: &str) -> StorageAddress {
    derive_address(b"lifecycle_test", &[label.as_bytes()])
}

#[test]
fn open_ledger_in_memory_applies_all_migrations() {
    let conn = open_ledger_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "records");
}

#[test]
fn opening_same_ledger_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledgertodo.sqlite3");

    let conn_first = open_ledger(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_ledger(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "records");
}

#[test]
fn opening_ledger_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_ledger(&path).unwrap_err();
    match err {
        LedgerError::UnsupportedSchemaVersion {
            ledger_version,
            latest_supported,
        } => {
            assert_eq!(ledger_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn create_read_round_trip() {
    let conn = open_ledger_in_memory().unwrap();
    let ledger = LedgerClient::new(&conn);
    let address = test_address("round-trip");

    let meta = ledger.create_record(&address, b"payload", 16).unwrap();
    assert_eq!(meta.capacity, 16);

    let stored = ledger.read_record(&address).unwrap().unwrap();
    assert_eq!(stored.payload, b"payload");
    assert_eq!(stored.capacity, 16);
    assert_eq!(stored.deposit, meta.deposit);
}

#[test]
fn create_on_materialized_address_fails() {
    let conn = open_ledger_in_memory().unwrap();
    let ledger = LedgerClient::new(&conn);
    let address = test_address("double-create");

    ledger.create_record(&address, b"a", 1).unwrap();
    let err = ledger.create_record(&address, b"b", 1).unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyExists(found) if found == address));
}

#[test]
fn write_respects_the_allocation() {
    let conn = open_ledger_in_memory().unwrap();
    let ledger = LedgerClient::new(&conn);
    let address = test_address("write-bounds");

    ledger.create_record(&address, b"ab", 4).unwrap();
    ledger.write_record(&address, b"abcd").unwrap();

    let err = ledger.write_record(&address, b"abcde").unwrap_err();
    assert!(matches!(
        err,
        LedgerError::CapacityExceeded {
            needed: 5,
            capacity: 4
        }
    ));

    // The oversized write left the record untouched.
    let stored = ledger.read_record(&address).unwrap().unwrap();
    assert_eq!(stored.payload, b"abcd");
}

#[test]
fn grow_charges_the_marginal_deposit_and_close_refunds_everything() {
    let conn = open_ledger_in_memory().unwrap();
    let ledger = LedgerClient::new(&conn);
    let address = test_address("deposit-symmetry");

    let created = ledger.create_record(&address, b"ab", 2).unwrap();
    let grown = ledger.grow_record(&address, 10).unwrap();
    assert_eq!(grown.capacity, 10);
    assert!(grown.deposit > created.deposit);

    let refunded = ledger.close_record(&address).unwrap();
    assert_eq!(refunded, grown.deposit);
}

#[test]
fn grow_is_a_no_op_at_or_below_current_capacity() {
    let conn = open_ledger_in_memory().unwrap();
    let ledger = LedgerClient::new(&conn);
    let address = test_address("grow-no-op");

    let created = ledger.create_record(&address, b"ab", 8).unwrap();
    let unchanged = ledger.grow_record(&address, 4).unwrap();
    assert_eq!(unchanged.capacity, 8);
    assert_eq!(unchanged.deposit, created.deposit);
}

#[test]
fn growth_beyond_the_ceiling_is_denied() {
    let conn = open_ledger_in_memory().unwrap();
    let ledger = LedgerClient::new(&conn);
    let address = test_address("growth-denied");

    ledger.create_record(&address, b"ab", 2).unwrap();
    let err = ledger.grow_record(&address, MAX_RECORD_SIZE + 1).unwrap_err();
    assert!(matches!(err, LedgerError::GrowthDenied { .. }));

    let oversized = test_address("oversized-create");
    let err = ledger
        .create_record(&oversized, b"ab", MAX_RECORD_SIZE + 1)
        .unwrap_err();
    assert!(matches!(err, LedgerError::GrowthDenied { .. }));
}

#[test]
fn closed_addresses_read_like_never_created_ones() {
    let conn = open_ledger_in_memory().unwrap();
    let ledger = LedgerClient::new(&conn);
    let address = test_address("close");

    ledger.create_record(&address, b"ab", 2).unwrap();
    ledger.close_record(&address).unwrap();

    assert!(ledger.read_record(&address).unwrap().is_none());
    assert!(!ledger.record_exists(&address).unwrap());

    let err = ledger.close_record(&address).unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(found) if found == address));
}

#[test]
fn records_survive_a_reopen_of_the_ledger_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("persist.sqlite3");
    let address = test_address("persist");

    {
        let conn = open_ledger(&path).unwrap();
        LedgerClient::new(&conn)
            .create_record(&address, b"durable", 16)
            .unwrap();
    }

    let conn = open_ledger(&path).unwrap();
    let stored = LedgerClient::new(&conn)
        .read_record(&address)
        .unwrap()
        .unwrap();
    assert_eq!(stored.payload, b"durable");
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
