use pretty_assertions::assert_eq;
use quarry_core::Schema;
use quarry_sql::{IsolationLevel, Serializer, Transaction};

fn start(isolation: Option<IsolationLevel>, read_only: bool) -> Transaction {
    Transaction::Start {
        isolation,
        read_only,
    }
}

#[test]
fn postgresql_transactions() {
    let schema = Schema::default();
    let s = Serializer::postgresql(&schema);

    assert_eq!(
        s.serialize_transaction(&start(Some(IsolationLevel::Serializable), true))
            .unwrap(),
        "BEGIN ISOLATION LEVEL SERIALIZABLE READ ONLY"
    );
    assert_eq!(s.serialize_transaction(&Transaction::Commit).unwrap(), "COMMIT");
    assert_eq!(
        s.serialize_transaction(&Transaction::Savepoint(2)).unwrap(),
        "SAVEPOINT sp_2"
    );
    assert_eq!(
        s.serialize_transaction(&Transaction::ReleaseSavepoint(2))
            .unwrap(),
        "RELEASE SAVEPOINT sp_2"
    );
    assert_eq!(
        s.serialize_transaction(&Transaction::RollbackToSavepoint(2))
            .unwrap(),
        "ROLLBACK TO SAVEPOINT sp_2"
    );
}

#[test]
fn sqlite_ignores_options() {
    let schema = Schema::default();
    let s = Serializer::sqlite(&schema);

    assert_eq!(
        s.serialize_transaction(&start(Some(IsolationLevel::ReadCommitted), true))
            .unwrap(),
        "BEGIN"
    );
    assert_eq!(
        s.serialize_transaction(&Transaction::Rollback).unwrap(),
        "ROLLBACK"
    );
}

#[test]
fn sql_server_transactions() {
    let schema = Schema::default();
    let s = Serializer::sql_server(&schema);

    assert_eq!(
        s.serialize_transaction(&start(Some(IsolationLevel::RepeatableRead), false))
            .unwrap(),
        "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ; BEGIN TRANSACTION"
    );
    assert_eq!(
        s.serialize_transaction(&Transaction::Savepoint(0)).unwrap(),
        "SAVE TRANSACTION sp_0"
    );
    assert_eq!(
        s.serialize_transaction(&Transaction::RollbackToSavepoint(0))
            .unwrap(),
        "ROLLBACK TRANSACTION sp_0"
    );

    assert!(s
        .serialize_transaction(&start(None, true))
        .unwrap_err()
        .is_unsupported_feature());
    assert!(s
        .serialize_transaction(&Transaction::ReleaseSavepoint(0))
        .unwrap_err()
        .is_unsupported_feature());
}

#[test]
fn sqlite_accepts_its_own_transaction_sql() {
    let schema = Schema::default();
    let s = Serializer::sqlite(&schema);
    let conn = rusqlite::Connection::open_in_memory().unwrap();

    for op in [
        start(None, false),
        Transaction::Savepoint(1),
        Transaction::RollbackToSavepoint(1),
        Transaction::ReleaseSavepoint(1),
        Transaction::Commit,
    ] {
        conn.execute_batch(&s.serialize_transaction(&op).unwrap())
            .unwrap();
    }
}
