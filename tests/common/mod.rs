//! Substitute store shared by the runner tests

#![allow(dead_code)]

use harbormaster::migration::{operation, FnOperation, SchemaManager};
use harbormaster::{Executor, StoreError};
use may_postgres::types::ToSql;
use may_postgres::Row;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Tracks which tables exist; records every statement
///
/// `CREATE TABLE <name>` and `DROP TABLE <name>` change the table set. Any statement
/// containing `FAIL` is rejected.
#[derive(Default)]
pub struct FakeStore {
    tables: RefCell<BTreeSet<String>>,
    statements: RefCell<Vec<String>>,
}

impl FakeStore {
    pub fn tables(&self) -> Vec<String> {
        self.tables.borrow().iter().cloned().collect()
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.borrow().clone()
    }

    pub fn statement_count(&self) -> usize {
        self.statements.borrow().len()
    }
}

impl Executor for FakeStore {
    fn execute(&self, query: &str, _params: &[&dyn ToSql]) -> Result<u64, StoreError> {
        self.statements.borrow_mut().push(query.to_string());
        if query.contains("FAIL") {
            return Err(StoreError::Query(format!("rejected: {query}")));
        }

        let words: Vec<&str> = query.split_whitespace().collect();
        match words.as_slice() {
            ["CREATE", "TABLE", name, ..] => {
                if !self.tables.borrow_mut().insert(name.to_string()) {
                    return Err(StoreError::Query(format!("relation \"{name}\" already exists")));
                }
            }
            ["DROP", "TABLE", name, ..] => {
                if !self.tables.borrow_mut().remove(*name) {
                    return Err(StoreError::Query(format!("table \"{name}\" does not exist")));
                }
            }
            _ => {}
        }
        Ok(0)
    }

    fn query_one(&self, _query: &str, _params: &[&dyn ToSql]) -> Result<Row, StoreError> {
        Err(StoreError::Other("not supported".to_string()))
    }

    fn query_all(&self, _query: &str, _params: &[&dyn ToSql]) -> Result<Vec<Row>, StoreError> {
        Ok(Vec::new())
    }
}

/// Shared call counter for an operation
#[derive(Clone, Default)]
pub struct Calls(Arc<AtomicUsize>);

impl Calls {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// An operation that runs `sql` and counts how often it was invoked
pub fn counted(
    sql: &'static str,
    calls: &Calls,
) -> FnOperation<impl Fn(&SchemaManager<'_>) -> Result<(), StoreError> + Send + Sync> {
    let calls = calls.clone();
    operation(move |manager: &SchemaManager<'_>| {
        calls.0.fetch_add(1, Ordering::SeqCst);
        manager.execute(sql, &[]).map(|_| ())
    })
}
