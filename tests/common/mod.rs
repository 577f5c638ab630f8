#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use snowflake_provider::sql::Row;
use snowflake_provider::{Client, SqlExecutor};
use std::sync::{Arc, Mutex};

enum Reply {
    Rows(Vec<Row>),
    Fail(String),
}

/// In-memory executor: records every statement and answers from canned replies.
///
/// Replies are matched by statement prefix; the most recently registered match wins.
/// Unmatched queries return no rows and unmatched statements succeed.
#[derive(Default)]
pub struct RecordingExecutor {
    statements: Mutex<Vec<String>>,
    replies: Mutex<Vec<(String, Reply)>>,
}

impl RecordingExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(RecordingExecutor::default())
    }

    pub fn respond(&self, prefix: &str, rows: Vec<Value>) {
        let rows = rows
            .into_iter()
            .map(|v| v.as_object().cloned().expect("row must be a JSON object"))
            .collect();
        self.replies.lock().unwrap().push((prefix.to_string(), Reply::Rows(rows)));
    }

    pub fn fail(&self, prefix: &str, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .push((prefix.to_string(), Reply::Fail(message.to_string())));
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }

    /// Statements other than `SHOW`.
    pub fn writes(&self) -> Vec<String> {
        self.statements()
            .into_iter()
            .filter(|s| !s.starts_with("SHOW"))
            .collect()
    }

    fn answer(&self, sql: &str) -> Result<Vec<Row>, sqlx::Error> {
        self.statements.lock().unwrap().push(sql.to_string());
        let replies = self.replies.lock().unwrap();
        match replies.iter().rev().find(|(prefix, _)| sql.starts_with(prefix.as_str())) {
            Some((_, Reply::Rows(rows))) => Ok(rows.clone()),
            Some((_, Reply::Fail(msg))) => Err(sqlx::Error::Protocol(msg.clone())),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl SqlExecutor for RecordingExecutor {
    async fn exec(&self, sql: &str) -> Result<u64, sqlx::Error> {
        self.answer(sql).map(|rows| rows.len() as u64)
    }

    async fn query(&self, sql: &str) -> Result<Vec<Row>, sqlx::Error> {
        self.answer(sql)
    }
}

pub fn client() -> (Arc<RecordingExecutor>, Client) {
    let executor = RecordingExecutor::new();
    let client = Client::new(executor.clone());
    (executor, client)
}

pub fn attrs(v: Value) -> serde_json::Map<String, Value> {
    v.as_object().cloned().expect("attributes must be a JSON object")
}
