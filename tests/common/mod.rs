#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use nfip_fetch::{Error, OutputKey, RequestIssuer, Result, Sink};
use serde_json::{json, Value};

/// Ordered log of what the fakes saw, shared between issuer and sink.
pub type Journal = Arc<Mutex<Vec<String>>>;

/// Replays canned responses in order. Any request past the script panics.
pub struct ScriptedIssuer {
    script: Mutex<VecDeque<Result<String>>>,
    urls: Mutex<Vec<String>>,
    journal: Journal,
}

impl ScriptedIssuer {
    pub fn new(script: Vec<Result<String>>, journal: Journal) -> Self {
        Self {
            script: Mutex::new(script.into()),
            urls: Mutex::new(Vec::new()),
            journal,
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RequestIssuer for ScriptedIssuer {
    async fn get(&self, url: &str) -> Result<String> {
        self.urls.lock().unwrap().push(url.to_string());
        self.journal.lock().unwrap().push(format!("get {url}"));
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request: {url}"))
    }
}

/// Keeps saved downloads in memory, or fails every save.
pub struct MemorySink {
    saved: Mutex<Vec<(OutputKey, Vec<Value>)>>,
    fail: bool,
    journal: Journal,
}

impl MemorySink {
    pub fn new(journal: Journal) -> Self {
        Self {
            saved: Mutex::new(Vec::new()),
            fail: false,
            journal,
        }
    }

    pub fn failing(journal: Journal) -> Self {
        Self {
            fail: true,
            ..Self::new(journal)
        }
    }

    pub fn saved(&self) -> Vec<(OutputKey, Vec<Value>)> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sink for MemorySink {
    async fn save(&self, key: &OutputKey, records: &[Value]) -> Result<PathBuf> {
        self.journal.lock().unwrap().push(format!("save {key}"));
        let path = PathBuf::from(format!("{}.json", key.file_stem()));
        if self.fail {
            return Err(Error::Sink {
                path,
                source: io::Error::other("disk full"),
            });
        }
        self.saved
            .lock()
            .unwrap()
            .push((key.clone(), records.to_vec()));
        Ok(path)
    }
}

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

/// `count` records tagged with their page and position.
pub fn rows(page: usize, count: usize) -> Vec<Value> {
    (0..count).map(|i| json!({"page": page, "i": i})).collect()
}

/// A well-formed page body for `collection`.
pub fn page_body(collection: &str, rows: &[Value]) -> Result<String> {
    let mut envelope = serde_json::Map::new();
    envelope.insert("metadata".into(), json!({"count": rows.len()}));
    envelope.insert(collection.into(), Value::Array(rows.to_vec()));
    Ok(Value::Object(envelope).to_string())
}
