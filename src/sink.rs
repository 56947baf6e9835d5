use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;

use crate::dataset::OutputKey;
use crate::{Error, Result};

/// Durable storage for the records of one download.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Stores `records` under `key` and returns where they went.
    async fn save(&self, key: &OutputKey, records: &[Value]) -> Result<PathBuf>;
}

/// Writes each download to `{dir}/{dataset}-{region}.json` as a pretty-printed
/// JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &OutputKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.file_stem()))
    }
}

#[async_trait]
impl Sink for JsonFileSink {
    async fn save(&self, key: &OutputKey, records: &[Value]) -> Result<PathBuf> {
        let path = self.path_for(key);
        let bytes = serde_json::to_vec_pretty(records)?;

        let write = async {
            fs::create_dir_all(&self.dir).await?;
            fs::write(&path, &bytes).await
        };
        match write.await {
            Ok(()) => Ok(path),
            Err(source) => Err(Error::Sink { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetKind;
    use serde_json::json;

    #[tokio::test]
    async fn writes_pretty_array_named_after_key() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = JsonFileSink::new(tmp.path().join("data"));
        let key = OutputKey::new(DatasetKind::Policies, "12086".into());

        let path = sink.save(&key, &[json!({"id": 1}), json!({"id": 2})]).await.unwrap();

        assert_eq!(path, tmp.path().join("data").join("policies-12086.json"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n  {\n    \"id\": 1\n  },"));
        let back: Vec<Value> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, vec![json!({"id": 1}), json!({"id": 2})]);
    }

    #[tokio::test]
    async fn empty_download_is_an_empty_array() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = JsonFileSink::new(tmp.path());
        let key = OutputKey::new(DatasetKind::Claims, "06037".into());

        let path = sink.save(&key, &[]).await.unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "[]");
    }

    #[tokio::test]
    async fn write_failure_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        // A regular file where the directory should be.
        let blocker = tmp.path().join("data");
        std::fs::write(&blocker, b"").unwrap();
        let sink = JsonFileSink::new(&blocker);
        let key = OutputKey::new(DatasetKind::Claims, "06037".into());

        let err = sink.save(&key, &[json!(1)]).await.unwrap_err();

        assert!(matches!(err, Error::Sink { ref path, .. } if path.starts_with(&blocker)));
    }
}
