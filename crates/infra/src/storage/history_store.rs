//! JSON-file implementation of the `ConversationLog` port
//!
//! The whole log is one JSON object mapping user ids to their turns:
//!
//! ```json
//! {"1234": [{"role": "user", "parts": [{"text": "..."}]}, ...]}
//! ```
//!
//! Reads and writes go through a single async mutex, and every write
//! replaces the file atomically via a sibling `.tmp` file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use famcal_core::ConversationLog;
use famcal_domain::{ConversationTurn, FamcalError, Result};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::errors::InfraError;

type HistoryDocument = BTreeMap<String, Value>;

/// Conversation log persisted to a JSON file.
pub struct JsonHistoryStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing, unreadable and malformed files all read as an empty log.
    async fn read_document(&self) -> HistoryDocument {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return HistoryDocument::new(),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Failed to read history file");
                return HistoryDocument::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(document) => document,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "History file is corrupt, starting fresh");
                HistoryDocument::new()
            }
        }
    }

    async fn write_document(&self, document: &HistoryDocument) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(storage_error)?;
        }

        let body = serde_json::to_string(document)
            .map_err(|e| FamcalError::from(InfraError::from(e)))?;
        let temp_path = temp_path_for(&self.path);
        tokio::fs::write(&temp_path, body).await.map_err(storage_error)?;
        tokio::fs::rename(&temp_path, &self.path).await.map_err(storage_error)?;
        Ok(())
    }
}

#[async_trait]
impl ConversationLog for JsonHistoryStore {
    #[instrument(skip(self))]
    async fn get(&self, user_id: &str) -> Result<Vec<ConversationTurn>> {
        let _guard = self.lock.lock().await;
        let document = self.read_document().await;
        Ok(decode_turns(document.get(user_id)))
    }

    #[instrument(skip(self, user_prompt, model_response))]
    async fn append(
        &self,
        user_id: &str,
        user_prompt: &str,
        model_response: &str,
        max_items: usize,
    ) -> Result<Vec<ConversationTurn>> {
        let _guard = self.lock.lock().await;
        let mut document = self.read_document().await;

        let mut history = decode_turns(document.get(user_id));
        history.push(ConversationTurn::user(user_prompt));
        history.push(ConversationTurn::model(model_response));
        let overflow = history.len().saturating_sub(max_items);
        history.drain(..overflow);

        let encoded =
            serde_json::to_value(&history).map_err(|e| FamcalError::from(InfraError::from(e)))?;
        document.insert(user_id.to_string(), encoded);
        self.write_document(&document).await?;

        debug!(stored = history.len(), "Appended conversation turns");
        Ok(history)
    }
}

/// A user entry that is not a list of turns counts as no history.
fn decode_turns(entry: Option<&Value>) -> Vec<ConversationTurn> {
    entry
        .and_then(|value| serde_json::from_value::<Vec<ConversationTurn>>(value.clone()).ok())
        .unwrap_or_default()
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

fn storage_error(err: std::io::Error) -> FamcalError {
    FamcalError::Storage(format!("history file: {err}"))
}
