use chatterm::api::HttpChatApi;
use chatterm::config::{ApiConfig, ComposerConfig};
use chatterm::notify::{Notification, Notifier};
use chatterm::preferences::{MemoryPreferenceStore, Settings};
use chatterm::session::ChatSession;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Notifier that keeps every notification for later assertions
#[derive(Default)]
#[allow(dead_code)]
pub struct CollectingNotifier {
    seen: Mutex<Vec<Notification>>,
}

#[allow(dead_code)]
impl CollectingNotifier {
    pub fn titles(&self) -> Vec<String> {
        self.seen
            .lock()
            .expect("notifier lock")
            .iter()
            .map(|n| n.title.clone())
            .collect()
    }

    pub fn last(&self) -> Option<Notification> {
        self.seen.lock().expect("notifier lock").last().cloned()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().expect("notifier lock").push(notification);
    }
}

#[allow(dead_code)]
pub fn http_api(base_url: &str) -> HttpChatApi {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 5,
    };
    HttpChatApi::new(&config).expect("failed to build api client")
}

/// Session wired to a live (mock) backend with in-memory preferences
#[allow(dead_code)]
pub fn http_session(base_url: &str) -> (ChatSession, Arc<CollectingNotifier>, MemoryPreferenceStore) {
    let notifier = Arc::new(CollectingNotifier::default());
    let store = MemoryPreferenceStore::default();
    let session = ChatSession::new(
        Arc::new(http_api(base_url)),
        notifier.clone(),
        Settings::shared(Box::new(store.clone())),
        ComposerConfig::default(),
    );
    (session, notifier, store)
}

#[allow(dead_code)]
pub fn chat_json(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "preview": "",
        "timestamp": "Just now",
        "messageCount": 0
    })
}

#[allow(dead_code)]
pub fn message_json(id: &str, chat_id: &str, text: &str, sender: &str) -> Value {
    json!({
        "id": id,
        "chatId": chat_id,
        "text": text,
        "sender": sender,
        "timestamp": "10:00 AM"
    })
}

#[allow(dead_code)]
pub fn temp_file(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let path = temp_dir.path().join(name);
    fs::write(&path, contents).expect("failed to write file");
    (temp_dir, path)
}
