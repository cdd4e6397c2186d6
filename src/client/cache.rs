//! Local mirror of the streamer list
//!
//! The cache is an explicit value handed to rendering code — no ambient
//! globals. Mutations patch it optimistically the way the original client
//! did; registered listeners are notified after every successful mutation.

use parking_lot::RwLock;

use crate::api::types::StreamerResponse;
use crate::storage::HistoryEntry;

type Listener = Box<dyn Fn(&[StreamerResponse]) + Send + Sync>;

#[derive(Default)]
pub struct StreamerCache {
    streamers: RwLock<Vec<StreamerResponse>>,
    listeners: RwLock<Vec<Listener>>,
}

impl StreamerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener called with the full list after every mutation
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&[StreamerResponse]) + Send + Sync + 'static,
    {
        self.listeners.write().push(Box::new(listener));
    }

    fn notify(&self) {
        let streamers = self.streamers.read();
        for listener in self.listeners.read().iter() {
            listener(&streamers);
        }
    }

    /// Current mirror contents
    pub fn snapshot(&self) -> Vec<StreamerResponse> {
        self.streamers.read().clone()
    }

    pub fn len(&self) -> usize {
        self.streamers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.streamers.read().is_empty()
    }

    pub fn find(&self, id: &str) -> Option<StreamerResponse> {
        self.streamers.read().iter().find(|s| s.id == id).cloned()
    }

    /// Replace the whole mirror (full reload from the API)
    pub fn replace_all(&self, streamers: Vec<StreamerResponse>) {
        *self.streamers.write() = streamers;
        self.notify();
    }

    /// Add a freshly created streamer
    pub fn insert(&self, streamer: StreamerResponse) {
        self.streamers.write().push(streamer);
        self.notify();
    }

    /// Patch name/platform in place; history stays untouched
    pub fn patch_metadata(&self, id: &str, name: &str, platform: &str) {
        {
            let mut streamers = self.streamers.write();
            if let Some(s) = streamers.iter_mut().find(|s| s.id == id) {
                s.name = name.to_string();
                s.platform = platform.to_string();
            }
        }
        self.notify();
    }

    /// Drop a deleted streamer
    pub fn remove(&self, id: &str) {
        self.streamers.write().retain(|s| s.id != id);
        self.notify();
    }

    /// Append a recorded history entry to the mirrored streamer
    pub fn append_entry(&self, id: &str, entry: HistoryEntry) {
        {
            let mut streamers = self.streamers.write();
            if let Some(s) = streamers.iter_mut().find(|s| s.id == id) {
                s.history.push(entry);
            }
        }
        self.notify();
    }
}
