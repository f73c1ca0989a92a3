use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::kv::KeyValueStore;
use crate::core::config::{PersistenceConfig, MIN_FLUSH_INTERVAL};

enum WriteOp {
    Put { key: String, value: String },
    Clear(Vec<String>),
    Flush(Sender<()>),
}

/// Background writer that coalesces writes per key (last write wins).
///
/// Callers never block on storage: `put` only enqueues. Pending writes are
/// flushed on the configured interval, when the buffer fills up, on `flush`,
/// and when the writer is dropped.
pub struct PersistWriter {
    tx: Option<Sender<WriteOp>>,
    handle: Option<JoinHandle<()>>,
}

impl PersistWriter {
    /// Spawn the writer thread on top of the given backend.
    pub fn spawn(kv: Arc<dyn KeyValueStore>, config: PersistenceConfig) -> Self {
        let (tx, rx) = mpsc::channel::<WriteOp>();

        let handle = thread::Builder::new()
            .name("basket-writer".to_string())
            .spawn(move || writer_loop(rx, kv, config));

        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!(target: "persistence", "Failed to spawn writer thread: {}", e);
                None
            }
        };

        Self {
            tx: Some(tx),
            handle,
        }
    }

    /// Queue a write (fire-and-forget).
    pub fn put(&self, key: &str, value: String) {
        self.send(WriteOp::Put {
            key: key.to_string(),
            value,
        });
    }

    /// Drop pending writes and remove the given keys.
    pub fn clear(&self, keys: &[&str]) {
        self.send(WriteOp::Clear(keys.iter().map(|k| k.to_string()).collect()));
    }

    /// Block until everything queued before this call has been written.
    pub fn flush(&self) {
        let (ack_tx, ack_rx) = mpsc::channel();
        if self.send(WriteOp::Flush(ack_tx)) {
            let _ = ack_rx.recv();
        }
    }

    fn send(&self, op: WriteOp) -> bool {
        let sent = self.tx.as_ref().is_some_and(|tx| tx.send(op).is_ok());
        if !sent {
            tracing::warn!(target: "persistence", "Writer thread is gone, write dropped");
        }
        sent
    }
}

impl Drop for PersistWriter {
    fn drop(&mut self) {
        // Closing the channel makes the thread flush and exit
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!(target: "persistence", "Writer thread panicked");
            }
        }
    }
}

fn writer_loop(rx: Receiver<WriteOp>, kv: Arc<dyn KeyValueStore>, config: PersistenceConfig) {
    let mut pending: HashMap<String, String> = HashMap::new();
    let mut queued = 0usize;
    let interval = config.flush_interval.max(MIN_FLUSH_INTERVAL);

    loop {
        match rx.recv_timeout(interval) {
            Ok(WriteOp::Put { key, value }) => {
                pending.insert(key, value);
                queued += 1;
                if queued >= config.max_pending {
                    flush_pending(kv.as_ref(), &mut pending);
                    queued = 0;
                }
            }
            Ok(WriteOp::Clear(keys)) => {
                pending.clear();
                queued = 0;
                for key in keys {
                    if let Err(e) = kv.remove(&key) {
                        tracing::warn!(target: "persistence", key = %key, "Failed to remove entry: {}", e);
                    }
                }
            }
            Ok(WriteOp::Flush(ack)) => {
                flush_pending(kv.as_ref(), &mut pending);
                queued = 0;
                let _ = ack.send(());
            }
            Err(RecvTimeoutError::Timeout) => {
                if !pending.is_empty() {
                    flush_pending(kv.as_ref(), &mut pending);
                    queued = 0;
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                flush_pending(kv.as_ref(), &mut pending);
                break;
            }
        }
    }
}

fn flush_pending(kv: &dyn KeyValueStore, pending: &mut HashMap<String, String>) {
    for (key, value) in pending.drain() {
        match kv.put(&key, &value) {
            Ok(()) => {
                tracing::trace!(target: "persistence", key = %key, bytes = value.len(), "Entry written");
            }
            Err(e) => {
                tracing::error!(target: "persistence", key = %key, "Failed to write entry: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::kv::MemoryStore;
    use std::time::{Duration, Instant};

    fn slow_config() -> PersistenceConfig {
        PersistenceConfig::default().with_flush_interval(Duration::from_secs(60))
    }

    fn wait_for(kv: &MemoryStore, key: &str) -> Option<String> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if let Some(value) = kv.get(key).unwrap() {
                return Some(value);
            }
            thread::sleep(Duration::from_millis(5));
        }
        None
    }

    #[test]
    fn test_full_buffer_flushes_without_explicit_flush() {
        let kv = Arc::new(MemoryStore::new());
        let writer = PersistWriter::spawn(kv.clone(), slow_config().with_max_pending(2));

        writer.put("shopping_lists", "{}".to_string());
        writer.put("current_list_id", "a".to_string());

        assert_eq!(wait_for(&kv, "current_list_id").as_deref(), Some("a"));
        assert_eq!(kv.get("shopping_lists").unwrap().as_deref(), Some("{}"));
        drop(writer);
    }

    #[test]
    fn test_interval_flushes_without_explicit_flush() {
        let kv = Arc::new(MemoryStore::new());
        let config = PersistenceConfig::default().with_flush_interval(Duration::from_millis(10));
        let writer = PersistWriter::spawn(kv.clone(), config);

        writer.put("shopping_app_settings", "{}".to_string());

        assert_eq!(wait_for(&kv, "shopping_app_settings").as_deref(), Some("{}"));
        drop(writer);
    }

    #[test]
    fn test_zero_interval_still_writes() {
        let kv = Arc::new(MemoryStore::new());
        let config = PersistenceConfig {
            flush_interval: Duration::ZERO,
            max_pending: 16,
        };
        let writer = PersistWriter::spawn(kv.clone(), config);

        writer.put("current_list_id", "b".to_string());

        assert_eq!(wait_for(&kv, "current_list_id").as_deref(), Some("b"));
        drop(writer);
    }

    #[test]
    fn test_flush_writes_last_value_per_key() {
        let kv = Arc::new(MemoryStore::new());
        let writer = PersistWriter::spawn(kv.clone(), slow_config());

        writer.put("current_list_id", "a".to_string());
        writer.put("current_list_id", "b".to_string());
        writer.flush();

        assert_eq!(kv.get("current_list_id").unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn test_clear_discards_pending_writes() {
        let kv = Arc::new(MemoryStore::with_entries([("shopping_lists", "{}")]));
        let writer = PersistWriter::spawn(kv.clone(), slow_config());

        writer.put("current_list_id", "a".to_string());
        writer.clear(&["shopping_lists", "current_list_id"]);
        writer.flush();

        assert!(kv.get("shopping_lists").unwrap().is_none());
        assert!(kv.get("current_list_id").unwrap().is_none());
    }

    #[test]
    fn test_drop_flushes_pending_writes() {
        let kv = Arc::new(MemoryStore::new());
        {
            let writer = PersistWriter::spawn(kv.clone(), slow_config());
            writer.put("shopping_app_settings", "{}".to_string());
        }

        assert_eq!(kv.get("shopping_app_settings").unwrap().as_deref(), Some("{}"));
    }
}
