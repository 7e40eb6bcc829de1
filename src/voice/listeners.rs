use super::client::VoiceEvent;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Default)]
struct ListenerMap {
    next_id: u64,
    senders: HashMap<u64, mpsc::UnboundedSender<VoiceEvent>>,
}

/// Listener registry shared by a voice client and its subscriptions
#[derive(Clone, Default)]
pub struct EventListeners {
    inner: Arc<Mutex<ListenerMap>>,
}

impl EventListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let id = map.next_id;
        map.next_id += 1;
        map.senders.insert(id, tx);

        Subscription {
            id,
            rx,
            listeners: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver `event` to every live subscription, returning how many received it
    pub fn emit(&self, event: VoiceEvent) -> usize {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.senders.retain(|_, tx| tx.send(event.clone()).is_ok());
        debug!("Emitted {} event to {} listener(s)", event.name(), map.senders.len());
        map.senders.len()
    }

    pub fn len(&self) -> usize {
        let map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unregister everyone; open subscriptions see the end of their stream
    pub fn clear(&self) {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.senders.clear();
    }
}

/// Handle to a stream of voice events, unregistered on drop
pub struct Subscription {
    id: u64,
    rx: mpsc::UnboundedReceiver<VoiceEvent>,
    listeners: Weak<Mutex<ListenerMap>>,
}

impl Subscription {
    /// Wait for the next event; `None` once the client dropped its listeners
    pub async fn recv(&mut self) -> Option<VoiceEvent> {
        self.rx.recv().await
    }

    /// Take the next already-delivered event without waiting
    pub fn try_recv(&mut self) -> Option<VoiceEvent> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.listeners.upgrade() {
            let mut map = inner.lock().unwrap_or_else(|e| e.into_inner());
            map.senders.remove(&self.id);
        }
    }
}
