//! In-process fan-out of named events to registered handlers.

use std::{collections::HashMap, sync::Arc};

use tokio::{sync::RwLock, task::JoinHandle};

type Handler<T> = Arc<dyn Fn(T) + Send + Sync + 'static>;

/// Handlers keyed by event name. Each emit runs every matching handler on
/// its own task with a clone of the payload.
pub struct EventEmitter<T> {
    inner: Arc<RwLock<HashMap<String, Vec<Handler<T>>>>>,
}

impl<T> Clone for EventEmitter<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T> Default for EventEmitter<T> {
    fn default() -> Self {
        Self { inner: Arc::new(RwLock::new(HashMap::new())) }
    }
}

impl<T: Clone + Send + 'static> EventEmitter<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `event`. Handlers are spawned in registration
    /// order; completion order is unspecified.
    pub async fn on<F>(&self, event: impl Into<String>, handler: F)
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let mut map = self.inner.write().await;
        map.entry(event.into()).or_default().push(Arc::new(handler));
    }

    /// Spawn every handler registered for `event`. Unknown events are a no-op.
    pub async fn emit(&self, event: &str, data: T) -> Vec<JoinHandle<()>> {
        let handlers = {
            let map = self.inner.read().await;
            map.get(event).cloned().unwrap_or_default()
        };
        handlers
            .into_iter()
            .map(|handler| {
                let data = data.clone();
                tokio::spawn(async move { handler(data) })
            })
            .collect()
    }

    pub async fn handler_count(&self, event: &str) -> usize {
        self.inner.read().await.get(event).map_or(0, Vec::len)
    }
}
