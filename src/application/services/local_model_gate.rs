use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Serializes runs against the self-hosted model, which can only serve one
/// analysis at a time. Clones share the same lock.
#[derive(Debug, Clone, Default)]
pub struct LocalModelGate {
    lock: Arc<Mutex<()>>,
}

/// Held for the whole run; the gate reopens on drop.
#[derive(Debug)]
pub struct LocalModelPermit {
    _guard: OwnedMutexGuard<()>,
}

impl LocalModelGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self) -> LocalModelPermit {
        LocalModelPermit {
            _guard: Arc::clone(&self.lock).lock_owned().await,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.lock.try_lock().is_err()
    }
}
