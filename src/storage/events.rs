//! Change notifications
//!
//! Observers subscribe for a channel and receive one [`StoreChange`] per
//! committed mutation. They re-read a snapshot and recompute whatever they
//! display.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Mutex, MutexGuard};

use crate::error::{ExpenseError, ExpenseResult};

/// Which entity collection changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    Accounts,
    Categories,
    Transactions,
}

/// Fan-out of change events to any number of subscribers
#[derive(Default)]
pub struct ChangeNotifier {
    subscribers: Mutex<Vec<Sender<StoreChange>>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> ExpenseResult<MutexGuard<'_, Vec<Sender<StoreChange>>>> {
        self.subscribers.lock().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire subscriber lock: {}", e))
        })
    }

    /// Register a new observer
    pub fn subscribe(&self) -> ExpenseResult<Receiver<StoreChange>> {
        let (tx, rx) = channel();
        self.lock()?.push(tx);
        Ok(rx)
    }

    /// Send a change to every live subscriber, dropping disconnected ones
    ///
    /// The mutation has already been committed, so a poisoned subscriber
    /// list is logged rather than returned.
    pub fn notify(&self, change: StoreChange) {
        match self.lock() {
            Ok(mut subscribers) => {
                subscribers.retain(|tx| tx.send(change).is_ok());
                tracing::debug!(?change, subscribers = subscribers.len(), "store changed");
            }
            Err(e) => tracing::warn!(?change, error = %e, "change notification dropped"),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }
}
