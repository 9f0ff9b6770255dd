//! Per-user session storage.
//!
//! Every user gets one slot. A slot holds at most one [`Session`]: the active
//! workflow together with its output directory. The slot's own lock makes the
//! events of one user apply strictly one after another, while different users
//! never wait on each other beyond the short map lookup.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::batch::OutputDir;
use crate::transport::UserId;
use crate::workflow::{Command, Workflow};

/// The active workflow of one user.
pub struct Session {
    /// Workflow state, including its upload batch
    pub workflow: Box<dyn Workflow>,

    /// Where the workflow writes its results
    pub outputs: OutputDir,
}

impl Session {
    /// Creates a session.
    pub fn new(workflow: Box<dyn Workflow>, outputs: OutputDir) -> Self {
        Self { workflow, outputs }
    }

    /// The command that started this session.
    pub fn command(&self) -> Command {
        self.workflow.command()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("command", &self.command())
            .field("outputs", &self.outputs)
            .finish()
    }
}

/// Shared handle to one user's slot.
pub type Slot = Arc<Mutex<Option<Session>>>;

/// Map from user to session slot.
#[derive(Debug, Default)]
pub struct SessionStore {
    slots: Mutex<HashMap<UserId, Slot>>,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot for `user`, creating an empty one on first use.
    pub async fn slot(&self, user: UserId) -> Slot {
        let mut slots = self.slots.lock().await;
        Arc::clone(slots.entry(user).or_default())
    }

    /// Drops the slot of `user` if it is empty and nobody else holds it.
    pub async fn release(&self, user: UserId) {
        let mut slots = self.slots.lock().await;
        let Some(slot) = slots.get(&user) else { return };
        if Arc::strong_count(slot) > 1 {
            return;
        }
        let empty = slot.try_lock().map(|s| s.is_none()).unwrap_or(false);
        if empty {
            slots.remove(&user);
        }
    }

    /// Command of the active session of `user`, if any.
    pub async fn active(&self, user: UserId) -> Option<Command> {
        let slot = {
            let slots = self.slots.lock().await;
            slots.get(&user).map(Arc::clone)
        }?;
        let session = slot.lock().await;
        session.as_ref().map(Session::command)
    }

    /// Number of users with a slot.
    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }

    /// Returns true when no user has a slot.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_slot_is_shared_per_user() {
        let store = SessionStore::new();
        let a1 = store.slot(UserId(1)).await;
        let a2 = store.slot(UserId(1)).await;
        let b = store.slot(UserId(2)).await;
        assert!(Arc::ptr_eq(&a1, &a2));
        assert!(!Arc::ptr_eq(&a1, &b));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_release_keeps_held_slots() {
        let store = SessionStore::new();
        let held = store.slot(UserId(1)).await;
        store.release(UserId(1)).await;
        assert_eq!(store.len().await, 1);

        drop(held);
        store.release(UserId(1)).await;
        assert!(store.is_empty().await);
        assert_eq!(store.active(UserId(1)).await, None);
    }
}
