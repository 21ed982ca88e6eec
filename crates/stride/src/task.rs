//! Completion tokens for outstanding movement commands.
//!
//! A [`TaskHandle`] is shared between the subsystem that issued a command
//! and the actor carrying it out. The issuer keeps a clone and polls
//! [`TaskHandle::status`]; the actor signals it once through a [`TaskSlot`].
//!
//! # Exactly once
//!
//! The first terminal call wins. Every later `complete`/`cancel` on any
//! clone of the same handle is a no-op and returns `false`. Inside the
//! movement core the handle additionally sits in a `TaskSlot` that is
//! emptied on first use, so a session cannot even attempt a second signal.

use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

const PENDING: u8 = 0;
const COMPLETED: u8 = 1;
const CANCELED: u8 = 2;

/// Terminal state of a [`TaskHandle`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Neither completed nor canceled yet
    Pending,
    /// The command finished successfully
    Completed,
    /// The command was interrupted, superseded, or could not finish
    Canceled,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Completed => write!(f, "Completed"),
            Self::Canceled => write!(f, "Canceled"),
        }
    }
}

#[derive(Debug, Default)]
struct TaskInner {
    status: AtomicU8,
    signals: AtomicU32,
}

/// Shared, call-once completion token.
///
/// Cloning is cheap and every clone observes the same outcome.
///
/// # Example
///
/// ```
/// use stride::task::{TaskHandle, TaskStatus};
///
/// let issued = TaskHandle::new();
/// let carried = issued.clone();
///
/// assert!(carried.cancel());
/// assert!(!carried.complete()); // too late
/// assert_eq!(issued.status(), TaskStatus::Canceled);
/// assert_eq!(issued.signal_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TaskHandle {
    inner: Arc<TaskInner>,
}

impl TaskHandle {
    /// Creates a new pending handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the task completed. Returns `true` if this call decided the outcome.
    pub fn complete(&self) -> bool {
        self.settle(COMPLETED)
    }

    /// Marks the task canceled. Returns `true` if this call decided the outcome.
    pub fn cancel(&self) -> bool {
        self.settle(CANCELED)
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> TaskStatus {
        match self.inner.status.load(Ordering::Acquire) {
            COMPLETED => TaskStatus::Completed,
            CANCELED => TaskStatus::Canceled,
            _ => TaskStatus::Pending,
        }
    }

    /// Returns `true` while no terminal signal has been received.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status() == TaskStatus::Pending
    }

    /// Number of `complete`/`cancel` calls received, including no-ops.
    #[must_use]
    pub fn signal_count(&self) -> u32 {
        self.inner.signals.load(Ordering::Relaxed)
    }

    /// Returns `true` if both handles refer to the same task.
    #[must_use]
    pub fn same_task(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn settle(&self, outcome: u8) -> bool {
        self.inner.signals.fetch_add(1, Ordering::Relaxed);
        self.inner
            .status
            .compare_exchange(PENDING, outcome, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// One-shot holder for the task of the current session.
///
/// Signaling empties the slot, so the session that owns it can reach the
/// handle at most once.
#[derive(Debug, Default)]
pub struct TaskSlot(Option<TaskHandle>);

impl TaskSlot {
    /// Arms the slot with `handle`.
    #[must_use]
    pub fn new(handle: TaskHandle) -> Self {
        Self(Some(handle))
    }

    /// An empty slot.
    #[must_use]
    pub const fn empty() -> Self {
        Self(None)
    }

    /// Returns `true` while the slot still holds a handle.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.0.is_some()
    }

    /// Completes and empties the slot. Returns `true` if the task was
    /// completed by this call.
    pub fn complete(&mut self) -> bool {
        self.0.take().is_some_and(|task| task.complete())
    }

    /// Cancels and empties the slot. Returns `true` if the task was
    /// canceled by this call.
    pub fn cancel(&mut self) -> bool {
        self.0.take().is_some_and(|task| task.cancel())
    }

    /// Removes the handle without signaling it.
    pub fn take(&mut self) -> Option<TaskHandle> {
        self.0.take()
    }

    /// Borrows the held handle.
    #[must_use]
    pub fn handle(&self) -> Option<&TaskHandle> {
        self.0.as_ref()
    }
}

impl From<TaskHandle> for TaskSlot {
    fn from(handle: TaskHandle) -> Self {
        Self::new(handle)
    }
}
