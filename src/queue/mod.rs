//! Keyed Task Queue
//!
//! Runs asynchronous work identified by a string key with at most
//! `concurrency` tasks in flight. Work waiting for a slot starts in FIFO
//! order.
//!
//! While a key is pending (waiting or running), enqueuing it again does not
//! schedule new work: the caller receives the handle of the pending task
//! and the new future is dropped unpolled. Every caller therefore observes
//! the same outcome.
//!
//! Tasks run on the Tokio runtime; [`KeyedTaskQueue::enqueue`] must be
//! called from within one. There is no cancellation and no timeout.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::oneshot;

use crate::config::Config;

/// Outcome observed by every handle of one task.
pub type TaskOutcome<T> = Result<T, TaskError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("Task {0} panicked")]
    Panicked(String),

    /// The runtime shut down before the task finished
    #[error("Task {0} was aborted")]
    Aborted(String),
}

/// Awaitable, cloneable handle to a task's outcome.
#[derive(Clone)]
pub struct TaskHandle<T: Clone> {
    key: String,
    outcome: Shared<BoxFuture<'static, TaskOutcome<T>>>,
}

impl<T: Clone> TaskHandle<T> {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<T: Clone> Future for TaskHandle<T> {
    type Output = TaskOutcome<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.outcome.poll_unpin(cx)
    }
}

impl<T: Clone> std::fmt::Debug for TaskHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle").field("key", &self.key).finish()
    }
}

struct QueuedTask<T> {
    key: String,
    work: BoxFuture<'static, T>,
    done: oneshot::Sender<TaskOutcome<T>>,
}

struct QueueState<T: Clone> {
    pending: HashMap<String, TaskHandle<T>>,
    waiting: VecDeque<QueuedTask<T>>,
    running: usize,
}

/// Concurrency-limited, key-coalescing task runner.
pub struct KeyedTaskQueue<T: Clone> {
    state: Arc<Mutex<QueueState<T>>>,
    concurrency: usize,
}

impl<T: Clone> Clone for KeyedTaskQueue<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            concurrency: self.concurrency,
        }
    }
}

impl<T> KeyedTaskQueue<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Queue running at most `concurrency` tasks at once (minimum one).
    pub fn new(concurrency: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(QueueState {
                pending: HashMap::new(),
                waiting: VecDeque::new(),
                running: 0,
            })),
            concurrency: concurrency.max(1),
        }
    }

    /// Queue sized from `LEDGER_QUEUE_CONCURRENCY`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.queue_concurrency)
    }

    // Bookkeeping never runs user code under the lock, so a poisoned lock
    // still holds consistent state.
    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Schedule `task` under `key`, or join the task already pending under it.
    pub fn enqueue<F>(&self, key: impl Into<String>, task: F) -> TaskHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
    {
        let key = key.into();

        let handle = {
            let mut state = self.lock();
            if let Some(pending) = state.pending.get(&key) {
                tracing::debug!(key = %key, "Task already pending, joining it");
                return pending.clone();
            }

            let (done, outcome) = oneshot::channel();
            let aborted_key = key.clone();
            let handle = TaskHandle {
                key: key.clone(),
                outcome: outcome
                    .map(move |received| received.unwrap_or(Err(TaskError::Aborted(aborted_key))))
                    .boxed()
                    .shared(),
            };

            state.pending.insert(key.clone(), handle.clone());
            state.waiting.push_back(QueuedTask {
                key,
                work: task.boxed(),
                done,
            });
            handle
        };

        self.pump();
        handle
    }

    /// Start waiting tasks until the queue is empty or saturated.
    fn pump(&self) {
        let ready: Vec<QueuedTask<T>> = {
            let mut state = self.lock();
            let mut ready = Vec::new();
            while state.running < self.concurrency {
                let Some(task) = state.waiting.pop_front() else {
                    break;
                };
                state.running += 1;
                ready.push(task);
            }
            ready
        };

        for task in ready {
            self.start(task);
        }
    }

    fn start(&self, task: QueuedTask<T>) {
        let queue = self.clone();
        let QueuedTask { key, work, done } = task;
        tracing::debug!(key = %key, "Task started");

        tokio::spawn(async move {
            // Run the work on its own task so a panic surfaces as a JoinError
            let outcome = match tokio::spawn(work).await {
                Ok(value) => Ok(value),
                Err(err) if err.is_panic() => {
                    tracing::warn!(key = %key, "Task panicked");
                    Err(TaskError::Panicked(key.clone()))
                }
                Err(_) => Err(TaskError::Aborted(key.clone())),
            };

            queue.finish(&key);
            tracing::debug!(key = %key, success = outcome.is_ok(), "Task completed");

            // Every handle may have been dropped already
            let _ = done.send(outcome);
            queue.pump();
        });
    }

    fn finish(&self, key: &str) {
        let mut state = self.lock();
        state.running = state.running.saturating_sub(1);
        state.pending.remove(key);
    }

    /// Whether a task is waiting or running under `key`.
    pub fn is_pending(&self, key: &str) -> bool {
        self.lock().pending.contains_key(key)
    }

    /// Tasks currently running.
    pub fn running(&self) -> usize {
        self.lock().running
    }

    /// Tasks waiting for a slot.
    pub fn waiting(&self) -> usize {
        self.lock().waiting.len()
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }
}
