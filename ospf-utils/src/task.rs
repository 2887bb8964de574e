//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use derive_new::new;
use tokio::sync::watch;
use tokio::time::Instant;
use tokio::{task, time};
use tracing::{Instrument, trace};

/// A handle which can be used to manipulate the task created by the
/// [`Task::spawn`] function.
///
/// By default, dropping this handle cancels the task (unless [`Task::detach`]
/// is used).
#[derive(Debug)]
pub struct Task<T> {
    join_handle: task::JoinHandle<T>,
    detached: bool,
}

/// A level-triggered flag shared between a timer and the context that owns
/// it.
///
/// Cloning a signal yields another handle to the same flag.
#[derive(Clone, Debug)]
pub struct Signal(Arc<watch::Sender<bool>>);

/// The three flags a timer communicates through.
#[derive(Clone, Debug, Default, new)]
pub struct TimerSignals {
    /// Set by the owner to restart the countdown. Cleared by the timer.
    pub reset: Signal,
    /// Set by the timer when the countdown expires. Cleared by the owner.
    pub timeout: Signal,
    /// Set by the owner to stop the timer.
    pub shutdown: Signal,
}

/// Countdown timer driven by [`TimerSignals`].
///
/// Clones share the same initial-time mark, so the owner can keep a handle
/// to query [`Timer::remaining`] while a clone is running on its own task.
#[derive(Clone, Debug)]
pub struct Timer {
    timeout: Duration,
    initial_time: Arc<Mutex<Instant>>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TimerError {
    InvalidTimeout(u64),
}

// ===== impl Task =====

impl<T> Task<T> {
    /// Spawns a new asynchronous task, returning a handle for it.
    pub fn spawn<Fut>(future: Fut) -> Task<T>
    where
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        Task {
            join_handle: tokio::spawn(future),
            detached: false,
        }
    }

    /// Detaches the task so that it's not cancelled when its handle is
    /// dropped.
    pub fn detach(&mut self) {
        self.detached = true;
    }

    /// Returns whether the task has finished.
    pub fn is_finished(&self) -> bool {
        self.join_handle.is_finished()
    }
}

impl<T> Future for Task<T> {
    type Output = Result<T, task::JoinError>;

    fn poll(
        mut self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Self::Output> {
        Pin::new(&mut self.join_handle).poll(cx)
    }
}

impl<T> Drop for Task<T> {
    fn drop(&mut self) {
        if !self.detached {
            self.join_handle.abort();
        }
    }
}

// ===== impl Signal =====

impl Signal {
    pub fn new() -> Signal {
        let (tx, _rx) = watch::channel(false);
        Signal(Arc::new(tx))
    }

    pub fn set(&self) {
        self.0.send_replace(true);
    }

    pub fn clear(&self) {
        self.0.send_replace(false);
    }

    pub fn is_set(&self) -> bool {
        *self.0.borrow()
    }

    /// Waits until the flag is set.
    ///
    /// Returns immediately if the flag is already set.
    pub async fn wait(&self) {
        let mut rx = self.0.subscribe();
        // The sender outlives the receiver, so this can't fail.
        let _ = rx.wait_for(|set| *set).await;
    }
}

impl Default for Signal {
    fn default() -> Signal {
        Signal::new()
    }
}

// ===== impl Timer =====

impl Timer {
    /// Smallest accepted timeout, in seconds.
    pub const MIN_TIMEOUT: u64 = 1;

    /// Creates a timer that expires `timeout` seconds after being armed.
    pub fn new(timeout: u64) -> Result<Timer, TimerError> {
        if timeout < Self::MIN_TIMEOUT {
            return Err(TimerError::InvalidTimeout(timeout));
        }

        Ok(Timer {
            timeout: Duration::from_secs(timeout),
            initial_time: Arc::new(Mutex::new(Instant::now())),
        })
    }

    /// Returns the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Re-marks the initial time, postponing the deadline.
    pub fn reset(&self) {
        *self.lock() = Instant::now();
    }

    /// Returns the time left before the deadline, or zero if it has already
    /// elapsed.
    pub fn remaining(&self) -> Duration {
        self.deadline().saturating_duration_since(Instant::now())
    }

    /// Waits for a single expiration.
    ///
    /// The `timeout` signal is set if the deadline elapses. A `reset` signal
    /// restarts the countdown, while a `shutdown` signal returns right away
    /// without touching `timeout`.
    pub async fn single_shot(&self, signals: &TimerSignals) {
        self.reset();

        loop {
            tokio::select! {
                biased;
                _ = signals.shutdown.wait() => {
                    return;
                }
                _ = signals.reset.wait() => {
                    signals.reset.clear();
                    self.reset();
                }
                _ = time::sleep_until(self.deadline()) => {
                    trace!(timeout = ?self.timeout, "timer expired");
                    signals.timeout.set();
                    return;
                }
            }
        }
    }

    /// Sets the `timeout` signal once per period until `shutdown` is set.
    ///
    /// The first period starts after `offset`, which allows timers started
    /// at the same time to drift apart.
    pub async fn interval(&self, offset: Duration, signals: &TimerSignals) {
        tokio::select! {
            biased;
            _ = signals.shutdown.wait() => {
                return;
            }
            _ = time::sleep(offset) => {}
        }
        self.reset();

        loop {
            let deadline = self.deadline();
            tokio::select! {
                biased;
                _ = signals.shutdown.wait() => {
                    return;
                }
                _ = time::sleep_until(deadline) => {
                    trace!(timeout = ?self.timeout, "interval timer expired");
                    signals.timeout.set();
                    // Re-arm from the time of expiration, so a late wakeup
                    // fires once instead of catching up on missed periods.
                    self.reset();
                }
            }
        }
    }

    /// Runs [`Timer::single_shot`] on a new task.
    pub fn spawn_single_shot(&self, signals: TimerSignals) -> Task<()> {
        let timer = self.clone();
        Task::spawn(
            async move { timer.single_shot(&signals).await }
                .in_current_span(),
        )
    }

    /// Runs [`Timer::interval`] on a new task.
    pub fn spawn_interval(
        &self,
        offset: Duration,
        signals: TimerSignals,
    ) -> Task<()> {
        let timer = self.clone();
        Task::spawn(
            async move { timer.interval(offset, &signals).await }
                .in_current_span(),
        )
    }

    fn deadline(&self) -> Instant {
        *self.lock() + self.timeout
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Instant> {
        self.initial_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

// ===== impl TimerError =====

impl std::fmt::Display for TimerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimerError::InvalidTimeout(timeout) => write!(
                f,
                "invalid timeout: {}s (minimum is {}s)",
                timeout,
                Timer::MIN_TIMEOUT
            ),
        }
    }
}

impl std::error::Error for TimerError {}
