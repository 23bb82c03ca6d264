//! Timer-driven task scheduling.
//!
//! A [`Scheduler`] wraps a callback and arms it on a tokio timer: one-shot
//! with [`delay`](Scheduler::delay), recurring with
//! [`repeat`](Scheduler::repeat). The statechart core has no dependency on
//! this module; it is an independent utility, typically composed with the
//! event bus to publish an event later.
//!
//! Arming methods spawn onto the ambient tokio runtime and must be called
//! within one.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;

/// The wrapped callback.
pub type Task = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cadence {
    Delay(Duration),
    Repeat(Duration),
}

/// A scheduled task with a re-armable timer.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use trellis::timer::Scheduler;
///
/// # async fn demo() {
/// let mut autosave = Scheduler::new(|| println!("saving"));
/// autosave.repeat(Duration::from_secs(30));
///
/// // Something important happened; save immediately and restart the cycle.
/// autosave.now();
/// autosave.reset();
/// # }
/// ```
pub struct Scheduler {
    task: Task,
    cadence: Option<Cadence>,
    handle: Option<JoinHandle<()>>,
}

impl Scheduler {
    /// Wrap a callback. Nothing is armed yet.
    pub fn new<F>(task: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            task: Arc::new(task),
            cadence: None,
            handle: None,
        }
    }

    /// Run the task immediately, synchronously. Any armed timer is
    /// unaffected.
    pub fn now(&self) -> &Self {
        (self.task)();
        self
    }

    /// Arm a one-shot timer, replacing whatever was armed before.
    pub fn delay(&mut self, timeout: Duration) -> &mut Self {
        self.stop();
        self.cadence = Some(Cadence::Delay(timeout));
        let task = Arc::clone(&self.task);
        self.handle = Some(tokio::spawn(async move {
            time::sleep(timeout).await;
            task();
        }));
        self
    }

    /// Arm a recurring timer, replacing whatever was armed before.
    ///
    /// The first run happens one full interval from now.
    pub fn repeat(&mut self, every: Duration) -> &mut Self {
        self.stop();
        self.cadence = Some(Cadence::Repeat(every));
        let task = Arc::clone(&self.task);
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = time::interval(every);
            // The first tick of an interval completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                task();
            }
        }));
        self
    }

    /// Disarm the timer. The last-used cadence is remembered for
    /// [`reset`](Self::reset).
    pub fn stop(&mut self) -> &mut Self {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self
    }

    /// Re-arm using the last-used cadence, postponing the next run by a
    /// full delay or interval. Does nothing if never armed.
    pub fn reset(&mut self) -> &mut Self {
        match self.cadence {
            Some(Cadence::Delay(timeout)) => self.delay(timeout),
            Some(Cadence::Repeat(every)) => self.repeat(every),
            None => self,
        }
    }

    /// Whether a timer is currently armed.
    pub fn is_armed(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("cadence", &self.cadence)
            .field("armed", &self.is_armed())
            .finish()
    }
}
