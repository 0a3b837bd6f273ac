//! Countdown engine
//!
//! `decompose` is the pure part: a signed millisecond delta becomes a
//! [`Remaining`]. The engine wraps it in a per-display tick loop that
//! publishes [`CountdownState`] snapshots until the target passes or the
//! handle is stopped.

use chrono::{DateTime, Local};
use eventhub_api::{
    Breakdown, CountdownState, Remaining, MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE,
    MILLIS_PER_SECOND,
};
use eventhub_util::{format_datetime_full, millis_until, CountdownId};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Default re-evaluation period
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1000);

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Split the time left until a target into days, hours, minutes and seconds.
///
/// `delta_ms <= 0` means the target has been reached.
pub fn decompose(delta_ms: i64) -> Remaining {
    if delta_ms <= 0 {
        return Remaining::Expired;
    }

    let delta = delta_ms as u64;
    Remaining::Left(Breakdown {
        days: delta / MILLIS_PER_DAY,
        hours: (delta / MILLIS_PER_HOUR) % 24,
        minutes: (delta / MILLIS_PER_MINUTE) % 60,
        seconds: (delta / MILLIS_PER_SECOND) % 60,
    })
}

/// Snapshot for `target` as seen at `now`
pub fn evaluate(target: DateTime<Local>, now: DateTime<Local>) -> CountdownState {
    CountdownState {
        target,
        remaining: decompose(millis_until(&target, &now)),
        evaluated_at: now,
    }
}

/// Source of wall-clock time for countdowns
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Real local time. Honours the development mock-time override.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        eventhub_util::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Local>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, now: DateTime<Local>) {
        *lock(&self.now) = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = lock(&self.now);
        *now += chrono::Duration::milliseconds(by.as_millis() as i64);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *lock(&self.now)
    }
}

type Publisher = Arc<Mutex<Option<watch::Sender<CountdownState>>>>;

/// Starts countdowns that share a clock and tick interval
#[derive(Clone)]
pub struct CountdownEngine {
    clock: Arc<dyn Clock>,
    tick_interval: Duration,
}

impl CountdownEngine {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }

    /// Engine on the system clock with the default interval
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    /// Override the tick interval. A zero interval is raised to one millisecond.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval.max(Duration::from_millis(1));
        self
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Begin counting down to `target`.
    ///
    /// The first snapshot is computed before this returns. A target already in
    /// the past yields a handle that is `Expired` and never ticks. Must be
    /// called from within a tokio runtime.
    pub fn start(&self, target: DateTime<Local>) -> CountdownHandle {
        let id = CountdownId::new();
        let initial = evaluate(target, self.clock.now());
        let expired = initial.remaining.is_expired();
        let (sender, receiver) = watch::channel(initial);

        if expired {
            debug!(countdown_id = %id, target = %format_datetime_full(&target), "Countdown started already expired");
            return CountdownHandle {
                id,
                publisher: Arc::new(Mutex::new(None)),
                receiver,
                task: None,
            };
        }

        let publisher: Publisher = Arc::new(Mutex::new(Some(sender)));
        let task = tokio::spawn(run_ticks(
            id,
            target,
            self.clock.clone(),
            self.tick_interval,
            publisher.clone(),
        ));

        debug!(
            countdown_id = %id,
            target = %format_datetime_full(&target),
            interval_ms = self.tick_interval.as_millis() as u64,
            "Countdown started"
        );

        CountdownHandle {
            id,
            publisher,
            receiver,
            task: Some(task),
        }
    }
}

async fn run_ticks(
    id: CountdownId,
    target: DateTime<Local>,
    clock: Arc<dyn Clock>,
    interval: Duration,
    publisher: Publisher,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick fires immediately; the initial snapshot is already published
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let state = evaluate(target, clock.now());
        let expired = state.remaining.is_expired();

        let mut slot = lock(&publisher);
        let Some(sender) = slot.as_ref() else {
            return;
        };
        sender.send_replace(state);

        if expired {
            // Dropping the sender ends the stream; the last value stays Expired
            slot.take();
            info!(countdown_id = %id, "Countdown reached target");
            return;
        }
    }
}

/// A running (or finished) countdown.
///
/// Dropping the handle stops it.
pub struct CountdownHandle {
    id: CountdownId,
    publisher: Publisher,
    receiver: watch::Receiver<CountdownState>,
    task: Option<JoinHandle<()>>,
}

impl CountdownHandle {
    pub fn id(&self) -> CountdownId {
        self.id
    }

    /// Latest published snapshot
    pub fn current(&self) -> CountdownState {
        self.receiver.borrow().clone()
    }

    /// Receiver for every later snapshot. `changed()` errors once the countdown ends.
    pub fn subscribe(&self) -> watch::Receiver<CountdownState> {
        self.receiver.clone()
    }

    /// Whether snapshots may still be published
    pub fn is_active(&self) -> bool {
        lock(&self.publisher).is_some()
    }

    /// Stop ticking. No snapshot is published after this returns.
    ///
    /// Stopping twice does nothing the second time.
    pub fn stop(&mut self) {
        let was_active = lock(&self.publisher).take().is_some();
        if let Some(task) = self.task.take() {
            task.abort();
        }

        if was_active {
            debug!(countdown_id = %self.id, "Countdown stopped");
        }
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for CountdownHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountdownHandle")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
