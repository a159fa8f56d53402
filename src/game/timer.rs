//! Cancelable discussion countdown.
//!
//! The countdown runs as a tokio task and publishes `DiscussionState` through
//! a watch channel. Ticks and cancellation both go through the channel's
//! modify path and carry a generation number, so once `cancel` returns no
//! further decrement is ever observed, even if the task is mid-tick.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info};

use crate::error::{GameError, GameResult};
use crate::game::model::DiscussionState;

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct DiscussionTimer {
    state: Arc<watch::Sender<DiscussionState>>,
    // Bumped on every start and cancel; ticks from older countdowns are ignored
    generation: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl DiscussionTimer {
    pub fn new(timer_enabled: bool, seconds: u32) -> Self {
        let (state, _) = watch::channel(DiscussionState {
            timer_enabled,
            seconds_remaining: seconds,
            is_running: false,
        });
        Self {
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
            task: None,
        }
    }

    pub fn state(&self) -> DiscussionState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<DiscussionState> {
        self.state.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().is_running
    }

    /// Start counting down from `initial_seconds`. A no-op while a countdown
    /// is already running.
    pub fn start(&mut self, initial_seconds: u32) -> GameResult<()> {
        if self.is_running() {
            return Ok(());
        }
        let handle = Handle::try_current().map_err(|_| GameError::NoRuntime)?;
        if let Some(previous) = self.task.take() {
            previous.abort();
        }

        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
            state.seconds_remaining = initial_seconds;
            state.is_running = initial_seconds > 0;
        });
        if initial_seconds == 0 {
            return Ok(());
        }

        info!(seconds = initial_seconds, "discussion timer started");
        self.task = Some(handle.spawn(run_countdown(
            self.state.clone(),
            self.generation.clone(),
            generation,
        )));
        Ok(())
    }

    /// Freeze the countdown at its current value. Safe to call when idle.
    pub fn cancel(&mut self) {
        let stopped = self.state.send_if_modified(|state| {
            self.generation.fetch_add(1, Ordering::AcqRel);
            let was_running = state.is_running;
            state.is_running = false;
            was_running
        });
        if let Some(task) = self.task.take() {
            task.abort();
        }
        if stopped {
            info!(
                seconds_remaining = self.state().seconds_remaining,
                "discussion timer canceled"
            );
        }
    }
}

impl Drop for DiscussionTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run_countdown(
    state: Arc<watch::Sender<DiscussionState>>,
    generation: Arc<AtomicU64>,
    own_generation: u64,
) {
    let mut ticks = interval_at(Instant::now() + TICK, TICK);
    loop {
        ticks.tick().await;
        let mut keep_going = false;
        state.send_if_modified(|current| {
            if generation.load(Ordering::Acquire) != own_generation || !current.is_running {
                return false;
            }
            current.seconds_remaining = current.seconds_remaining.saturating_sub(1);
            if current.seconds_remaining == 0 {
                current.is_running = false;
            } else {
                keep_going = true;
            }
            true
        });
        if !keep_going {
            break;
        }
    }
    if state.borrow().seconds_remaining == 0 {
        debug!("discussion timer finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_countdown_and_cancel() {
        let mut timer = DiscussionTimer::new(true, 30);
        timer.start(30).unwrap();
        assert!(timer.is_running());

        tokio::time::sleep(Duration::from_millis(5_500)).await;
        assert_eq!(timer.state().seconds_remaining, 25);
        assert!(timer.is_running());

        timer.cancel();
        assert_eq!(timer.state().seconds_remaining, 25);
        assert!(!timer.is_running());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(timer.state().seconds_remaining, 25);
        assert!(!timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_while_running_is_noop() {
        let mut timer = DiscussionTimer::new(true, 60);
        timer.start(60).unwrap();
        tokio::time::sleep(Duration::from_millis(3_500)).await;
        timer.start(60).unwrap();
        assert_eq!(timer.state().seconds_remaining, 57);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(timer.state().seconds_remaining, 55);
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_down_to_zero_and_stops() {
        let mut timer = DiscussionTimer::new(true, 3);
        let mut updates = timer.subscribe();
        timer.start(3).unwrap();

        tokio::time::sleep(Duration::from_secs(10)).await;
        let state = timer.state();
        assert_eq!(state.seconds_remaining, 0);
        assert!(!state.is_running);
        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().seconds_remaining, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_after_cancel() {
        let mut timer = DiscussionTimer::new(true, 30);
        timer.start(30).unwrap();
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        timer.cancel();
        let remaining = timer.state().seconds_remaining;
        assert_eq!(remaining, 28);

        timer.start(remaining).unwrap();
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(timer.state().seconds_remaining, 27);
        assert!(timer.is_running());
    }

    #[test]
    fn test_cancel_when_idle_and_no_runtime() {
        let mut timer = DiscussionTimer::new(false, 30);
        timer.cancel();
        assert_eq!(
            timer.state(),
            DiscussionState {
                timer_enabled: false,
                seconds_remaining: 30,
                is_running: false,
            }
        );
        assert_eq!(timer.start(30), Err(GameError::NoRuntime));
    }
}
