//! One-second tick background task

use std::{future::Future, sync::Arc, time::Duration};
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::{
    services::Alarm,
    state::{AppState, TickOutcome},
};

/// A periodic event source driving the timer
pub trait TickSource: Send {
    /// Wait for the next tick
    fn tick(&mut self) -> impl Future<Output = ()> + Send;

    /// Restart the period so the next tick is a full period away
    fn reset(&mut self);
}

/// Wall-clock tick source backed by a tokio interval
#[derive(Debug)]
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

impl TickSource for IntervalTicker {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }

    fn reset(&mut self) {
        self.interval.reset();
    }
}

/// Background task that feeds ticks into the timer while it is running
pub async fn ticker_task<T, A>(state: Arc<AppState>, mut source: T, alarm: A)
where
    T: TickSource,
    A: Alarm,
{
    info!("Starting ticker task");

    let mut updates = state.subscribe();
    let mut was_running = false;

    loop {
        // An unreadable timer is treated as paused until the next update
        let running = state.is_running().unwrap_or_else(|e| {
            error!("Failed to read timer state: {}", e);
            false
        });

        if !running {
            was_running = false;
            // Paused or stopped: no ticks until something changes
            if updates.changed().await.is_err() {
                break;
            }
            continue;
        }

        if !was_running {
            debug!("Timer running, restarting tick period");
            source.reset();
            was_running = true;
        }

        tokio::select! {
            _ = source.tick() => {
                match state.tick() {
                    Ok(TickOutcome::Switched { to }) => {
                        if let Err(e) = alarm.ring(to).await {
                            warn!("Alarm failed: {}", e);
                        }
                    }
                    Ok(_) => {}
                    Err(e) => error!("Failed to tick timer: {}", e),
                }
            }

            // Re-check the run flag whenever the timer changes
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    info!("Ticker task stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    use crate::state::{Mode, TimerState};

    /// Tick source driven by hand through a channel
    struct ManualTicker {
        rx: mpsc::UnboundedReceiver<()>,
        resets: Arc<Mutex<usize>>,
    }

    impl TickSource for ManualTicker {
        async fn tick(&mut self) {
            if self.rx.recv().await.is_none() {
                std::future::pending::<()>().await;
            }
        }

        /// Like `Interval::reset`, a restart discards ticks that were already due
        fn reset(&mut self) {
            while self.rx.try_recv().is_ok() {}
            *self.resets.lock().unwrap() += 1;
        }
    }

    #[derive(Clone, Default)]
    struct RecordingAlarm {
        rings: Arc<Mutex<Vec<Mode>>>,
    }

    impl Alarm for RecordingAlarm {
        async fn ring(&self, next: Mode) -> Result<(), String> {
            self.rings.lock().unwrap().push(next);
            Err("speaker unplugged".to_string())
        }
    }

    struct Harness {
        state: Arc<AppState>,
        task: tokio::task::JoinHandle<()>,
        ticks: mpsc::UnboundedSender<()>,
        resets: Arc<Mutex<usize>>,
        alarm: RecordingAlarm,
    }

    fn spawn_ticker(timer: TimerState) -> Harness {
        let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), timer, 60));
        let (ticks, rx) = mpsc::unbounded_channel();
        let resets = Arc::new(Mutex::new(0));
        let alarm = RecordingAlarm::default();
        let source = ManualTicker { rx, resets: Arc::clone(&resets) };
        let task = tokio::spawn(ticker_task(Arc::clone(&state), source, alarm.clone()));
        Harness { state, task, ticks, resets, alarm }
    }

    /// Send one tick and wait for the published snapshot it produces
    async fn tick_once(harness: &Harness) -> TimerState {
        let mut rx = harness.state.subscribe();
        harness.ticks.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(5), rx.changed())
            .await
            .expect("tick was not processed")
            .unwrap();
        let timer = rx.borrow().clone();
        timer
    }

    /// Let the spawned task run until it is parked again
    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn ticks_count_down_only_while_running() {
        let harness = spawn_ticker(TimerState::new());
        settle().await;

        // Ticks sent while paused are not applied, and starting discards them
        harness.ticks.send(()).unwrap();
        settle().await;
        assert_eq!(harness.state.snapshot().unwrap().focus.left, 1500);

        harness.state.start().unwrap();
        settle().await;
        assert_eq!(harness.state.snapshot().unwrap().focus.left, 1500);
        assert_eq!(*harness.resets.lock().unwrap(), 1);

        let timer = tick_once(&harness).await;
        assert_eq!(timer.focus.left, 1499);

        harness.state.pause().unwrap();
        settle().await;
        let paused_at = harness.state.snapshot().unwrap().focus.left;
        harness.ticks.send(()).unwrap();
        settle().await;
        assert_eq!(harness.state.snapshot().unwrap().focus.left, paused_at);
    }

    #[tokio::test]
    async fn exhausted_interval_rings_once_and_switches() {
        let mut timer = TimerState::new();
        timer.focus.left = 1;
        let harness = spawn_ticker(timer);
        settle().await;
        harness.state.start().unwrap();
        settle().await;

        let timer = tick_once(&harness).await;
        assert_eq!(timer.focus.left, 0);
        assert!(harness.alarm.rings.lock().unwrap().is_empty());

        let timer = tick_once(&harness).await;
        assert_eq!(timer.mode, Mode::Break);
        assert_eq!(timer.focus.left, timer.focus.max);
        assert_eq!(timer.break_.left, timer.break_.max);

        // A failing alarm does not stop the countdown
        let timer = tick_once(&harness).await;
        assert_eq!(timer.break_.left, 299);
        assert_eq!(*harness.alarm.rings.lock().unwrap(), vec![Mode::Break]);
    }

    #[tokio::test]
    async fn poisoned_timer_parks_the_task_instead_of_ending_it() {
        let harness = spawn_ticker(TimerState::new());
        settle().await;
        harness.state.start().unwrap();
        settle().await;
        assert_eq!(tick_once(&harness).await.focus.left, 1499);

        let state = Arc::clone(&harness.state);
        let poisoner = std::thread::spawn(move || {
            let _guard = state.timer.lock().unwrap();
            panic!("poison the timer lock");
        });
        assert!(poisoner.join().is_err());
        assert!(harness.state.snapshot().is_err());

        harness.ticks.send(()).unwrap();
        settle().await;
        harness.ticks.send(()).unwrap();
        settle().await;
        assert!(!harness.task.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn interval_ticker_waits_a_full_period_and_idles_while_paused() {
        let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), TimerState::new(), 60));
        let source = IntervalTicker::new(Duration::from_secs(1));
        tokio::spawn(ticker_task(Arc::clone(&state), source, RecordingAlarm::default()));
        settle().await;

        state.start().unwrap();
        settle().await;

        tokio::time::advance(Duration::from_millis(999)).await;
        settle().await;
        assert_eq!(state.snapshot().unwrap().focus.left, 1500);

        tokio::time::advance(Duration::from_millis(2)).await;
        settle().await;
        assert_eq!(state.snapshot().unwrap().focus.left, 1499);

        for _ in 0..10 {
            tokio::time::advance(Duration::from_secs(1)).await;
            settle().await;
        }
        assert_eq!(state.snapshot().unwrap().focus.left, 1489);

        state.pause().unwrap();
        settle().await;
        for _ in 0..10 {
            tokio::time::advance(Duration::from_secs(1)).await;
            settle().await;
        }
        assert_eq!(state.snapshot().unwrap().focus.left, 1489);
    }
}
