use crate::error::AggregatorError;
use crate::snapshot::StatsSnapshot;
use core_types::Event;
use parking_lot::{Mutex, RwLock};
use bigdecimal::BigDecimal;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// The rolling period used when none is configured: one minute.
pub const DEFAULT_WINDOW_MILLIS: i64 = 60_000;

/// Calculates the rolling (total, sum, average) of `Event`s in a thread-safe way.
///
/// The heap of admitted events and the running totals live together behind one
/// reader/writer lock:
///
/// - Adding events holds the shared guard while it filters the batch and stages the
///   admitted events, so many writers can admit at once.
/// - Folding staged events into the totals, evicting stale events and reading a
///   snapshot all hold the exclusive guard, so a snapshot never observes a
///   half-applied batch or a half-finished eviction.
#[derive(Debug)]
pub struct RollingAggregator {
    window_millis: i64,
    state: RwLock<WindowState>,
}

#[derive(Debug, Default)]
struct WindowState {
    /// Min-heap on timestamp; only ever drained from the oldest end.
    admitted: BinaryHeap<Reverse<Event>>,
    sum_x: BigDecimal,
    sum_y: i128,
    count: usize,
    /// Events that passed the window test but are not yet in `admitted`.
    /// Always empty once the exclusive guard is released.
    staged: Mutex<Vec<Event>>,
}

impl RollingAggregator {
    /// Creates an aggregator over a trailing window of `window_millis`.
    ///
    /// # Panics
    ///
    /// Panics if `window_millis` is not positive. Configuration validates this first.
    pub fn new(window_millis: i64) -> Self {
        assert!(window_millis > 0, "rolling window must be positive, got {window_millis}");
        Self {
            window_millis,
            state: RwLock::new(WindowState::default()),
        }
    }

    pub fn window_millis(&self) -> i64 {
        self.window_millis
    }

    /// Adds a single event, then evicts anything that has aged out relative to `now`.
    pub fn add_event(&self, event: Event, now: i64) {
        self.add_events(std::iter::once(event), now);
    }

    /// Admits every event inside the window relative to `now` and then evicts stale
    /// events. Events already outside the window are silently dropped.
    pub fn add_events<I>(&self, events: I, now: i64)
    where
        I: IntoIterator<Item = Event>,
    {
        {
            let state = self.state.read();
            let admitted: Vec<Event> = events
                .into_iter()
                .filter(|event| self.is_in_window(event.timestamp, now))
                .collect();
            if !admitted.is_empty() {
                state.staged.lock().extend(admitted);
            }
        }

        let mut state = self.state.write();
        state.fold_staged();
        self.evict_stale(&mut state, now);
    }

    /// Evicts stale events and summarises whatever remains in the window.
    ///
    /// Returns `AggregatorError::EmptyWindow` when nothing is left to summarise.
    pub fn snapshot(&self, now: i64) -> Result<StatsSnapshot, AggregatorError> {
        let mut state = self.state.write();
        state.fold_staged();
        self.evict_stale(&mut state, now);
        StatsSnapshot::from_totals(state.count, state.sum_x.clone(), state.sum_y)
    }

    /// An event exactly `window_millis` old is still inside the window.
    fn is_in_window(&self, timestamp: i64, now: i64) -> bool {
        now.saturating_sub(timestamp) <= self.window_millis
    }

    /// Drains stale events from the oldest end of the heap. Returns how many were removed.
    fn evict_stale(&self, state: &mut WindowState, now: i64) -> usize {
        let mut evicted = 0;
        while let Some(Reverse(oldest)) = state.admitted.peek() {
            if self.is_in_window(oldest.timestamp, now) {
                break;
            }
            if let Some(Reverse(event)) = state.admitted.pop() {
                state.remove_from_totals(&event);
                evicted += 1;
            }
        }

        if evicted > 0 {
            tracing::debug!(evicted, remaining = state.count, now, "Evicted stale events from the rolling window.");
        }
        evicted
    }
}

impl Default for RollingAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_MILLIS)
    }
}

impl WindowState {
    /// Moves staged events into the heap and the running totals.
    /// Requires `&mut self`, i.e. the exclusive guard.
    fn fold_staged(&mut self) {
        let staged = std::mem::take(self.staged.get_mut());
        for event in staged {
            self.sum_x += &event.x;
            self.sum_y += i128::from(event.y);
            self.count += 1;
            self.admitted.push(Reverse(event));
        }
    }

    fn remove_from_totals(&mut self, event: &Event) {
        self.sum_x -= &event.x;
        self.sum_y -= i128::from(event.y);
        self.count -= 1;
    }
}
