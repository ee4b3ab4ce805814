//! The dispatch loop.

use chrono::{DateTime, Utc};
use serde::Serialize;
use switchyard_events::{Event, Kind};
use tracing::debug;

use crate::traits::Reducer;

/// One entry in a store's dispatch history.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchRecord {
    pub seq: u64,
    pub ts: DateTime<Utc>,
    pub kind: Kind,
    /// Whether the reducer had a transition registered for `kind`.
    pub handled: bool,
}

/// Holds the current state and folds events into it through a reducer.
///
/// Dispatch → reduce → record. Nothing is persisted; the history lives in
/// memory for inspection and tests.
pub struct Store<S, R>
where
    R: Reducer<S>,
{
    reducer: R,
    state: Option<S>,
    next_seq: u64,
    history: Vec<DispatchRecord>,
}

impl<S, R> Store<S, R>
where
    R: Reducer<S>,
{
    /// `initial` may be `None` to start from the reducer's default state on
    /// the first dispatch.
    pub fn new(reducer: R, initial: Option<S>) -> Self {
        Self {
            reducer,
            state: initial,
            next_seq: 1,
            history: Vec::new(),
        }
    }

    /// Fold one event into the held state.
    pub fn dispatch(&mut self, event: &Event) -> Option<&S> {
        let previous = self.state.take();
        self.state = self.reducer.reduce(previous, event);

        let record = DispatchRecord {
            seq: self.next_seq,
            ts: Utc::now(),
            kind: event.kind().clone(),
            handled: self.reducer.handles(event.kind()),
        };
        debug!(
            seq = record.seq,
            kind = %record.kind,
            handled = record.handled,
            "Dispatched event"
        );
        self.next_seq += 1;
        self.history.push(record);

        self.state.as_ref()
    }

    /// Fold a sequence of events in order.
    pub fn replay<'a, I>(&mut self, events: I) -> Option<&S>
    where
        I: IntoIterator<Item = &'a Event>,
    {
        for event in events {
            self.dispatch(event);
        }
        self.state.as_ref()
    }

    pub fn state(&self) -> Option<&S> {
        self.state.as_ref()
    }

    /// Every dispatch so far, oldest first.
    pub fn history(&self) -> &[DispatchRecord] {
        &self.history
    }

    pub fn reducer(&self) -> &R {
        &self.reducer
    }

    pub fn into_state(self) -> Option<S> {
        self.state
    }
}
