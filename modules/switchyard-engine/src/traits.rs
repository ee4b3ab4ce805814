//! Core traits for the reducer runtime.

use std::sync::Arc;

use switchyard_events::{Event, Kind};

use crate::reducer::CompiledReducer;

/// Pure state updates. No I/O, no side effects.
///
/// A missing state means "start from the reducer's default". Implementations
/// must not mutate the event and must return the same output for the same
/// (state, event) pair.
pub trait Reducer<S>: Send + Sync {
    fn reduce(&self, state: Option<S>, event: &Event) -> Option<S>;

    /// Whether `kind` has a registered transition. Used for dispatch
    /// bookkeeping only; unregistered kinds still pass through `reduce`.
    fn handles(&self, _kind: &Kind) -> bool {
        true
    }
}

impl<S> Reducer<S> for CompiledReducer<S>
where
    S: Clone + Send + Sync,
{
    fn reduce(&self, state: Option<S>, event: &Event) -> Option<S> {
        CompiledReducer::reduce(self, state, event)
    }

    fn handles(&self, kind: &Kind) -> bool {
        CompiledReducer::handles(self, kind)
    }
}

// ---------------------------------------------------------------------------
// Arc<R> blanket: lets one compiled reducer back several stores
// ---------------------------------------------------------------------------

impl<S, R: Reducer<S> + ?Sized> Reducer<S> for Arc<R> {
    fn reduce(&self, state: Option<S>, event: &Event) -> Option<S> {
        (**self).reduce(state, event)
    }

    fn handles(&self, kind: &Kind) -> bool {
        (**self).handles(kind)
    }
}
