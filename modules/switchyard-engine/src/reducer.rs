//! Compiles transition maps into a single dispatching reducer.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use switchyard_events::{Event, Kind};
use tracing::{debug, trace};

use crate::error::Result;
use crate::handler::{Handler, TransitionMap};
use crate::keys::HandlerKey;

/// One transition map, or an ordered sequence merged left to right.
pub enum HandlerSource<S> {
    Single(TransitionMap<S>),
    Sequence(Vec<TransitionMap<S>>),
}

impl<S> HandlerSource<S> {
    fn into_maps(self) -> Vec<TransitionMap<S>> {
        match self {
            HandlerSource::Single(map) => vec![map],
            HandlerSource::Sequence(maps) => maps,
        }
    }
}

impl<S> From<TransitionMap<S>> for HandlerSource<S> {
    fn from(map: TransitionMap<S>) -> Self {
        HandlerSource::Single(map)
    }
}

impl<S> From<Vec<TransitionMap<S>>> for HandlerSource<S> {
    fn from(maps: Vec<TransitionMap<S>>) -> Self {
        HandlerSource::Sequence(maps)
    }
}

impl<S, const N: usize> From<[TransitionMap<S>; N]> for HandlerSource<S> {
    fn from(maps: [TransitionMap<S>; N]) -> Self {
        HandlerSource::Sequence(maps.into())
    }
}

/// A reducer assembled from transition maps.
///
/// Immutable once compiled. Lookups go through a flat kind → handler table
/// built at compile time, so dispatch is a single hash lookup.
pub struct CompiledReducer<S> {
    table: HashMap<Kind, Arc<Handler<S>>>,
    default_state: Option<S>,
}

impl<S> CompiledReducer<S> {
    /// Dispatch `event` against a state the caller already holds.
    ///
    /// Unregistered kinds hand `state` straight back.
    pub fn apply(&self, state: S, event: &Event) -> S {
        match self.table.get(event.kind()) {
            Some(handler) => handler.run(state, event),
            None => {
                trace!(kind = %event.kind(), "No handler registered, passing state through");
                state
            }
        }
    }

    pub fn handles(&self, kind: &Kind) -> bool {
        self.table.contains_key(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &Kind> {
        self.table.keys()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn default_state(&self) -> Option<&S> {
        self.default_state.as_ref()
    }
}

impl<S: Clone> CompiledReducer<S> {
    /// Dispatch with default-state substitution: a missing `state` is
    /// replaced by the default given at compile time. Returns `None` only
    /// when there is neither.
    pub fn reduce(&self, state: Option<S>, event: &Event) -> Option<S> {
        let state = state.or_else(|| self.default_state.clone())?;
        Some(self.apply(state, event))
    }
}

impl<S> fmt::Debug for CompiledReducer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledReducer")
            .field("kinds", &self.table.len())
            .field("has_default_state", &self.default_state.is_some())
            .finish()
    }
}

/// Compile one transition map, or several merged left to right, into a
/// reducer.
///
/// Keys are normalized once here: names and tokens are used as-is,
/// constructors contribute their kind, combined keys expand to each member.
/// When two entries normalize to the same kind the later one wins. Any
/// malformed entry fails the whole compilation.
pub fn compile_reducer<S>(
    source: impl Into<HandlerSource<S>>,
    default_state: Option<S>,
) -> Result<CompiledReducer<S>> {
    let mut table: HashMap<Kind, Arc<Handler<S>>> = HashMap::new();

    for map in source.into().into_maps() {
        for (key, handler) in map.into_entries() {
            handler.validate(&key)?;
            let kinds = key.normalize()?;
            let handler = Arc::new(handler);
            for kind in kinds {
                if table.insert(kind.clone(), Arc::clone(&handler)).is_some() {
                    trace!(%kind, "Later handler replaces an earlier registration");
                }
            }
        }
    }

    debug!(
        kinds = table.len(),
        has_default_state = default_state.is_some(),
        "Compiled reducer"
    );

    Ok(CompiledReducer {
        table,
        default_state,
    })
}

/// A reducer for a single key. The default state is mandatory.
pub fn handle_event<S>(
    key: impl Into<HandlerKey>,
    handler: impl Into<Handler<S>>,
    default_state: S,
) -> Result<CompiledReducer<S>> {
    let mut map = TransitionMap::new();
    map.insert(key, handler.into());
    compile_reducer(map, Some(default_state))
}
