//! Transition functions and the maps that register them.

use std::fmt;
use std::sync::Arc;

use switchyard_events::Event;

use crate::error::{CompileError, Result};
use crate::keys::HandlerKey;

/// `(state, event) -> new state`. Must treat `state` as read-only.
pub type Transition<S> = Arc<dyn Fn(&S, &Event) -> S + Send + Sync>;

/// Normal/failure sub-dispatch for one kind.
///
/// `next` runs for ordinary events, `throw` for events flagged as failures.
/// A missing branch leaves the state unchanged.
pub struct Branches<S> {
    next: Option<Transition<S>>,
    throw: Option<Transition<S>>,
}

impl<S> Branches<S> {
    pub fn new() -> Self {
        Self {
            next: None,
            throw: None,
        }
    }

    pub fn next<F>(mut self, transition: F) -> Self
    where
        F: Fn(&S, &Event) -> S + Send + Sync + 'static,
    {
        self.next = Some(Arc::new(transition));
        self
    }

    pub fn throw<F>(mut self, transition: F) -> Self
    where
        F: Fn(&S, &Event) -> S + Send + Sync + 'static,
    {
        self.throw = Some(Arc::new(transition));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.next.is_none() && self.throw.is_none()
    }

    fn select(&self, event: &Event) -> Option<&Transition<S>> {
        if event.is_failure() {
            self.throw.as_ref()
        } else {
            self.next.as_ref()
        }
    }
}

impl<S> Default for Branches<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for Branches<S> {
    fn clone(&self) -> Self {
        Self {
            next: self.next.clone(),
            throw: self.throw.clone(),
        }
    }
}

impl<S> fmt::Debug for Branches<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Branches")
            .field("next", &self.next.is_some())
            .field("throw", &self.throw.is_some())
            .finish()
    }
}

/// What a key resolves to.
pub enum Handler<S> {
    Transition(Transition<S>),
    Branches(Branches<S>),
}

impl<S> Handler<S> {
    pub fn transition<F>(transition: F) -> Self
    where
        F: Fn(&S, &Event) -> S + Send + Sync + 'static,
    {
        Handler::Transition(Arc::new(transition))
    }

    pub(crate) fn validate(&self, key: &HandlerKey) -> Result<()> {
        match self {
            Handler::Branches(branches) if branches.is_empty() => {
                Err(CompileError::InvalidHandlerMap {
                    key: key.to_string(),
                    reason: "expected at least one of `next` or `throw`".into(),
                })
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn run(&self, state: S, event: &Event) -> S {
        let transition = match self {
            Handler::Transition(transition) => transition,
            Handler::Branches(branches) => match branches.select(event) {
                Some(transition) => transition,
                None => return state,
            },
        };
        transition(&state, event)
    }
}

impl<S> Clone for Handler<S> {
    fn clone(&self) -> Self {
        match self {
            Handler::Transition(transition) => Handler::Transition(Arc::clone(transition)),
            Handler::Branches(branches) => Handler::Branches(branches.clone()),
        }
    }
}

impl<S> fmt::Debug for Handler<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Transition(_) => f.write_str("Transition(..)"),
            Handler::Branches(branches) => fmt::Debug::fmt(branches, f),
        }
    }
}

impl<S> From<Branches<S>> for Handler<S> {
    fn from(branches: Branches<S>) -> Self {
        Handler::Branches(branches)
    }
}

/// An ordered list of key → handler registrations.
///
/// Later registrations for the same kind replace earlier ones when compiled.
pub struct TransitionMap<S> {
    entries: Vec<(HandlerKey, Handler<S>)>,
}

impl<S> TransitionMap<S> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a transition.
    pub fn on<F>(mut self, key: impl Into<HandlerKey>, transition: F) -> Self
    where
        F: Fn(&S, &Event) -> S + Send + Sync + 'static,
    {
        self.insert(key, Handler::transition(transition));
        self
    }

    /// Register a normal/failure pair.
    pub fn on_branches(mut self, key: impl Into<HandlerKey>, branches: Branches<S>) -> Self {
        self.insert(key, Handler::Branches(branches));
        self
    }

    pub fn insert(&mut self, key: impl Into<HandlerKey>, handler: Handler<S>) {
        self.entries.push((key.into(), handler));
    }

    pub fn keys(&self) -> impl Iterator<Item = &HandlerKey> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> Vec<(HandlerKey, Handler<S>)> {
        self.entries
    }
}

impl<S> Default for TransitionMap<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for TransitionMap<S> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<S> fmt::Debug for TransitionMap<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(key, handler)| (key.to_string(), handler)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(n: i64) -> impl Fn(&i64, &Event) -> i64 + Send + Sync + 'static {
        move |state: &i64, _: &Event| state + n
    }

    #[test]
    fn branches_pick_by_failure_flag() {
        let handler = Handler::from(Branches::new().next(add(1)).throw(add(-1)));
        assert_eq!(handler.run(10, &Event::new("X")), 11);
        assert_eq!(handler.run(10, &Event::new("X").as_failure()), 9);
    }

    #[test]
    fn missing_branch_is_identity() {
        let only_next = Handler::from(Branches::new().next(add(1)));
        assert_eq!(only_next.run(10, &Event::new("X").as_failure()), 10);

        let only_throw = Handler::from(Branches::new().throw(add(1)));
        assert_eq!(only_throw.run(10, &Event::new("X")), 10);
    }

    #[test]
    fn empty_branches_fail_validation() {
        let handler: Handler<i64> = Branches::new().into();
        let err = handler.validate(&HandlerKey::from("FETCH")).unwrap_err();
        assert!(matches!(err, CompileError::InvalidHandlerMap { key, .. } if key == "FETCH"));
    }

    #[test]
    fn map_keeps_registration_order() {
        let map = TransitionMap::new().on("B", add(1)).on("A", add(2));
        let keys: Vec<String> = map.keys().map(ToString::to_string).collect();
        assert_eq!(keys, ["B", "A"]);
    }
}
