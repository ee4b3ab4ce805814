//! Event constructors: reusable builders for events of one fixed kind.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::trace;

use crate::error::{EventError, Result};
use crate::kind::Kind;
use crate::types::Event;

/// Shapes constructor arguments into a payload. `None` means no payload.
pub type PayloadShaper = Arc<dyn Fn(&[Value]) -> Option<Value> + Send + Sync>;

/// Shapes constructor arguments into extra top-level event fields.
pub type MetaShaper = Arc<dyn Fn(&[Value]) -> Option<Map<String, Value>> + Send + Sync>;

pub fn payload_shaper<F>(shape: F) -> PayloadShaper
where
    F: Fn(&[Value]) -> Option<Value> + Send + Sync + 'static,
{
    Arc::new(shape)
}

pub fn meta_shaper<F>(shape: F) -> MetaShaper
where
    F: Fn(&[Value]) -> Option<Map<String, Value>> + Send + Sync + 'static,
{
    Arc::new(shape)
}

/// What a constructor is invoked with.
#[derive(Debug, Clone)]
pub enum Input {
    /// Raw arguments, run through the shapers.
    Args(Vec<Value>),
    /// An already-built event to re-tag with this constructor's kind.
    /// Its payload and metadata pass through untouched.
    Event(Event),
}

/// Builds events of a single kind.
///
/// Cheap to clone and immutable once built. Displays as its kind and
/// converts into a [`Kind`], so it can be used wherever a kind is expected.
#[derive(Clone)]
pub struct EventConstructor {
    kind: Kind,
    payload: Option<PayloadShaper>,
    meta: Option<MetaShaper>,
}

impl EventConstructor {
    pub fn new(kind: impl Into<Kind>) -> Result<Self> {
        Self::with_shapers(kind, None, None)
    }

    pub fn with_shapers(
        kind: impl Into<Kind>,
        payload: Option<PayloadShaper>,
        meta: Option<MetaShaper>,
    ) -> Result<Self> {
        let kind = kind.into();
        if kind.is_empty() {
            return Err(EventError::InvalidKind);
        }
        trace!(%kind, "Created event constructor");
        Ok(Self {
            kind,
            payload,
            meta,
        })
    }

    pub fn with_payload<F>(mut self, shape: F) -> Self
    where
        F: Fn(&[Value]) -> Option<Value> + Send + Sync + 'static,
    {
        self.payload = Some(Arc::new(shape));
        self
    }

    pub fn with_meta<F>(mut self, shape: F) -> Self
    where
        F: Fn(&[Value]) -> Option<Map<String, Value>> + Send + Sync + 'static,
    {
        self.meta = Some(Arc::new(shape));
        self
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn invoke(&self, input: Input) -> Event {
        match input {
            Input::Args(args) => self.build(&args),
            Input::Event(event) => event.with_kind(self.kind.clone()),
        }
    }

    /// Build from a single argument.
    pub fn create(&self, arg: impl Into<Value>) -> Event {
        self.build(&[arg.into()])
    }

    /// Build from an ordered list of arguments.
    pub fn create_with<I, V>(&self, args: I) -> Event
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let args: Vec<Value> = args.into_iter().map(Into::into).collect();
        self.build(&args)
    }

    /// Build with no arguments.
    pub fn emit(&self) -> Event {
        self.build(&[])
    }

    pub fn retag(&self, event: Event) -> Event {
        self.invoke(Input::Event(event))
    }

    /// A failure event: the error text as payload and the failure flag set.
    /// Shapers are bypassed.
    pub fn fail(&self, error: impl fmt::Display) -> Event {
        Event::new(self.kind.clone())
            .with_payload(error.to_string())
            .as_failure()
    }

    fn build(&self, args: &[Value]) -> Event {
        let payload = match &self.payload {
            Some(shape) => shape(args),
            None => default_payload(args),
        };

        let mut event = Event::new(self.kind.clone());
        if let Some(payload) = payload {
            event = event.with_payload(payload);
        }
        if let Some(fields) = self.meta.as_ref().and_then(|shape| shape(args)) {
            event = event.with_meta(fields);
        }
        event
    }
}

fn default_payload(args: &[Value]) -> Option<Value> {
    match args {
        [] => None,
        [single] => Some(single.clone()),
        many => Some(Value::Array(many.to_vec())),
    }
}

impl fmt::Debug for EventConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventConstructor")
            .field("kind", &self.kind)
            .field("payload_shaper", &self.payload.is_some())
            .field("meta_shaper", &self.meta.is_some())
            .finish()
    }
}

impl fmt::Display for EventConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

impl From<&EventConstructor> for Kind {
    fn from(constructor: &EventConstructor) -> Self {
        constructor.kind.clone()
    }
}

impl From<EventConstructor> for Kind {
    fn from(constructor: EventConstructor) -> Self {
        constructor.kind
    }
}

/// Build a constructor for `kind` with optional payload and metadata shapers.
pub fn create_event_constructor(
    kind: impl Into<Kind>,
    payload: Option<PayloadShaper>,
    meta: Option<MetaShaper>,
) -> Result<EventConstructor> {
    EventConstructor::with_shapers(kind, payload, meta)
}
