//! The event record reducers dispatch on.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::kind::Kind;
use crate::merge::merge;

/// Metadata field that marks an event as a failure.
pub const FAILURE_FIELD: &str = "error";

const RESERVED_FIELDS: [&str; 2] = ["kind", "payload"];

/// Something that happened: a kind, an optional payload, and any extra
/// top-level fields.
///
/// Serialized flat: `{"kind": .., "payload": .., <meta fields>}`, with
/// `payload` omitted when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    kind: Kind,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    payload: Option<Value>,
    #[serde(flatten)]
    meta: Map<String, Value>,
}

/// A present `payload` field is kept even when it is `null`; only a missing
/// field reads back as `None`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl Event {
    pub fn new(kind: impl Into<Kind>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
            meta: Map::new(),
        }
    }

    pub fn with_payload(mut self, payload: impl Into<Value>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Shallow-merge `fields` into the metadata. `kind` and `payload` are
    /// not metadata and are dropped.
    pub fn with_meta(mut self, mut fields: Map<String, Value>) -> Self {
        for reserved in RESERVED_FIELDS {
            if fields.remove(reserved).is_some() {
                debug!(field = reserved, kind = %self.kind, "Dropped reserved metadata field");
            }
        }
        self.meta = merge(&self.meta, &fields);
        self
    }

    pub fn with_field(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut fields = Map::new();
        fields.insert(name.into(), value.into());
        self.with_meta(fields)
    }

    /// Mark the event as a failure, routing it to `throw` branches.
    pub fn as_failure(self) -> Self {
        self.with_field(FAILURE_FIELD, true)
    }

    pub(crate) fn with_kind(mut self, kind: Kind) -> Self {
        self.kind = kind;
        self
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Decode the payload into `T`. `None` if absent or of the wrong shape.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Option<T> {
        self.payload
            .as_ref()
            .and_then(|payload| T::deserialize(payload).ok())
    }

    pub fn meta(&self) -> &Map<String, Value> {
        &self.meta
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.meta.get(name)
    }

    /// True only when the failure field is literally `true`.
    pub fn is_failure(&self) -> bool {
        matches!(self.field(FAILURE_FIELD), Some(Value::Bool(true)))
    }
}
