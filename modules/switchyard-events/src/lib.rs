//! Events and the constructors that build them.
//!
//! An [`Event`] carries a [`Kind`], an optional JSON payload and free-form
//! metadata. [`EventConstructor`]s build events of one fixed kind and double
//! as lookup keys for reducers; [`create_event_constructors`] builds many of
//! them from a batch of kinds and nested blueprint mappings.

pub mod batch;
pub mod config;
pub mod constructor;
pub mod error;
pub mod kind;
pub mod merge;
pub mod types;

pub use batch::{
    accessor_name, create_event_constructors, create_event_constructors_with, BatchInput,
    Blueprint, Blueprints, ConstructorEntry, ConstructorSet,
};
pub use config::{CollisionPolicy, ConstructorConfig};
pub use constructor::{
    create_event_constructor, meta_shaper, payload_shaper, EventConstructor, Input, MetaShaper,
    PayloadShaper,
};
pub use error::{EventError, Result};
pub use kind::{Kind, Token};
pub use types::{Event, FAILURE_FIELD};
